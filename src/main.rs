use pr_cycle_metrics::action;
use pr_cycle_metrics::config::{ActionInputs, Credentials};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // Local runs may keep inputs and RUST_LOG in a .env file.
    let dotenv = dotenvy::dotenv();

    // Initialize tracing (logging). Stdout is reserved for workflow commands.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pr_cycle_metrics=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Failed to compute metrics: {:#}", e);
            action::set_failed(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let inputs = ActionInputs::from_env()?;
    let credentials = Credentials::from_env()?;

    pr_cycle_metrics::run(inputs, credentials).await?;

    Ok(())
}
