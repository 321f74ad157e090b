pub mod action;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod github;
pub mod metrics;
pub mod period;
pub mod querier;
pub mod types;

use config::{ActionInputs, Credentials};
use fetcher::FetchOptions;
use github::GitHubClient;
use querier::{MetricsQuerier, MetricsResult};

/// Output name for the merged pull request count.
pub const MERGED_COUNT_OUTPUT: &str = "merged-count";

/// Validates the given inputs, computes the metrics and sets the step output.
pub async fn run(inputs: ActionInputs, credentials: Credentials) -> anyhow::Result<MetricsResult> {
    let invocation = inputs.into_invocation()?;

    let client = GitHubClient::new(
        credentials.github_token.as_deref(),
        credentials.github_api_url.as_deref(),
    )?;
    let querier = MetricsQuerier::new(client, invocation.verbose);

    let metrics = querier
        .compute_metrics(
            &invocation.repo_id,
            &invocation.base_branches,
            invocation.cycle,
            &FetchOptions::default(),
        )
        .await?;

    tracing::info!(
        repo_id = %invocation.repo_id,
        start_date = %metrics.cycle_options.start_date,
        unit = %metrics.cycle_options.unit,
        merged_count = metrics.merged_count,
        "Computed merged pull request count"
    );

    action::set_output(MERGED_COUNT_OUTPUT, &metrics.merged_count.to_string())?;

    Ok(metrics)
}
