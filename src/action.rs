//! Reporting results back to the workflow runner.

use anyhow::Context;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

const OUTPUT_FILE_VAR: &str = "GITHUB_OUTPUT";

/// Sets a step output, appending to `$GITHUB_OUTPUT` when the runner provides it.
pub fn set_output(name: &str, value: &str) -> anyhow::Result<()> {
    match std::env::var_os(OUTPUT_FILE_VAR) {
        Some(path) if !path.is_empty() => append_output(Path::new(&path), name, value),
        _ => {
            println!("::set-output name={}::{}", name, escape_data(value));
            Ok(())
        }
    }
}

/// Appends `name=value` to an output file.
pub fn append_output(path: &Path, name: &str, value: &str) -> anyhow::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open output file {}", path.display()))?;

    writeln!(file, "{name}={value}")
        .with_context(|| format!("failed to write output {name}"))?;

    Ok(())
}

/// Emits an error annotation. The caller is responsible for the exit code.
pub fn set_failed(message: &str) {
    println!("{}", error_command(message));
}

pub fn error_command(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

/// Escapes a value for use inside a workflow command.
fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
