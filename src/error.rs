//! Error kinds surfaced by the metrics pipeline.
//!
//! Every variant is fatal. Nothing is retried internally; the caller converts
//! whichever error reaches the invocation boundary into a failure message.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    /// No bearer token was available when the client was constructed.
    #[error("GITHUB_TOKEN is not set")]
    Authentication,

    /// The start date and offset do not denote a valid instant.
    #[error("Invalid date: {0}")]
    InvalidPeriodInput(String),

    /// The pull request listing returned a non-success status.
    #[error("Failed to list pull requests: status {status}")]
    Fetch { status: u16 },

    /// The request failed without a response status.
    #[error("Failed to list pull requests: {0}")]
    Request(#[source] octocrab::Error),

    /// A successful response body was not a list of pull requests.
    #[error("Failed to decode pull requests: {0}")]
    Decode(#[from] serde_json::Error),

    /// An action input was malformed.
    #[error("{0}")]
    InvalidInvocationInput(String),
}

impl From<octocrab::Error> for MetricsError {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => MetricsError::Fetch {
                status: source.status_code.as_u16(),
            },
            other => MetricsError::Request(other),
        }
    }
}

pub type Result<T, E = MetricsError> = std::result::Result<T, E>;
