use serde::{Deserialize, Serialize};
use std::fmt;

/// A unique identifier for a GitHub repository.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoId {
    /// The owner of the repository (e.g., "octokit").
    pub owner: String,
    /// The name of the repository (e.g., "rest.js").
    pub repo: String,
}

impl RepoId {
    /// Builds an id with inputs trimmed and `..` segments removed, so the
    /// values can be placed into a request path.
    pub fn sanitized(owner: &str, repo: &str) -> Self {
        Self {
            owner: owner.trim().replace("..", ""),
            repo: repo.trim().replace("..", ""),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// The three pull request fields the metrics depend on.
///
/// Timestamps are kept exactly as the API returned them; they are parsed when
/// the merge window is applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestSummary {
    pub created_at: String,
    pub merged_at: Option<String>,
    pub base_branch: String,
}
