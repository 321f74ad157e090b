//! Action inputs and credentials.
//!
//! GitHub Actions exposes each `with:` input as an `INPUT_<NAME>` environment
//! variable (name upper-cased, hyphens kept). Inputs are read with `envy` under
//! that prefix, validated here, and turned into an [`Invocation`] for the
//! querier. The token is read separately from `GITHUB_TOKEN`.

use crate::error::{MetricsError, Result};
use crate::period::CycleUnit;
use crate::querier::CycleOverrides;
use crate::types::RepoId;
use serde::{Deserialize, Deserializer};

const INPUT_PREFIX: &str = "INPUT_";

/// Raw action inputs as provided by the workflow.
#[derive(Clone, Debug, Deserialize)]
pub struct ActionInputs {
    pub owner: String,

    pub repo: String,

    /// First day of the cycle, `YYYY-MM-DD`.
    #[serde(rename = "start-date")]
    pub start_date: String,

    /// Either `week` or `month`.
    #[serde(rename = "cycle-unit")]
    pub cycle_unit: String,

    /// Offset such as `GMT+0900`. Unset means the default offset; an empty
    /// value means UTC.
    #[serde(default)]
    pub gmt: Option<String>,

    /// Comma-separated base branch prefixes.
    /// Example: "main,release/"
    #[serde(default, deserialize_with = "deserialize_branches")]
    pub branches: Vec<String>,

    /// Only the literal string "true" enables verbose output.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub verbose: bool,
}

/// Validated inputs, ready to run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub repo_id: RepoId,
    pub base_branches: Vec<String>,
    pub cycle: CycleOverrides,
    pub verbose: bool,
}

impl ActionInputs {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed(INPUT_PREFIX).from_env()
    }

    /// Checks the date format and cycle unit.
    pub fn into_invocation(self) -> Result<Invocation> {
        if !is_iso_date_shape(&self.start_date) {
            return Err(MetricsError::InvalidInvocationInput(format!(
                "Invalid start date: {}",
                self.start_date
            )));
        }
        let unit: CycleUnit = self.cycle_unit.parse()?;

        Ok(Invocation {
            repo_id: RepoId::sanitized(&self.owner, &self.repo),
            base_branches: self.branches,
            cycle: CycleOverrides {
                start_date: Some(self.start_date),
                unit: Some(unit),
                gmt: self.gmt,
            },
            verbose: self.verbose,
        })
    }
}

/// Process-level credentials and endpoint.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Credentials {
    /// Bearer token for the GitHub API.
    pub github_token: Option<String>,

    /// API root, set by runners on GitHub Enterprise Server.
    pub github_api_url: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }
}

/// `true` for exactly four digits, dash, two digits, dash, two digits.
fn is_iso_date_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

fn deserialize_branches<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    Ok(parse_branches(&s))
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    Ok(s.trim() == "true")
}

/// Splits a comma-separated list, trimming entries and dropping empty ones.
pub fn parse_branches(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|branch| !branch.is_empty())
        .map(str::to_string)
        .collect()
}
