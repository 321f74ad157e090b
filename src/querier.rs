//! Service layer computing the merged pull request count for one cycle.
//!
//! `MetricsQuerier` is the main entry point. For each call it:
//! 1. Resolves the cycle and computes its period, failing before any request.
//! 2. Fetches every pull request of the repository.
//! 3. Keeps those targeting the requested base branches and merged inside the period.

use crate::error::Result;
use crate::fetcher::{FetchOptions, PaginatedFetcher};
use crate::github::PullRequestSource;
use crate::metrics;
use crate::period::{self, CycleConfig, CycleUnit};
use crate::types::{PullRequestSummary, RepoId};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Offset used when the caller does not name one.
pub const DEFAULT_GMT: &str = "GMT+0900";

/// Upper bound on the number of matching pull requests logged in verbose mode.
const SAMPLE_SIZE: usize = 100;

/// Partial cycle settings; anything left unset falls back to [`default_cycle`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CycleOverrides {
    pub start_date: Option<String>,
    pub unit: Option<CycleUnit>,
    pub gmt: Option<String>,
}

impl CycleOverrides {
    pub fn resolve(self, now: DateTime<Utc>) -> CycleConfig {
        let default = default_cycle(now);
        CycleConfig {
            start_date: self.start_date.unwrap_or(default.start_date),
            unit: self.unit.unwrap_or(default.unit),
            gmt: self.gmt.unwrap_or(default.gmt),
        }
    }
}

/// The trailing week ending today, in the default offset.
pub fn default_cycle(now: DateTime<Utc>) -> CycleConfig {
    let today = period::parse_offset(DEFAULT_GMT)
        .map(|offset| now.with_timezone(&offset).date_naive())
        .unwrap_or_else(|| now.date_naive());
    let start = today - Duration::days(6);

    CycleConfig {
        start_date: start.format("%Y-%m-%d").to_string(),
        unit: CycleUnit::Week,
        gmt: DEFAULT_GMT.to_string(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MetricsResult {
    /// The cycle the count was computed for.
    pub cycle_options: CycleConfig,
    pub merged_count: usize,
}

pub struct MetricsQuerier<S> {
    fetcher: PaginatedFetcher<S>,
    verbose: bool,
}

impl<S: PullRequestSource> MetricsQuerier<S> {
    pub fn new(source: S, verbose: bool) -> Self {
        Self {
            fetcher: PaginatedFetcher::new(source, verbose),
            verbose,
        }
    }

    /// Counts pull requests merged during the cycle into any of `base_branches`.
    pub async fn compute_metrics(
        &self,
        repo_id: &RepoId,
        base_branches: &[String],
        cycle: CycleOverrides,
        fetch_options: &FetchOptions,
    ) -> Result<MetricsResult> {
        self.compute_metrics_at(repo_id, base_branches, cycle, fetch_options, Utc::now())
            .await
    }

    /// Same as [`Self::compute_metrics`] with the default cycle anchored at `now`.
    pub async fn compute_metrics_at(
        &self,
        repo_id: &RepoId,
        base_branches: &[String],
        cycle: CycleOverrides,
        fetch_options: &FetchOptions,
        now: DateTime<Utc>,
    ) -> Result<MetricsResult> {
        let cycle_options = cycle.resolve(now);
        let period = period::compute_period(
            &cycle_options.start_date,
            cycle_options.unit,
            &cycle_options.gmt,
        )?;

        if self.verbose {
            tracing::info!(
                start_at = %period.start_at.to_rfc3339(),
                end_at = %period.end_at.to_rfc3339(),
                "Computed period"
            );
        }

        let prs = self.fetcher.list_pull_requests(repo_id, fetch_options).await?;
        let target_prs = metrics::merged_in_period(&prs, base_branches, &period);

        if self.verbose {
            self.log_sample(&target_prs);
        }

        Ok(MetricsResult {
            cycle_options,
            merged_count: target_prs.len(),
        })
    }

    fn log_sample(&self, target_prs: &[&PullRequestSummary]) {
        let sample = &target_prs[..target_prs.len().min(SAMPLE_SIZE)];
        match serde_json::to_string_pretty(sample) {
            Ok(json) => tracing::info!("Target pull requests: {}", json),
            Err(e) => tracing::warn!("Failed to serialize target pull requests: {}", e),
        }
    }
}
