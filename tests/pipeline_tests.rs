use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use pr_cycle_metrics::error::MetricsError;
use pr_cycle_metrics::fetcher::{FetchOptions, PageQuery};
use pr_cycle_metrics::github::PullRequestSource;
use pr_cycle_metrics::period::{CycleConfig, CycleUnit};
use pr_cycle_metrics::querier::{CycleOverrides, MetricsQuerier};
use pr_cycle_metrics::types::{PullRequestSummary, RepoId};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// In-memory repository that serves its pull requests in fixed-size pages.
struct FakeRepository {
    prs: Vec<PullRequestSummary>,
    fail_with: Option<u16>,
    calls: Arc<AtomicU32>,
}

impl FakeRepository {
    fn new(prs: Vec<PullRequestSummary>) -> Self {
        Self {
            prs,
            fail_with: None,
            calls: Arc::new(AtomicU32::new(0)),
        }
    }
}

#[async_trait]
impl PullRequestSource for FakeRepository {
    async fn list_page(
        &self,
        _repo_id: &RepoId,
        query: &PageQuery,
    ) -> Result<Vec<PullRequestSummary>, MetricsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.fail_with {
            return Err(MetricsError::Fetch { status });
        }

        let per_page = query.per_page as usize;
        let start = (query.page as usize - 1) * per_page;
        Ok(self.prs.iter().skip(start).take(per_page).cloned().collect())
    }
}

fn pr(base_branch: &str, merged_at: Option<&str>) -> PullRequestSummary {
    PullRequestSummary {
        created_at: "2023-06-28T00:00:00Z".to_string(),
        merged_at: merged_at.map(str::to_string),
        base_branch: base_branch.to_string(),
    }
}

fn repo_id() -> RepoId {
    RepoId::sanitized("octokit", "rest.js")
}

fn july_week() -> CycleOverrides {
    CycleOverrides {
        start_date: Some("2023-07-01".to_string()),
        unit: Some(CycleUnit::Week),
        gmt: Some("GMT+0900".to_string()),
    }
}

#[tokio::test]
async fn test_counts_merged_prs_on_requested_branch() {
    let source = FakeRepository::new(vec![
        pr("main", Some("2023-07-02T03:00:00Z")),
        pr("develop", Some("2023-07-03T03:00:00Z")),
        pr("main", Some("2023-07-15T03:00:00Z")),
    ]);
    let querier = MetricsQuerier::new(source, false);

    let result = querier
        .compute_metrics(
            &repo_id(),
            &["main".to_string()],
            july_week(),
            &FetchOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(result.merged_count, 1);
    assert_eq!(
        result.cycle_options,
        CycleConfig {
            start_date: "2023-07-01".to_string(),
            unit: CycleUnit::Week,
            gmt: "GMT+0900".to_string(),
        }
    );
}

#[tokio::test]
async fn test_no_branch_filter_counts_all_merged_prs() {
    let source = FakeRepository::new(vec![
        pr("main", Some("2023-07-02T03:00:00Z")),
        pr("develop", Some("2023-07-03T03:00:00Z")),
        pr("main", Some("2023-07-15T03:00:00Z")),
        pr("main", None),
        pr("main", Some("garbage")),
    ]);
    let querier = MetricsQuerier::new(source, true);

    let result = querier
        .compute_metrics(&repo_id(), &[], july_week(), &FetchOptions::default())
        .await
        .unwrap();

    assert_eq!(result.merged_count, 2);
}

#[tokio::test]
async fn test_month_cycle_spans_multiple_pages() {
    // 250 PRs merged during July (JST) and 50 merged in August.
    let mut prs: Vec<PullRequestSummary> = (0..250)
        .map(|i| {
            let day = 1 + i % 28;
            pr("main", Some(&format!("2023-07-{day:02}T00:00:00Z")))
        })
        .collect();
    prs.extend((0..50).map(|_| pr("main", Some("2023-08-10T00:00:00Z"))));

    let source = FakeRepository::new(prs);
    let calls = source.calls.clone();
    let querier = MetricsQuerier::new(source, false);
    let cycle = CycleOverrides {
        unit: Some(CycleUnit::Month),
        ..july_week()
    };

    let result = querier
        .compute_metrics(&repo_id(), &[], cycle, &FetchOptions::default())
        .await
        .unwrap();

    assert_eq!(result.merged_count, 250);
    // Three full pages, then the empty page that ends pagination.
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_limit_caps_pages_fetched() {
    let prs = (0..300)
        .map(|_| pr("main", Some("2023-07-02T03:00:00Z")))
        .collect();
    let source = FakeRepository::new(prs);
    let calls = source.calls.clone();
    let querier = MetricsQuerier::new(source, false);
    let options = FetchOptions {
        limit: Some(100),
        ..FetchOptions::default()
    };

    let result = querier
        .compute_metrics(&repo_id(), &[], july_week(), &options)
        .await
        .unwrap();

    assert_eq!(result.merged_count, 100);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_invalid_period_fails_before_fetching() {
    let source = FakeRepository::new(vec![pr("main", Some("2023-07-02T03:00:00Z"))]);
    let calls = source.calls.clone();
    let querier = MetricsQuerier::new(source, false);
    let cycle = CycleOverrides {
        start_date: Some("invalid date string".to_string()),
        ..july_week()
    };

    let err = querier
        .compute_metrics(&repo_id(), &[], cycle, &FetchOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, MetricsError::InvalidPeriodInput(_)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_fetch_error_propagates() {
    let mut source = FakeRepository::new(vec![]);
    source.fail_with = Some(403);
    let querier = MetricsQuerier::new(source, false);

    let err = querier
        .compute_metrics(&repo_id(), &[], july_week(), &FetchOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, MetricsError::Fetch { status: 403 }));
    assert_eq!(err.to_string(), "Failed to list pull requests: status 403");
}

#[tokio::test]
async fn test_default_cycle_is_used_without_overrides() {
    let source = FakeRepository::new(vec![
        pr("main", Some("2024-01-06T00:00:00Z")),
        pr("main", Some("2023-12-01T00:00:00Z")),
    ]);
    let querier = MetricsQuerier::new(source, false);
    let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();

    let result = querier
        .compute_metrics_at(
            &repo_id(),
            &[],
            CycleOverrides::default(),
            &FetchOptions::default(),
            now,
        )
        .await
        .unwrap();

    assert_eq!(result.cycle_options.start_date, "2024-01-04");
    assert_eq!(result.cycle_options.unit, CycleUnit::Week);
    assert_eq!(result.merged_count, 1);
}
