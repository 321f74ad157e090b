use crate::period::Period;
use crate::types::PullRequestSummary;
use chrono::DateTime;

/// Keeps pull requests whose base branch starts with one of `base_branches`.
///
/// An empty list keeps everything. Matching is a case-sensitive string prefix.
pub fn filter_by_base_branch<'a>(
    prs: &'a [PullRequestSummary],
    base_branches: &[String],
) -> Vec<&'a PullRequestSummary> {
    prs.iter()
        .filter(|pr| {
            base_branches.is_empty()
                || base_branches
                    .iter()
                    .any(|branch| pr.base_branch.starts_with(branch.as_str()))
        })
        .collect()
}

/// Whether the pull request was merged inside `period`, bounds included.
///
/// Unmerged pull requests and unparseable merge timestamps never match.
pub fn merged_within(pr: &PullRequestSummary, period: &Period) -> bool {
    pr.merged_at
        .as_deref()
        .and_then(|merged_at| DateTime::parse_from_rfc3339(merged_at).ok())
        .is_some_and(|merged_at| period.contains(&merged_at))
}

/// Applies the branch filter, then the merge window.
pub fn merged_in_period<'a>(
    prs: &'a [PullRequestSummary],
    base_branches: &[String],
    period: &Period,
) -> Vec<&'a PullRequestSummary> {
    filter_by_base_branch(prs, base_branches)
        .into_iter()
        .filter(|pr| merged_within(pr, period))
        .collect()
}
