//! Exhaustive, sequential pagination over the pull request listing.
//!
//! Pages are requested one at a time starting at page 1. The loop is driven by
//! [`PageState`]: it stops when a page comes back empty, when an optional limit
//! has been reached, or on the first failed request.

use crate::error::Result;
use crate::github::PullRequestSource;
use crate::types::{PullRequestSummary, RepoId};

/// Largest page size the listing endpoint accepts.
pub const MAX_PER_PAGE: u8 = 100;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum State {
    Open,
    #[default]
    Closed,
    All,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            State::Open => "open",
            State::Closed => "closed",
            State::All => "all",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Sort {
    #[default]
    Created,
    Updated,
    Popularity,
    LongRunning,
}

impl Sort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sort::Created => "created",
            Sort::Updated => "updated",
            Sort::Popularity => "popularity",
            Sort::LongRunning => "long-running",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    #[default]
    Descending,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        }
    }
}

/// Caller-tunable listing options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchOptions {
    /// Stop once at least this many pull requests have been collected.
    pub limit: Option<usize>,
    pub per_page: u8,
    pub state: State,
    pub sort: Sort,
    pub direction: Direction,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            limit: None,
            per_page: MAX_PER_PAGE,
            state: State::default(),
            sort: Sort::default(),
            direction: Direction::default(),
        }
    }
}

/// Query for a single page request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageQuery {
    pub state: State,
    pub sort: Sort,
    pub direction: Direction,
    pub per_page: u8,
    pub page: u32,
}

impl PageQuery {
    pub fn new(options: &FetchOptions, page: u32) -> Self {
        Self {
            state: options.state,
            sort: options.sort,
            direction: options.direction,
            per_page: options.per_page.clamp(1, MAX_PER_PAGE),
            page,
        }
    }

    /// Renders the query as `state=..&sort=..&direction=..&per_page=..&page=..`.
    pub fn to_query_string(&self) -> String {
        format!(
            "state={}&sort={}&direction={}&per_page={}&page={}",
            self.state.as_str(),
            self.sort.as_str(),
            self.direction.as_str(),
            self.per_page,
            self.page
        )
    }
}

/// Pagination progress. Provider failures end the loop through `Err`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageState {
    Fetching { page: u32 },
    Exhausted,
    LimitReached,
}

impl PageState {
    /// The state after `page` returned `page_len` items, leaving `total` accumulated.
    pub fn after_page(page: u32, page_len: usize, total: usize, limit: Option<usize>) -> Self {
        if page_len == 0 {
            return PageState::Exhausted;
        }
        if limit.is_some_and(|limit| total >= limit) {
            return PageState::LimitReached;
        }
        PageState::Fetching { page: page + 1 }
    }
}

pub struct PaginatedFetcher<S> {
    source: S,
    verbose: bool,
}

impl<S: PullRequestSource> PaginatedFetcher<S> {
    pub fn new(source: S, verbose: bool) -> Self {
        Self { source, verbose }
    }

    /// Collects every page of pull requests, in provider order.
    ///
    /// Nothing is returned if any page fails, even when earlier pages succeeded.
    /// With a limit set the result may exceed it by up to one page.
    pub async fn list_pull_requests(
        &self,
        repo_id: &RepoId,
        options: &FetchOptions,
    ) -> Result<Vec<PullRequestSummary>> {
        let mut prs = Vec::new();
        let mut state = PageState::Fetching { page: 1 };

        while let PageState::Fetching { page } = state {
            if self.verbose {
                tracing::info!(repo_id = %repo_id, page, "Listing pull requests");
            }

            let items = self
                .source
                .list_page(repo_id, &PageQuery::new(options, page))
                .await?;

            let page_len = items.len();
            if self.verbose && page_len > 0 {
                tracing::info!(repo_id = %repo_id, page, found = page_len, "Found pull requests");
            }
            prs.extend(items);

            state = PageState::after_page(page, page_len, prs.len(), options.limit);
        }

        tracing::debug!(repo_id = %repo_id, total = prs.len(), ?state, "Finished listing pull requests");

        Ok(prs)
    }
}
