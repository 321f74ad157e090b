use crate::error::{MetricsError, Result};
use crate::fetcher::PageQuery;
use crate::types::{PullRequestSummary, RepoId};
use async_trait::async_trait;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use serde::Deserialize;

const API_VERSION_HEADER: &str = "x-github-api-version";
const API_VERSION: &str = "2022-11-28";

/// A remote that can list one page of pull requests for a repository.
#[async_trait]
pub trait PullRequestSource: Send + Sync {
    async fn list_page(
        &self,
        repo_id: &RepoId,
        query: &PageQuery,
    ) -> Result<Vec<PullRequestSummary>>;
}

/// The subset of the pull request payload we deserialize.
#[derive(Debug, Deserialize)]
struct RawPullRequest {
    created_at: String,
    merged_at: Option<String>,
    base: RawBase,
}

#[derive(Debug, Deserialize)]
struct RawBase {
    #[serde(rename = "ref")]
    ref_name: String,
}

impl From<RawPullRequest> for PullRequestSummary {
    fn from(pr: RawPullRequest) -> Self {
        Self {
            created_at: pr.created_at,
            merged_at: pr.merged_at,
            base_branch: pr.base.ref_name,
        }
    }
}

#[derive(Clone)]
pub struct GitHubClient {
    octocrab: Octocrab,
}

impl GitHubClient {
    /// Builds an authenticated client.
    ///
    /// Fails with [`MetricsError::Authentication`] when the token is missing or
    /// empty, before any connection is made.
    pub fn new(token: Option<&str>, base_uri: Option<&str>) -> Result<Self> {
        let token = match token.map(str::trim) {
            Some(token) if !token.is_empty() => token,
            _ => return Err(MetricsError::Authentication),
        };

        // Failed pages are fatal, so octocrab must not retry them either.
        let mut builder = Octocrab::builder()
            .add_retry_config(RetryConfig::None)
            .personal_token(token.to_string());
        if let Some(uri) = base_uri.filter(|uri| !uri.is_empty()) {
            builder = builder.base_uri(uri)?;
        }

        Ok(Self {
            octocrab: builder.build()?,
        })
    }
}

#[async_trait]
impl PullRequestSource for GitHubClient {
    async fn list_page(
        &self,
        repo_id: &RepoId,
        query: &PageQuery,
    ) -> Result<Vec<PullRequestSummary>> {
        let uri = format!(
            "/repos/{}/{}/pulls?{}",
            repo_id.owner,
            repo_id.repo,
            query.to_query_string()
        );

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(API_VERSION_HEADER),
            HeaderValue::from_static(API_VERSION),
        );

        // The status is checked before the body is read, since error bodies
        // are not always JSON.
        let response = self.octocrab._get_with_headers(uri, Some(headers)).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MetricsError::Fetch {
                status: status.as_u16(),
            });
        }

        let body = self.octocrab.body_to_string(response).await?;
        let page: Vec<RawPullRequest> = serde_json::from_str(&body)?;

        Ok(page.into_iter().map(PullRequestSummary::from).collect())
    }
}
