use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::pr::{RepoSlug, Review};
use crate::reviewers::ReviewerHandle;

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("GitHub API returned {status} for {path}: {body}")]
    Status {
        path: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Unexpected GitHub API response for {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("GitHub token not found in environment")]
    MissingToken,
}

/// The two pull request operations reviewer reconciliation needs.
#[async_trait]
pub trait PullRequestApi: Send + Sync {
    /// List the reviews already submitted on a pull request.
    async fn list_reviews(&self, number: u64) -> Result<Vec<Review>, GitHubError>;

    /// Ask GitHub to request review from `reviewers` on a pull request.
    async fn request_reviewers(
        &self,
        number: u64,
        reviewers: &[ReviewerHandle],
    ) -> Result<(), GitHubError>;
}

/// Thin REST client scoped to one repository.
///
/// Paths passed to [`GitHubRepo::get`] and [`GitHubRepo::post`] are relative
/// to `{api_url}/repos/{owner}/{repo}/`.
pub struct GitHubRepo {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl GitHubRepo {
    pub fn new(api_url: &str, token: String, slug: &RepoSlug) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            base_url: format!(
                "{}/repos/{}/{}/",
                api_url.trim_end_matches('/'),
                slug.owner,
                slug.repo
            ),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, path: &str) -> Result<Value, GitHubError> {
        debug!("GET {}", self.url(path));
        let response = self
            .client
            .get(self.url(path))
            .header(USER_AGENT, "cc-reviewers")
            .header(ACCEPT, "application/vnd.github+json")
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::into_json(path, response).await
    }

    #[instrument(skip(self, body))]
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, GitHubError> {
        debug!(body = %body, "POST {}", self.url(path));
        let response = self
            .client
            .post(self.url(path))
            .header(USER_AGENT, "cc-reviewers")
            .header(ACCEPT, "application/vnd.github+json")
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        Self::into_json(path, response).await
    }

    async fn into_json(path: &str, response: reqwest::Response) -> Result<Value, GitHubError> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(GitHubError::Status {
                path: path.to_string(),
                status,
                body: text,
            });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|source| GitHubError::Decode {
            path: path.to_string(),
            source,
        })
    }
}

#[async_trait]
impl PullRequestApi for GitHubRepo {
    async fn list_reviews(&self, number: u64) -> Result<Vec<Review>, GitHubError> {
        let path = format!("pulls/{number}/reviews");
        let value = self.get(&path).await?;
        serde_json::from_value(value).map_err(|source| GitHubError::Decode { path, source })
    }

    async fn request_reviewers(
        &self,
        number: u64,
        reviewers: &[ReviewerHandle],
    ) -> Result<(), GitHubError> {
        let logins: Vec<&str> = reviewers.iter().map(ReviewerHandle::as_str).collect();
        self.post(
            &format!("pulls/{number}/requested_reviewers"),
            &json!({ "reviewers": logins }),
        )
        .await?;
        Ok(())
    }
}
