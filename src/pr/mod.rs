pub mod types;

pub use types::{PullRequest, RepoSlug, Review};

use std::process::Command;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum PrError {
    #[error("Invalid PR payload: {0}")]
    Payload(#[source] serde_json::Error),

    #[error("Invalid reviews JSON: {0}")]
    Reviews(#[source] serde_json::Error),

    #[error("Failed to run git: {0}")]
    Git(#[from] std::io::Error),

    #[error("No URL configured for git remote '{0}'")]
    UnknownRemote(String),

    #[error("Cannot determine owner/repo from remote URL: {0}")]
    InvalidRemote(String),
}

/// Parse the pull request JSON handed over by CI.
///
/// `number` and `requested_reviewers` are required; serde's error names the
/// missing field. `body` may be null or absent.
pub fn parse_pull_request(json: &str) -> Result<PullRequest, PrError> {
    serde_json::from_str(json).map_err(PrError::Payload)
}

/// Parse a reviews listing in the shape returned by `GET pulls/{n}/reviews`.
pub fn parse_reviews(json: &str) -> Result<Vec<Review>, PrError> {
    serde_json::from_str(json).map_err(PrError::Reviews)
}

/// Look up the URL of a configured git remote in the current checkout.
#[instrument]
pub fn remote_url(remote: &str) -> Result<String, PrError> {
    let output = Command::new("git")
        .args(["config", "--get", &format!("remote.{remote}.url")])
        .output()?;

    let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !output.status.success() || url.is_empty() {
        return Err(PrError::UnknownRemote(remote.to_string()));
    }
    debug!(url = %url, "resolved remote URL");
    Ok(url)
}

/// Split a git remote URL into owner and repository.
///
/// Accepts `https://github.com/{owner}/{repo}[.git]` and the scp-like
/// `git@github.com:{owner}/{repo}[.git]` form.
pub fn parse_remote(url: &str) -> Result<RepoSlug, PrError> {
    let invalid = || PrError::InvalidRemote(url.to_string());

    let path = if url.contains("://") {
        let parsed = reqwest::Url::parse(url).map_err(|_| invalid())?;
        parsed.path().to_string()
    } else {
        let (_, path) = url.split_once(':').ok_or_else(invalid)?;
        path.to_string()
    };

    let segments: Vec<_> = path
        .trim_matches('/')
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.len() != 2 {
        return Err(invalid());
    }

    let repo = segments[1].strip_suffix(".git").unwrap_or(segments[1]);
    if repo.is_empty() {
        return Err(invalid());
    }

    Ok(RepoSlug {
        owner: segments[0].to_string(),
        repo: repo.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_https_remote() {
        let slug = parse_remote("https://github.com/apache/tvm.git").unwrap();
        assert_eq!(slug.owner, "apache");
        assert_eq!(slug.repo, "tvm");

        let slug = parse_remote("https://github.com/apache/tvm").unwrap();
        assert_eq!(slug.repo, "tvm");
    }

    #[test]
    fn test_parse_ssh_remote() {
        let slug = parse_remote("git@github.com:apache/tvm.git").unwrap();
        assert_eq!(slug.owner, "apache");
        assert_eq!(slug.repo, "tvm");
    }

    #[test]
    fn test_parse_ssh_url_remote() {
        let slug = parse_remote("ssh://git@github.com/apache/tvm.git").unwrap();
        assert_eq!(slug.to_string(), "apache/tvm");
    }

    #[test]
    fn test_parse_invalid_remote() {
        assert!(parse_remote("not-a-remote").is_err());
        assert!(parse_remote("https://github.com/apache").is_err());
        assert!(parse_remote("https://github.com/apache/tvm/pull/1").is_err());
        assert!(parse_remote("git@github.com:apache/.git").is_err());
    }

    #[test]
    fn test_parse_pull_request_missing_field() {
        let err = parse_pull_request(r#"{"body": "cc @alice"}"#).unwrap_err();
        assert!(err.to_string().contains("number"));

        let err = parse_pull_request(r#"{"number": 1, "body": ""}"#).unwrap_err();
        assert!(err.to_string().contains("requested_reviewers"));
    }

    #[test]
    fn test_parse_pull_request_absent_body() {
        let pr = parse_pull_request(r#"{"number": 3, "requested_reviewers": []}"#).unwrap();
        assert_eq!(pr.number, 3);
        assert_eq!(pr.body_text(), "");
    }

    #[test]
    fn test_parse_reviews() {
        let reviews =
            parse_reviews(r#"[{"user": {"login": "Carol"}}, {"user": {"login": "dave"}}]"#)
                .unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].user.login, "Carol");
        assert!(parse_reviews("{").is_err());
    }
}
