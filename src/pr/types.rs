use serde::Deserialize;

/// The subset of a GitHub pull request payload this tool needs.
/// Deserialized from the `PR` JSON handed to us by the CI workflow.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    /// PR number (e.g., 42)
    pub number: u64,
    /// Description text. GitHub sends `null` for an empty description.
    pub body: Option<String>,
    /// Users already asked to review
    pub requested_reviewers: Vec<User>,
}

impl PullRequest {
    /// Description text, with an absent body read as empty.
    pub fn body_text(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }

    /// Logins of the users already requested as reviewers.
    pub fn requested_logins(&self) -> Vec<String> {
        self.requested_reviewers
            .iter()
            .map(|user| user.login.clone())
            .collect()
    }
}

/// A GitHub account reference as it appears inside PR and review payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
}

/// A submitted review. Only the author matters here.
#[derive(Debug, Clone, Deserialize)]
pub struct Review {
    pub user: User,
}

/// Owner and repository name parsed out of a git remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub repo: String,
}

impl std::fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
