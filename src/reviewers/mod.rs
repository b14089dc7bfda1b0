pub mod reconcile;

pub use reconcile::{run, RequestOutcome, RunOptions};

use regex::Regex;
use std::collections::BTreeSet;
use tracing::{debug, error, info, instrument};

/// A "cc" marker followed by one or more space-separated @-mentions.
const CC_PATTERN: &str = r"cc( @[-A-Za-z0-9]+)+";

/// A GitHub login as written in a cc-mention.
///
/// Ordering and equality are case-sensitive; use [`ReviewerHandle::key`]
/// when comparing against logins reported by GitHub.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReviewerHandle(String);

impl ReviewerHandle {
    pub fn new(login: impl Into<String>) -> Self {
        Self(login.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-folded form used for membership checks.
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl std::fmt::Display for ReviewerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Collect every handle cc'ed in `body`, deduplicated and sorted.
///
/// Matching runs over the whole text, so a marker that is not at the start
/// of a line (e.g. "acc @x") still counts.
#[instrument(skip(body), fields(body_len = body.len()))]
pub fn find_reviewers(body: &str) -> Vec<ReviewerHandle> {
    debug!("parsing body:\n{}", body);

    let Ok(re) = Regex::new(CC_PATTERN) else {
        error!(pattern = CC_PATTERN, "cc pattern failed to compile");
        return Vec::new();
    };

    let matches: Vec<&str> = re.find_iter(body).map(|m| m.as_str()).collect();
    info!(?matches, "found cc matches");

    let handles: BTreeSet<ReviewerHandle> = matches
        .into_iter()
        .flat_map(|full| {
            let mentions = full.strip_prefix("cc ").unwrap_or(full);
            mentions.split('@').map(str::trim)
        })
        .filter(|login| !login.is_empty())
        .map(ReviewerHandle::new)
        .collect();

    handles.into_iter().collect()
}
