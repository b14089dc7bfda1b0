use crate::reviewers::{RequestOutcome, ReviewerHandle};

/// Everything one run decided, for the closing summary.
#[derive(Debug)]
pub struct Summary {
    /// PR number
    pub pr_number: u64,
    /// Handles cc'ed in the description
    pub found: Vec<ReviewerHandle>,
    /// One entry per handle left after filtering
    pub outcomes: Vec<RequestOutcome>,
}

impl Summary {
    pub fn requested(&self) -> impl Iterator<Item = &ReviewerHandle> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            RequestOutcome::Requested(reviewer) => Some(reviewer),
            _ => None,
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = &ReviewerHandle> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            RequestOutcome::Skipped(reviewer) => Some(reviewer),
            _ => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = (&ReviewerHandle, &str)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            RequestOutcome::Failed { reviewer, reason } => Some((reviewer, reason.as_str())),
            _ => None,
        })
    }

    /// Handles that were found but filtered out before any request.
    pub fn already_present(&self) -> Vec<&ReviewerHandle> {
        self.found
            .iter()
            .filter(|handle| !self.outcomes.iter().any(|o| o.reviewer() == *handle))
            .collect()
    }
}
