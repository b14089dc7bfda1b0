use std::collections::HashSet;

use tracing::{info, instrument, warn};

use super::{find_reviewers, ReviewerHandle};
use crate::github::PullRequestApi;
use crate::pr::{parse_reviews, PullRequest, Review};
use crate::report::Summary;

/// Where existing reviews come from and whether writes are sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions<'a> {
    /// Reviews JSON used instead of asking GitHub
    pub testing_reviews_json: Option<&'a str>,
    pub dry_run: bool,
}

/// What happened to one reviewer we tried to add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    Requested(ReviewerHandle),
    /// Dry run: the request was logged but never sent.
    Skipped(ReviewerHandle),
    Failed {
        reviewer: ReviewerHandle,
        reason: String,
    },
}

impl RequestOutcome {
    pub fn reviewer(&self) -> &ReviewerHandle {
        match self {
            RequestOutcome::Requested(reviewer) | RequestOutcome::Skipped(reviewer) => reviewer,
            RequestOutcome::Failed { reviewer, .. } => reviewer,
        }
    }
}

/// Pick the candidates that are neither already requested nor have
/// already reviewed. Membership is case-insensitive; the returned handles
/// keep their original case and order.
pub fn plan_additions(
    candidates: &[ReviewerHandle],
    requested: &[String],
    reviewed: &[String],
) -> Vec<ReviewerHandle> {
    let requested: HashSet<String> = requested.iter().map(|login| login.to_lowercase()).collect();
    let reviewed: HashSet<String> = reviewed.iter().map(|login| login.to_lowercase()).collect();

    let mut to_add = Vec::new();
    for candidate in candidates {
        let key = candidate.key();
        if requested.contains(&key) {
            info!(reviewer = %candidate, "already review requested, skipping");
        } else if reviewed.contains(&key) {
            info!(reviewer = %candidate, "already reviewed, skipping");
        } else {
            to_add.push(candidate.clone());
        }
    }

    info!(to_add = ?to_add.iter().map(ReviewerHandle::as_str).collect::<Vec<_>>(), "after filtering existing reviewers");
    to_add
}

/// Request each reviewer with its own API call.
///
/// GitHub rejects the whole request if any login in it is not a
/// collaborator, so batching would let one bad name block the rest. A
/// failure is logged and the loop moves on.
#[instrument(skip(api, reviewers), fields(count = reviewers.len()))]
pub async fn request_each(
    api: &dyn PullRequestApi,
    number: u64,
    reviewers: &[ReviewerHandle],
) -> Vec<RequestOutcome> {
    let mut outcomes = Vec::with_capacity(reviewers.len());
    for reviewer in reviewers {
        match api
            .request_reviewers(number, std::slice::from_ref(reviewer))
            .await
        {
            Ok(()) => {
                info!(reviewer = %reviewer, "requested review");
                outcomes.push(RequestOutcome::Requested(reviewer.clone()));
            }
            Err(e) => {
                warn!(reviewer = %reviewer, error = %e, "failed to add reviewer");
                outcomes.push(RequestOutcome::Failed {
                    reviewer: reviewer.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
    outcomes
}

/// Reconcile the handles cc'ed on `pr` against its current reviewers and
/// request the rest. `api` is `None` on a dry run.
#[instrument(skip_all, fields(pr = pr.number, dry_run = api.is_none()))]
pub async fn assign(
    pr: &PullRequest,
    found: &[ReviewerHandle],
    reviews: &[Review],
    api: Option<&dyn PullRequestApi>,
) -> Summary {
    let reviewed: Vec<String> = reviews.iter().map(|review| review.user.login.clone()).collect();
    info!(?reviewed, "PR has reviews from these users");

    let requested = pr.requested_logins();
    info!(?requested, "PR already had these reviewers requested");

    let to_add = plan_additions(found, &requested, &reviewed);
    let outcomes = match api {
        Some(api) => request_each(api, pr.number, &to_add).await,
        None => skip_each(pr.number, &to_add),
    };

    Summary {
        pr_number: pr.number,
        found: found.to_vec(),
        outcomes,
    }
}

/// Process one pull request from description to reviewer requests.
///
/// `connect` builds the GitHub client. It is called only when live reviews
/// must be read or reviewers written, so injected reviews plus a dry run
/// need neither a git remote nor a token. A failed reviews read aborts the
/// run before any write.
pub async fn run<C>(
    pr: &PullRequest,
    options: RunOptions<'_>,
    connect: C,
) -> Result<Summary, Box<dyn std::error::Error>>
where
    C: FnOnce() -> Result<Box<dyn PullRequestApi>, Box<dyn std::error::Error>>,
{
    let found = find_reviewers(pr.body_text());
    info!(found = ?found.iter().map(ReviewerHandle::as_str).collect::<Vec<_>>(), "found these reviewers");

    let (reviews, client) = match options.testing_reviews_json {
        Some(json) => {
            info!("using reviews from --testing-reviews-json");
            let reviews = parse_reviews(json)?;
            let client = if options.dry_run { None } else { Some(connect()?) };
            (reviews, client)
        }
        None => {
            let client = connect()?;
            let reviews = client.list_reviews(pr.number).await?;
            (reviews, Some(client))
        }
    };

    let api = if options.dry_run { None } else { client.as_deref() };
    Ok(assign(pr, &found, &reviews, api).await)
}

/// Dry-run counterpart of [`request_each`]: log, send nothing.
pub fn skip_each(number: u64, reviewers: &[ReviewerHandle]) -> Vec<RequestOutcome> {
    reviewers
        .iter()
        .map(|reviewer| {
            info!(pr = number, reviewer = %reviewer, "dry run, not requesting review");
            RequestOutcome::Skipped(reviewer.clone())
        })
        .collect()
}
