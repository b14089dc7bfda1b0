pub mod types;

pub use types::Summary;

use crate::reviewers::ReviewerHandle;
use colored::Colorize;
use tracing::instrument;

/// Print the closing summary to stdout for the CI log.
///
/// PR #42: cc'ed alice, bob, carol
///   already requested or reviewed: bob
///   requested: alice
///   failed: carol (GitHub API returned 422 ...)
#[instrument(skip(summary), fields(pr = summary.pr_number))]
pub fn print(summary: &Summary) {
    for line in render(summary) {
        println!("{line}");
    }
}

fn render(summary: &Summary) -> Vec<String> {
    let mut lines = Vec::new();

    if summary.found.is_empty() {
        lines.push(format!("PR #{}: no cc'ed reviewers", summary.pr_number));
        return lines;
    }

    lines.push(format!(
        "PR #{}: cc'ed {}",
        summary.pr_number,
        join(summary.found.iter())
    ));

    let present = summary.already_present();
    if !present.is_empty() {
        lines.push(format!(
            "  already requested or reviewed: {}",
            join(present.into_iter()).dimmed()
        ));
    }

    let requested: Vec<_> = summary.requested().collect();
    if !requested.is_empty() {
        lines.push(format!("  requested: {}", join(requested.into_iter()).green()));
    }

    let skipped: Vec<_> = summary.skipped().collect();
    if !skipped.is_empty() {
        lines.push(format!("  would request: {}", join(skipped.into_iter()).yellow()));
    }

    for (reviewer, reason) in summary.failed() {
        lines.push(format!("  failed: {} ({})", reviewer.as_str().red().bold(), reason));
    }

    lines
}

fn join<'a>(handles: impl Iterator<Item = &'a ReviewerHandle>) -> String {
    handles
        .map(ReviewerHandle::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
