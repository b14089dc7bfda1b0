mod config;
mod github;
mod pr;
mod report;
mod reviewers;

use clap::Parser;
use tracing::{debug, info, info_span, warn, Instrument};
use tracing_subscriber::EnvFilter;

use github::{GitHubError, GitHubRepo, PullRequestApi};
use pr::PullRequest;
use reviewers::RunOptions;

/// Exit status for a run cut short by Ctrl-C (128 + SIGINT).
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// cc-reviewers: add the people cc'ed in a Pull Request description
/// ("cc @user1 @user2") as reviewers.
#[derive(Parser, Debug)]
#[command(name = "cc-reviewers", version, about)]
struct Cli {
    /// Git remote whose URL names the GitHub owner/repo
    #[arg(long, default_value = "origin")]
    remote: String,

    /// (testing only) reviews as JSON, replaces the GitHub API lookup
    #[arg(long)]
    testing_reviews_json: Option<String>,

    /// Run but don't send any request to GitHub
    #[arg(long)]
    dry_run: bool,

    /// Pull request payload as JSON (GitHub's pull_request object)
    #[arg(long = "pr-json", env = "PR", hide_env_values = true)]
    pr: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stdout)
        .init();

    let cli = Cli::parse();
    let pull_request = pr::parse_pull_request(&cli.pr)?;
    let span = info_span!("cc_reviewers", pr = pull_request.number);

    tokio::select! {
        result = run(&cli, &pull_request).instrument(span) => result,
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted, aborting");
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    }
}

async fn run(cli: &Cli, pull_request: &PullRequest) -> Result<(), Box<dyn std::error::Error>> {
    info!("loading configuration");
    let config = config::Config::load()?;

    let options = RunOptions {
        testing_reviews_json: cli.testing_reviews_json.as_deref(),
        dry_run: cli.dry_run,
    };
    let summary = reviewers::run(pull_request, options, || {
        connect(&cli.remote, &config).map(|client| Box::new(client) as Box<dyn PullRequestApi>)
    })
    .await?;

    report::print(&summary);
    Ok(())
}

fn connect(remote: &str, config: &config::Config) -> Result<GitHubRepo, Box<dyn std::error::Error>> {
    let token = config.github_token().ok_or(GitHubError::MissingToken)?;
    let url = pr::remote_url(remote)?;
    let slug = pr::parse_remote(&url)?;
    debug!(repo = %slug, api_url = config.api_url(), "connecting to GitHub");

    Ok(GitHubRepo::new(config.api_url(), token, &slug))
}
