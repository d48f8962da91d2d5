use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use tokio_util::sync::CancellationToken;

use prwatch::data::{aggregate, PrRef};
use prwatch::monitor::{ErrorPolicy, Monitor, MonitorConfig, Outcome};
use prwatch::services::prompt::{PullRequestPicker, TerminalPicker};
use prwatch::services::{DesktopNotifier, GhClient};
use prwatch::utils::{get_current_repo, resolve_reference};
use prwatch::Error;

/// Watch a pull request's status checks and notify when they finish
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Pull request to watch: a URL, owner/repo#number, or a bare number
    /// resolved against the current repository. Omit to pick from the open
    /// pull requests of the current repository.
    pr: Option<String>,

    /// Print the current check status once and exit instead of watching
    #[arg(long)]
    single: bool,

    /// Show per-check details on every poll
    #[arg(short, long)]
    verbose: bool,

    /// Seconds between polls
    #[arg(long, default_value_t = 20)]
    interval: u64,

    /// Treat fetch errors as fatal instead of retrying on the next poll
    #[arg(long)]
    halt_on_error: bool,

    /// Keep re-sending the completion notification every interval until
    /// interrupted
    #[arg(long)]
    repeat: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, Error> {
    let client = GhClient::new();

    let pr = match &cli.pr {
        Some(reference) => {
            let pr = resolve_reference(reference)?;
            // Fail fast on a reference that parses but points nowhere.
            client.verify_pr(&pr).await?;
            pr
        }
        None => match discover_pr(&client).await? {
            Some(pr) => pr,
            None => return Ok(ExitCode::SUCCESS),
        },
    };

    if cli.single {
        // One poll, no loop; any error is worth exit code 1 here.
        return match print_once(&client, &pr, cli.verbose).await {
            Ok(code) => Ok(code),
            Err(e) => {
                eprintln!("{} {e}", "error:".red().bold());
                Ok(ExitCode::from(1))
            }
        };
    }

    println!("Watching {} ({})", pr.to_string().bold(), pr.url().dimmed());

    let config = MonitorConfig {
        interval: Duration::from_secs(cli.interval),
        error_policy: if cli.halt_on_error {
            ErrorPolicy::Halt
        } else {
            ErrorPolicy::Retry
        },
        notify_repeat: cli.repeat,
        verbose: cli.verbose,
    };

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\nstopping");
            signal_cancel.cancel();
        }
    });

    let monitor = Monitor::new(client, DesktopNotifier::new(), config);
    match monitor.run(&pr, cancel).await? {
        Some(Outcome::Success) => Ok(ExitCode::SUCCESS),
        Some(Outcome::Failure) => Ok(ExitCode::from(1)),
        // Interrupted before the checks finished.
        None => Ok(ExitCode::from(130)),
    }
}

/// No reference given: list the current repository's open pull requests and
/// let the user pick one.
async fn discover_pr(client: &GhClient) -> Result<Option<PrRef>, Error> {
    let (owner, repo) = get_current_repo().ok_or_else(|| {
        Error::InvalidReference("no pull request given and not in a GitHub repository".to_string())
    })?;

    let prs = client.list_open_prs(&owner, &repo).await?;
    if prs.is_empty() {
        return Err(Error::NoOpenPullRequests);
    }

    let picked = TerminalPicker::new().pick(&prs)?;
    Ok(picked.map(|pr| PrRef {
        owner,
        repo,
        number: pr.number,
    }))
}

async fn print_once(client: &GhClient, pr: &PrRef, verbose: bool) -> Result<ExitCode, Error> {
    use prwatch::monitor::{print_status, CheckSource};

    let checks = client.fetch_checks(pr).await?;
    let snapshot = aggregate(&checks)?;
    println!("{}", pr.to_string().bold());
    print_status(&checks, &snapshot, verbose);

    if snapshot.has_failures() {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
