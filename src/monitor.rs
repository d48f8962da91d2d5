//! The check monitor loop: fetch, aggregate, report, notify.
//!
//! One fetch/evaluate/sleep cycle at a time; the fetch and the inter-poll
//! sleep are the only suspension points. Collaborators are capability traits
//! so the loop runs in tests without a terminal or network.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use colored::Colorize;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::data::{aggregate, Check, CheckState, PrRef, Snapshot};
use crate::error::Error;
use crate::icons;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(20);

/// Supplies the current check list for a pull request.
#[async_trait]
pub trait CheckSource: Send + Sync {
    async fn fetch_checks(&self, pr: &PrRef) -> Result<Vec<Check>, Error>;
}

#[async_trait]
impl<T: CheckSource + ?Sized> CheckSource for Arc<T> {
    async fn fetch_checks(&self, pr: &PrRef) -> Result<Vec<Check>, Error> {
        (**self).fetch_checks(pr).await
    }
}

/// Local notification delivery. Implementations are best-effort and must
/// swallow their own failures; the loop never waits on acknowledgment.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str, outcome: Outcome);
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, title: &str, body: &str, outcome: Outcome) {
        (**self).notify(title, body, outcome);
    }
}

/// Terminal outcome of a monitor run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// What to do when a fetch fails or returns no checks mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Report the error and try again on the next poll.
    #[default]
    Retry,
    /// Treat the error as fatal and halt the run.
    Halt,
}

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Delay between two consecutive fetches.
    pub interval: Duration,
    pub error_policy: ErrorPolicy,
    /// Keep re-sending the terminal notification every interval until
    /// cancelled, instead of sending it once.
    pub notify_repeat: bool,
    /// Include per-check description and link lines in progress output.
    pub verbose: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            error_policy: ErrorPolicy::default(),
            notify_repeat: false,
            verbose: false,
        }
    }
}

/// Polls a pull request's checks until they all finish, then notifies.
pub struct Monitor<S, N> {
    source: S,
    notifier: N,
    config: MonitorConfig,
}

impl<S: CheckSource, N: Notifier> Monitor<S, N> {
    pub fn new(source: S, notifier: N, config: MonitorConfig) -> Self {
        Self {
            source,
            notifier,
            config,
        }
    }

    /// Run until the checks reach a terminal state or the token is cancelled.
    ///
    /// Returns `Ok(Some(outcome))` on completion, `Ok(None)` when cancelled
    /// before a terminal state was observed, and `Err` on a fatal fetch error
    /// under the `Halt` policy.
    pub async fn run(
        &self,
        pr: &PrRef,
        cancel: CancellationToken,
    ) -> Result<Option<Outcome>, Error> {
        let started_at = Instant::now();
        let mut poll_count: u64 = 0;

        loop {
            poll_count += 1;

            let result = self
                .source
                .fetch_checks(pr)
                .await
                .and_then(|checks| aggregate(&checks).map(|snapshot| (checks, snapshot)));

            let (checks, snapshot) = match result {
                Ok(polled) => polled,
                Err(e) if e.is_retryable() && self.config.error_policy == ErrorPolicy::Retry => {
                    eprintln!(
                        "{} {e}, retrying in {}s",
                        "warning:".yellow().bold(),
                        self.config.interval.as_secs()
                    );
                    if !self.wait(&cancel).await {
                        return Ok(None);
                    }
                    continue;
                }
                Err(e) => return Err(e),
            };

            if snapshot.all_completed() {
                let outcome = if snapshot.has_failures() {
                    Outcome::Failure
                } else {
                    Outcome::Success
                };
                let elapsed = started_at.elapsed();
                print_summary(&snapshot, elapsed, poll_count);
                self.send_notification(pr, &snapshot, outcome, elapsed);
                if self.config.notify_repeat {
                    while self.wait(&cancel).await {
                        self.send_notification(pr, &snapshot, outcome, elapsed);
                    }
                }
                return Ok(Some(outcome));
            }

            print_status(&checks, &snapshot, self.config.verbose);
            if !self.wait(&cancel).await {
                return Ok(None);
            }
        }
    }

    /// Suspend for the poll interval. False when cancelled before it elapsed.
    async fn wait(&self, cancel: &CancellationToken) -> bool {
        tokio::select! {
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(self.config.interval) => true,
        }
    }

    fn send_notification(
        &self,
        pr: &PrRef,
        snapshot: &Snapshot,
        outcome: Outcome,
        elapsed: Duration,
    ) {
        let (title, body) = match outcome {
            Outcome::Success => (
                format!("{} Checks passed", icons::CHECK_SUCCESS),
                format!(
                    "{pr}: all {} checks passed in {}",
                    snapshot.total,
                    format_elapsed(elapsed)
                ),
            ),
            Outcome::Failure => (
                format!("{} Checks failed", icons::CHECK_FAILURE),
                format!(
                    "{pr}: {} of {} checks failed after {}",
                    snapshot.completed_failed.len(),
                    snapshot.total,
                    format_elapsed(elapsed)
                ),
            ),
        };
        self.notifier.notify(&title, &body, outcome);
    }
}

/// Print the current state of the checks: completed/total ratio, pending and
/// failed name lists, and a per-check detail line when verbose.
pub fn print_status(checks: &[Check], snapshot: &Snapshot, verbose: bool) {
    println!(
        "[{}/{}] checks completed",
        snapshot.completed_count(),
        snapshot.total
    );
    if !snapshot.pending.is_empty() {
        println!(
            "  {} pending: {}",
            icons::CHECK_PENDING.yellow(),
            snapshot.pending.join(", ")
        );
    }
    if !snapshot.completed_failed.is_empty() {
        println!(
            "  {} failed: {}",
            icons::CHECK_FAILURE.red(),
            snapshot.completed_failed.join(", ")
        );
    }
    if verbose {
        for check in checks {
            let state = CheckState::classify(&check.state);
            let mut line = format!("  {} {}", check.name, state.glyph().color(state.color()));
            if let Some(description) = check.description.as_deref().filter(|d| !d.is_empty()) {
                line.push_str(&format!("  {description}"));
            }
            if let Some(link) = check.link.as_deref().filter(|l| !l.is_empty()) {
                line.push_str(&format!("  {link}"));
            }
            println!("{line}");
        }
    }
}

fn print_summary(snapshot: &Snapshot, elapsed: Duration, polls: u64) {
    let elapsed = format_elapsed(elapsed);
    if snapshot.has_failures() {
        println!(
            "{} {} of {} checks failed after {} and {} polls ({} passed)",
            icons::CHECK_FAILURE.red().bold(),
            snapshot.completed_failed.len(),
            snapshot.total,
            elapsed,
            polls,
            snapshot.completed_ok.len()
        );
        println!("  failed: {}", snapshot.completed_failed.join(", ").red());
    } else {
        println!(
            "{} all {} checks passed in {} after {} polls",
            icons::CHECK_SUCCESS.green().bold(),
            snapshot.total,
            elapsed,
            polls
        );
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
