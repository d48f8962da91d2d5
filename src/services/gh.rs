//! GitHub access through the `gh` CLI.
//!
//! Everything goes through `gh` subcommands so the user's existing
//! authentication is reused; no tokens are handled here.

use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::data::{Check, PrRef, PullRequest};
use crate::error::Error;
use crate::monitor::CheckSource;

const GH_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin wrapper over `gh` invocations. Stateless; cloneable for free.
#[derive(Debug, Clone, Default)]
pub struct GhClient;

impl GhClient {
    pub fn new() -> Self {
        Self
    }

    /// Open pull requests in the given repository, most recent first,
    /// as `gh pr list` orders them.
    pub async fn list_open_prs(&self, owner: &str, repo: &str) -> Result<Vec<PullRequest>, Error> {
        let repo_arg = format!("{owner}/{repo}");
        let output = run_gh(&[
            "pr",
            "list",
            "--repo",
            &repo_arg,
            "--json",
            "number,title,url,author",
        ])
        .await?;

        if !output.status.success() {
            return Err(Error::Fetch(stderr_message(&output)));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| Error::Fetch(format!("unexpected gh pr list output: {e}")))
    }

    /// Confirm the pull request exists and is visible before polling starts.
    pub async fn verify_pr(&self, pr: &PrRef) -> Result<PullRequest, Error> {
        let repo_arg = format!("{}/{}", pr.owner, pr.repo);
        let number = pr.number.to_string();
        let output = run_gh(&[
            "pr",
            "view",
            &number,
            "--repo",
            &repo_arg,
            "--json",
            "number,title,url,author",
        ])
        .await?;

        if !output.status.success() {
            let message = stderr_message(&output);
            if message.contains("Could not resolve") || message.contains("no pull requests found") {
                return Err(Error::InvalidReference(pr.to_string()));
            }
            return Err(Error::Fetch(message));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| Error::Fetch(format!("unexpected gh pr view output: {e}")))
    }
}

#[async_trait]
impl CheckSource for GhClient {
    async fn fetch_checks(&self, pr: &PrRef) -> Result<Vec<Check>, Error> {
        let repo_arg = format!("{}/{}", pr.owner, pr.repo);
        let number = pr.number.to_string();
        let output = run_gh(&[
            "pr",
            "checks",
            &number,
            "--repo",
            &repo_arg,
            "--json",
            "name,state,description,link",
        ])
        .await?;

        // `gh pr checks` signals pending/failed checks through its exit
        // status, so a non-zero exit can still carry a valid JSON payload.
        if let Ok(checks) = serde_json::from_slice::<Vec<Check>>(&output.stdout) {
            return Ok(checks);
        }

        let message = stderr_message(&output);
        if message.contains("no checks reported") {
            return Err(Error::EmptyCheckSet);
        }
        Err(Error::Fetch(message))
    }
}

async fn run_gh(args: &[&str]) -> Result<std::process::Output, Error> {
    let result = tokio::time::timeout(GH_TIMEOUT, Command::new("gh").args(args).output()).await;

    match result {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(Error::Fetch(format!("failed to run gh: {e}"))),
        Err(_) => Err(Error::Fetch(format!(
            "gh {} timed out after {}s",
            args.first().unwrap_or(&""),
            GH_TIMEOUT.as_secs()
        ))),
    }
}

fn stderr_message(output: &std::process::Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let message = stderr.trim();
    if message.is_empty() {
        format!("gh exited with {}", output.status)
    } else {
        message.to_string()
    }
}
