use std::process::Command;

use crate::data::PrRef;
use crate::error::Error;

/// Owner and repo of the `origin` remote of the current working directory,
/// if it points at GitHub.
pub fn get_current_repo() -> Option<(String, String)> {
    let output = Command::new("git")
        .args(["remote", "get-url", "origin"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
    parse_github_url(&url)
}

pub fn parse_github_url(url: &str) -> Option<(String, String)> {
    // Handle SSH: git@github.com:owner/repo.git
    if url.starts_with("git@github.com:") {
        let path = url.strip_prefix("git@github.com:")?;
        let path = path.strip_suffix(".git").unwrap_or(path);
        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() >= 2 {
            return Some((parts[0].to_string(), parts[1].to_string()));
        }
    }

    // Handle HTTPS: https://github.com/owner/repo.git
    if url.contains("github.com") {
        let path = url.split("github.com").nth(1)?;
        let path = path.trim_start_matches('/').trim_start_matches(':');
        let path = path.strip_suffix(".git").unwrap_or(path);
        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() >= 2 {
            return Some((parts[0].to_string(), parts[1].to_string()));
        }
    }

    None
}

/// Turn a user-supplied pull request reference into a concrete `PrRef`.
///
/// Accepts a full URL, `owner/repo#number`, or a bare number. A bare number
/// is resolved against the `origin` remote of the current directory.
pub fn resolve_reference(input: &str) -> Result<PrRef, Error> {
    let input = input.trim();

    if let Ok(number) = input.parse::<u64>() {
        let (owner, repo) = get_current_repo()
            .ok_or_else(|| Error::InvalidReference(format!("{input} (not in a GitHub repository)")))?;
        return Ok(PrRef {
            owner,
            repo,
            number,
        });
    }

    input.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ssh_remote_url() {
        assert_eq!(
            parse_github_url("git@github.com:acme/widgets.git"),
            Some(("acme".to_string(), "widgets".to_string()))
        );
    }

    #[test]
    fn parses_https_remote_url() {
        assert_eq!(
            parse_github_url("https://github.com/acme/widgets.git"),
            Some(("acme".to_string(), "widgets".to_string()))
        );
        assert_eq!(
            parse_github_url("https://github.com/acme/widgets"),
            Some(("acme".to_string(), "widgets".to_string()))
        );
    }

    #[test]
    fn rejects_non_github_remotes() {
        assert_eq!(parse_github_url("https://gitlab.com/acme/widgets.git"), None);
        assert_eq!(parse_github_url("git@github.com:acme"), None);
    }

    #[test]
    fn resolve_passes_full_references_through() {
        let pr = resolve_reference("acme/widgets#9").unwrap();
        assert_eq!(pr.owner, "acme");
        assert_eq!(pr.number, 9);
    }
}
