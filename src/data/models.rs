use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A pull request, identified by repository and number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl PrRef {
    pub fn url(&self) -> String {
        format!(
            "https://github.com/{}/{}/pull/{}",
            self.owner, self.repo, self.number
        )
    }
}

impl fmt::Display for PrRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

impl FromStr for PrRef {
    type Err = Error;

    /// Accepts `https://github.com/owner/repo/pull/123` (extra path segments
    /// and trailing slashes ignored) and `owner/repo#123`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();

        if let Some(rest) = input.split("github.com/").nth(1) {
            let parts: Vec<&str> = rest.trim_end_matches('/').split('/').collect();
            if parts.len() >= 4 && parts[2] == "pull" {
                if let Ok(number) = parts[3].parse() {
                    return Ok(PrRef {
                        owner: parts[0].to_string(),
                        repo: parts[1].to_string(),
                        number,
                    });
                }
            }
            return Err(Error::InvalidReference(input.to_string()));
        }

        if let Some((repo_part, number_part)) = input.split_once('#') {
            if let Some((owner, repo)) = repo_part.split_once('/') {
                if let (false, false, Ok(number)) =
                    (owner.is_empty(), repo.is_empty(), number_part.parse())
                {
                    return Ok(PrRef {
                        owner: owner.to_string(),
                        repo: repo.to_string(),
                        number,
                    });
                }
            }
        }

        Err(Error::InvalidReference(input.to_string()))
    }
}

/// An open pull request as listed by `gh pr list`.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub author: Option<Author>,
}

impl PullRequest {
    pub fn author_login(&self) -> &str {
        self.author
            .as_ref()
            .map(|a| a.login.as_str())
            .unwrap_or("unknown")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    pub login: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pull_request_url() {
        let pr: PrRef = "https://github.com/acme/widgets/pull/42".parse().unwrap();
        assert_eq!(pr.owner, "acme");
        assert_eq!(pr.repo, "widgets");
        assert_eq!(pr.number, 42);
    }

    #[test]
    fn parses_url_with_trailing_segments() {
        let pr: PrRef = "https://github.com/acme/widgets/pull/42/files"
            .parse()
            .unwrap();
        assert_eq!(pr.number, 42);

        let pr: PrRef = "https://github.com/acme/widgets/pull/42/".parse().unwrap();
        assert_eq!(pr.number, 42);
    }

    #[test]
    fn parses_owner_repo_number_form() {
        let pr: PrRef = "acme/widgets#7".parse().unwrap();
        assert_eq!(pr.owner, "acme");
        assert_eq!(pr.repo, "widgets");
        assert_eq!(pr.number, 7);
    }

    #[test]
    fn rejects_unparseable_references() {
        for input in [
            "",
            "not-a-reference",
            "https://github.com/acme/widgets",
            "https://github.com/acme/widgets/issues/42",
            "acme#7",
            "acme/widgets#seven",
        ] {
            let err = input.parse::<PrRef>().unwrap_err();
            assert!(matches!(err, Error::InvalidReference(_)), "input: {input}");
        }
    }

    #[test]
    fn display_and_url_round_out() {
        let pr = PrRef {
            owner: "acme".to_string(),
            repo: "widgets".to_string(),
            number: 7,
        };
        assert_eq!(pr.to_string(), "acme/widgets#7");
        assert_eq!(pr.url(), "https://github.com/acme/widgets/pull/7");
    }

    #[test]
    fn pull_request_deserializes_from_gh_list_json() {
        let json = r#"[{"number":12,"title":"Fix flaky test","url":"https://github.com/acme/widgets/pull/12","author":{"login":"octocat"}}]"#;
        let prs: Vec<PullRequest> = serde_json::from_str(json).unwrap();
        assert_eq!(prs[0].number, 12);
        assert_eq!(prs[0].author_login(), "octocat");
    }

    #[test]
    fn missing_author_falls_back_to_unknown() {
        let json = r#"{"number":3,"title":"t","url":"u"}"#;
        let pr: PullRequest = serde_json::from_str(json).unwrap();
        assert_eq!(pr.author_login(), "unknown");
    }
}
