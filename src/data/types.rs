use serde::Deserialize;
use std::str::FromStr;

use crate::error::Error;
use crate::icons;

/// Classification of a raw check state string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Pending,
    Success,
    Failure,
    Unknown,
}

impl CheckState {
    /// Classify a raw state string from the check source. Case-insensitive;
    /// anything outside the known set is `Unknown`.
    pub fn classify(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "success" | "completed" => CheckState::Success,
            "failure" | "failed" | "cancelled" => CheckState::Failure,
            "pending" | "in_progress" => CheckState::Pending,
            _ => CheckState::Unknown,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            CheckState::Pending => icons::CHECK_PENDING,
            CheckState::Success => icons::CHECK_SUCCESS,
            CheckState::Failure => icons::CHECK_FAILURE,
            CheckState::Unknown => icons::CHECK_UNKNOWN,
        }
    }

    pub fn color(self) -> colored::Color {
        use colored::Color;
        match self {
            CheckState::Pending => Color::Yellow,
            CheckState::Success => Color::Green,
            CheckState::Failure => Color::Red,
            CheckState::Unknown => Color::BrightBlack,
        }
    }
}

impl FromStr for CheckState {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::classify(s))
    }
}

/// A single CI/status entry attached to a pull request, as reported by
/// `gh pr checks --json name,state,description,link`.
#[derive(Debug, Clone, Deserialize)]
pub struct Check {
    pub name: String,
    pub state: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

/// Point-in-time classification of every check on a pull request.
///
/// Rebuilt from scratch each poll; nothing carries over between polls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub total: usize,
    pub pending: Vec<String>,
    pub completed_ok: Vec<String>,
    pub completed_failed: Vec<String>,
    /// Checks whose state is outside the known mapping. Counted in `total`
    /// but never block completion.
    pub unknown: Vec<String>,
}

impl Snapshot {
    pub fn all_completed(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn has_failures(&self) -> bool {
        !self.completed_failed.is_empty()
    }

    /// Checks that reached a completed state, successful or not.
    pub fn completed_count(&self) -> usize {
        self.completed_ok.len() + self.completed_failed.len()
    }
}

/// Partition checks by classification, preserving input order within each
/// bucket. Fails with `EmptyCheckSet` on an empty input.
pub fn aggregate(checks: &[Check]) -> Result<Snapshot, Error> {
    if checks.is_empty() {
        return Err(Error::EmptyCheckSet);
    }

    let mut snapshot = Snapshot {
        total: checks.len(),
        pending: Vec::new(),
        completed_ok: Vec::new(),
        completed_failed: Vec::new(),
        unknown: Vec::new(),
    };

    for check in checks {
        let bucket = match CheckState::classify(&check.state) {
            CheckState::Pending => &mut snapshot.pending,
            CheckState::Success => &mut snapshot.completed_ok,
            CheckState::Failure => &mut snapshot.completed_failed,
            CheckState::Unknown => &mut snapshot.unknown,
        };
        bucket.push(check.name.clone());
    }

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(name: &str, state: &str) -> Check {
        Check {
            name: name.to_string(),
            state: state.to_string(),
            description: None,
            link: None,
        }
    }

    #[test]
    fn classify_is_case_insensitive() {
        assert_eq!(CheckState::classify("SUCCESS"), CheckState::Success);
        assert_eq!(CheckState::classify("Success"), CheckState::Success);
        assert_eq!(CheckState::classify("completed"), CheckState::Success);
        assert_eq!(CheckState::classify("FAILURE"), CheckState::Failure);
        assert_eq!(CheckState::classify("failed"), CheckState::Failure);
        assert_eq!(CheckState::classify("Cancelled"), CheckState::Failure);
        assert_eq!(CheckState::classify("pending"), CheckState::Pending);
        assert_eq!(CheckState::classify("IN_PROGRESS"), CheckState::Pending);
    }

    #[test]
    fn classify_unmapped_states_as_unknown() {
        assert_eq!(CheckState::classify("queued"), CheckState::Unknown);
        assert_eq!(CheckState::classify("skipped"), CheckState::Unknown);
        assert_eq!(CheckState::classify(""), CheckState::Unknown);
    }

    #[test]
    fn every_state_has_a_glyph() {
        for state in [
            CheckState::Pending,
            CheckState::Success,
            CheckState::Failure,
            CheckState::Unknown,
        ] {
            assert!(!state.glyph().is_empty());
        }
    }

    #[test]
    fn aggregate_rejects_empty_input() {
        let err = aggregate(&[]).unwrap_err();
        assert!(matches!(err, Error::EmptyCheckSet));
    }

    #[test]
    fn aggregate_all_success() {
        let snapshot =
            aggregate(&[check("build", "success"), check("test", "success")]).unwrap();
        assert!(snapshot.all_completed());
        assert!(!snapshot.has_failures());
        assert_eq!(snapshot.completed_ok, vec!["build", "test"]);
    }

    #[test]
    fn aggregate_pending_blocks_completion() {
        let snapshot =
            aggregate(&[check("build", "pending"), check("test", "success")]).unwrap();
        assert!(!snapshot.all_completed());
        assert_eq!(snapshot.pending, vec!["build"]);
    }

    #[test]
    fn aggregate_failure_completes_with_failures() {
        let snapshot = aggregate(&[check("lint", "failed"), check("test", "success")]).unwrap();
        assert!(snapshot.all_completed());
        assert!(snapshot.has_failures());
        assert_eq!(snapshot.completed_failed, vec!["lint"]);
    }

    #[test]
    fn aggregate_partitions_sum_to_total() {
        let checks = [
            check("a", "success"),
            check("b", "pending"),
            check("c", "failure"),
            check("d", "queued"),
            check("e", "in_progress"),
        ];
        let snapshot = aggregate(&checks).unwrap();
        assert_eq!(snapshot.total, 5);
        assert_eq!(
            snapshot.pending.len()
                + snapshot.completed_ok.len()
                + snapshot.completed_failed.len()
                + snapshot.unknown.len(),
            snapshot.total
        );
        assert_eq!(snapshot.unknown, vec!["d"]);
        assert_eq!(snapshot.all_completed(), snapshot.pending.is_empty());
    }

    #[test]
    fn aggregate_preserves_input_order() {
        let checks = [
            check("z-first", "success"),
            check("a-second", "success"),
            check("m-third", "success"),
        ];
        let snapshot = aggregate(&checks).unwrap();
        assert_eq!(snapshot.completed_ok, vec!["z-first", "a-second", "m-third"]);
    }

    #[test]
    fn aggregate_is_idempotent() {
        let checks = [check("a", "success"), check("b", "pending")];
        assert_eq!(aggregate(&checks).unwrap(), aggregate(&checks).unwrap());
    }

    #[test]
    fn check_deserializes_from_gh_json() {
        let json = r#"[{"name":"build","state":"SUCCESS","description":"","link":"https://example.com/run/1"},{"name":"deploy","state":"IN_PROGRESS"}]"#;
        let checks: Vec<Check> = serde_json::from_str(json).unwrap();
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].name, "build");
        assert_eq!(CheckState::classify(&checks[0].state), CheckState::Success);
        assert!(checks[1].link.is_none());
    }
}
