//! Desktop notification delivery via the platform's own tooling.
//!
//! Uses `notify-send` on Linux and `osascript` on macOS. Delivery is
//! best-effort; a missing tool or failed spawn is reported to stderr and
//! otherwise ignored so it can never take the monitor down.

use std::process::Command;

use crate::monitor::{Notifier, Outcome};

#[derive(Debug, Clone, Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str, outcome: Outcome) {
        let result = if cfg!(target_os = "macos") {
            send_macos(title, body, outcome)
        } else {
            send_linux(title, body, outcome)
        };
        if let Err(e) = result {
            eprintln!("notification failed: {e}");
        }
    }
}

fn send_linux(title: &str, body: &str, outcome: Outcome) -> std::io::Result<()> {
    let urgency = match outcome {
        Outcome::Success => "normal",
        Outcome::Failure => "critical",
    };
    let status = Command::new("notify-send")
        .arg("--app-name=prwatch")
        .arg(format!("--urgency={urgency}"))
        .arg(title)
        .arg(body)
        .status()?;
    if !status.success() {
        return Err(std::io::Error::other(format!(
            "notify-send exited with {status}"
        )));
    }
    Ok(())
}

fn send_macos(title: &str, body: &str, outcome: Outcome) -> std::io::Result<()> {
    let sound = match outcome {
        Outcome::Success => "Glass",
        Outcome::Failure => "Basso",
    };
    let script = format!(
        "display notification \"{}\" with title \"{}\" sound name \"{}\"",
        escape(body),
        escape(title),
        sound
    );
    let status = Command::new("osascript").args(["-e", &script]).status()?;
    if !status.success() {
        return Err(std::io::Error::other(format!(
            "osascript exited with {status}"
        )));
    }
    Ok(())
}

/// Escape a string for interpolation inside a double-quoted AppleScript
/// literal.
fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_quotes_and_backslashes() {
        assert_eq!(escape(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape(r"a\b"), r"a\\b");
        assert_eq!(escape("plain"), "plain");
    }
}
