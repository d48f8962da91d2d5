//! Interactive pull request selection when no reference was given.

use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::data::PullRequest;
use crate::error::Error;

/// Lets the user pick one pull request out of a candidate list.
pub trait PullRequestPicker {
    /// `Ok(None)` means the user chose to abort rather than pick.
    fn pick(&self, prs: &[PullRequest]) -> Result<Option<PullRequest>, Error>;
}

/// Numbered-list prompt on stdin/stdout.
#[derive(Debug, Clone, Default)]
pub struct TerminalPicker;

impl TerminalPicker {
    pub fn new() -> Self {
        Self
    }
}

impl PullRequestPicker for TerminalPicker {
    fn pick(&self, prs: &[PullRequest]) -> Result<Option<PullRequest>, Error> {
        println!("Open pull requests:");
        for (i, pr) in prs.iter().enumerate() {
            println!(
                "  {} #{} {} ({})",
                format!("[{}]", i + 1).bold(),
                pr.number,
                pr.title,
                pr.author_login().dimmed()
            );
        }

        let stdin = io::stdin();
        loop {
            print!("Watch which pull request? [1-{}, q to quit] ", prs.len());
            io::stdout()
                .flush()
                .map_err(|e| Error::Fetch(format!("failed to write prompt: {e}")))?;

            let mut line = String::new();
            let read = stdin
                .lock()
                .read_line(&mut line)
                .map_err(|e| Error::Fetch(format!("failed to read selection: {e}")))?;
            if read == 0 {
                // Stdin closed; treat like quitting.
                return Ok(None);
            }

            match parse_choice(&line, prs.len()) {
                Choice::Pick(index) => return Ok(Some(prs[index].clone())),
                Choice::Quit => return Ok(None),
                Choice::Invalid => {
                    println!("{}", "enter a number from the list, or q".yellow());
                }
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Choice {
    /// Zero-based index into the candidate list.
    Pick(usize),
    Quit,
    Invalid,
}

fn parse_choice(line: &str, count: usize) -> Choice {
    let input = line.trim();
    if input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit") {
        return Choice::Quit;
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Choice::Pick(n - 1),
        _ => Choice::Invalid,
    }
}
