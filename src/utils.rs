pub mod git;

pub use git::{get_current_repo, parse_github_url, resolve_reference};
