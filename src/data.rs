pub mod models;
pub mod types;

pub use models::{Author, PrRef, PullRequest};
pub use types::{aggregate, Check, CheckState, Snapshot};
