use thiserror::Error;

/// Errors from check fetching, aggregation and reference parsing.
///
/// `Fetch` and `EmptyCheckSet` are retryable while monitoring; the other
/// kinds are fatal to the current invocation.
#[derive(Debug, Error)]
pub enum Error {
    /// The `gh` call failed, timed out, or returned malformed data.
    #[error("failed to fetch checks: {0}")]
    Fetch(String),

    /// The pull request has no checks attached.
    #[error("no checks found for this pull request")]
    EmptyCheckSet,

    /// The supplied pull request reference could not be parsed.
    #[error("invalid pull request reference: {0}")]
    InvalidReference(String),

    /// Discovery returned nothing and no reference was supplied.
    #[error("no open pull requests found")]
    NoOpenPullRequests,
}

impl Error {
    /// Whether the monitor loop may retry after this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Fetch(_) | Error::EmptyCheckSet)
    }
}
