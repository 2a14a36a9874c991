//! Error types for the search subsystem

use thiserror::Error;

/// Errors a caller of `search` can observe.
///
/// Internal faults all collapse into `Failed`; their detail only goes to the logs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// The query was empty or whitespace only.
    #[error("Search query cannot be empty")]
    EmptyQuery,

    /// Scoring or sorting could not complete.
    #[error("Search failed")]
    Failed,
}

impl SearchError {
    /// Returns whether the caller can fix the error by changing the request.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::EmptyQuery)
    }
}
