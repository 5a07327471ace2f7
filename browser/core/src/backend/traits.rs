//! Book Backend Traits
//!
//! Trait definitions for the two external collaborators the browser talks
//! to: the recommendation service and the explanation service. Both sit
//! behind one trait because one deployment serves both; tests and alternate
//! deployments swap the whole thing out.

use async_trait::async_trait;
use thiserror::Error;

use crate::book::{BookRecord, BookSummary};

/// Failure of an outbound call
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request never produced a response (connect, timeout, TLS, ...)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("service returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// The response body was not the expected shape
    #[error("could not decode response: {0}")]
    Decode(String),

    /// The service reported its own failure in the response body
    #[error("service error: {0}")]
    Service(String),

    /// The explanation service answered with nothing to show
    #[error("service returned an empty rationale")]
    EmptyRationale,

    /// The HTTP client could not be constructed
    #[error("could not build HTTP client: {0}")]
    ClientBuild(String),
}

/// Result alias for backend calls
pub type BackendResult<T> = Result<T, BackendError>;

/// Recommendation + explanation backend
///
/// Implement this trait to point the browser at a different service.
#[async_trait]
pub trait BookBackend: Send + Sync {
    /// Backend name for logs (e.g., "HTTP")
    fn name(&self) -> &str;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Fetch up to `limit` ranked recommendations for a free-text query
    ///
    /// An absent result list is returned as an empty vector, not an error.
    async fn search(&self, query: &str, limit: usize) -> BackendResult<Vec<BookRecord>>;

    /// Ask why a reader might like `book`
    async fn explain(&self, book: &BookSummary) -> BackendResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = BackendError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "service returned 502: bad gateway");
        assert_eq!(
            BackendError::Service("index offline".to_string()).to_string(),
            "service error: index offline"
        );
    }
}
