//! Browser Messages
//!
//! Two kinds of traffic flow back toward the control thread:
//!
//! - [`Completion`]: the outcome of an outbound call, produced by a spawned
//!   task and applied to state by the browser on the control thread
//! - [`BrowserNotice`]: fire-and-forget messages for the surface, covering
//!   presentation effects and the error channel
//!
//! Neither carries state the surface is expected to keep; surfaces read
//! state from the browser's accessors.

use crate::backend::BackendError;
use crate::book::BookRecord;
use crate::explanation::ExplanationTicket;
use crate::search::SearchTicket;

/// Outcome of an outbound call, tagged with the ticket it was issued under
#[derive(Debug)]
pub enum Completion {
    /// A search settled
    Search {
        /// Ticket of the search
        ticket: SearchTicket,
        /// Records or failure
        outcome: Result<Vec<BookRecord>, BackendError>,
    },
    /// An explanation settled
    Explanation {
        /// Ticket of the request
        ticket: ExplanationTicket,
        /// Rationale or failure
        outcome: Result<String, BackendError>,
    },
}

/// Messages from the browser to the surface
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BrowserNotice {
    /// The page changed; bring the top of the list into view
    ScrollToTop,

    /// A search replaced the results
    SearchCompleted {
        /// Query that produced them
        query: String,
        /// Number of records
        count: usize,
    },

    /// A search failed; the previous results are still shown
    SearchFailed {
        /// Query that failed
        query: String,
        /// Error description
        error: String,
    },

    /// An explanation failed; the panel shows the fallback message
    ExplanationFailed {
        /// Title of the book
        title: String,
        /// Error description
        error: String,
    },

    /// The service did not answer the startup health check
    BackendUnavailable {
        /// Backend name
        backend: String,
    },
}

impl BrowserNotice {
    /// Whether this notice reports a failure
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::SearchFailed { .. } | Self::ExplanationFailed { .. } | Self::BackendUnavailable { .. }
        )
    }
}
