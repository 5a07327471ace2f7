//! User Actions
//!
//! Actions sent from a surface to the [`Browser`](crate::Browser). They
//! report what the user did; the browser decides what changes.

use serde::{Deserialize, Serialize};

/// Which book an explanation is for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplainTarget {
    /// A row of the current page
    Row(usize),
    /// The book shown in the detail overlay
    Selected,
}

/// Actions from a surface to the browser
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserAction {
    // ============================================
    // Search
    // ============================================
    /// Replace the query text
    SetQuery(String),

    /// Submit the current query
    SubmitQuery,

    // ============================================
    // Pagination
    // ============================================
    /// Jump to a page (1-based)
    ChangePage(usize),

    /// Go to the following page
    NextPage,

    /// Go to the preceding page
    PrevPage,

    // ============================================
    // Detail Overlay
    // ============================================
    /// Open the overlay for a row of the current page
    OpenDetail {
        /// Row within the current page
        row: usize,
    },

    /// Close the overlay
    CloseDetail,

    // ============================================
    // Explanation
    // ============================================
    /// Ask why a reader might like a book
    RequestExplanation(ExplainTarget),

    /// Close the explanation panel
    DismissExplanation,
}
