//! Detail Overlay Controller
//!
//! Holds at most one selected book. The overlay keeps its own copy of the
//! record, so it keeps showing the same book even if a search replaces the
//! result set underneath it.

use crate::book::{BookDetails, BookRecord};

/// Which book, if any, is shown in the detail overlay
#[derive(Clone, Debug, Default)]
pub struct DetailOverlayController {
    selected: Option<BookRecord>,
}

impl DetailOverlayController {
    /// Create a closed overlay
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `book`, replacing any current selection
    pub fn open(&mut self, book: &BookRecord) {
        tracing::debug!(title = %book.title, "Detail overlay opened");
        self.selected = Some(book.clone());
    }

    /// Hide the overlay
    pub fn close(&mut self) {
        self.selected = None;
    }

    /// The selected book
    pub fn selected(&self) -> Option<&BookRecord> {
        self.selected.as_ref()
    }

    /// Whether the overlay is open
    pub fn is_open(&self) -> bool {
        self.selected.is_some()
    }

    /// Display fields of the selected book
    pub fn details(&self) -> Option<BookDetails> {
        self.selected.as_ref().map(BookDetails::from)
    }
}
