//! Search Controller
//!
//! Owns the query text, the full result set, the loading flag, and the
//! current page. The outbound call itself is not made here: `submit_query`
//! hands back a [`SearchTicket`] describing the call to make, and the caller
//! reports the outcome through `settle`. That keeps the controller
//! synchronous and lets every transition be tested without a runtime.
//!
//! # Overlapping Searches
//!
//! Every submitted query gets a fresh generation number. Under
//! [`CompletionPolicy::LatestOnly`] a completion whose generation is not the
//! latest is dropped without touching state, so a slow old search can never
//! clobber a newer one. Under [`CompletionPolicy::LastWriterWins`] whichever
//! completion arrives last overwrites results and loading.

use crate::backend::BackendError;
use crate::book::BookRecord;
use crate::config::CompletionPolicy;
use crate::pagination::{self, PageView};

/// A search that has been issued and not yet settled
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchTicket {
    /// Generation this search was issued under
    pub generation: u64,
    /// Trimmed query text
    pub query: String,
    /// Result-count limit
    pub limit: usize,
}

/// What settling a search did
#[derive(Debug)]
pub enum SearchSettlement {
    /// Results were replaced and the page reset to 1
    Applied {
        /// Number of records now held
        count: usize,
    },
    /// The call failed; previous results are kept
    Failed {
        /// Why the call failed
        error: BackendError,
    },
    /// A newer search was issued since; nothing changed
    Stale,
}

/// Query, results, loading flag, and current page
#[derive(Debug)]
pub struct SearchController {
    query: String,
    results: Vec<BookRecord>,
    loading: bool,
    current_page: usize,
    /// Generation of the most recently issued search
    generation: u64,
    limit: usize,
    policy: CompletionPolicy,
}

impl SearchController {
    /// Create an empty controller
    pub fn new(limit: usize, policy: CompletionPolicy) -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            loading: false,
            current_page: 1,
            generation: 0,
            limit,
            policy,
        }
    }

    /// Current query text
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Full result set
    pub fn results(&self) -> &[BookRecord] {
        &self.results
    }

    /// Whether a search is outstanding
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Current page (1-based)
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Total pages of the current result set
    pub fn total_pages(&self) -> usize {
        pagination::total_pages(self.results.len())
    }

    /// Generation of the most recently issued search
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Records on the current page
    pub fn visible(&self) -> &[BookRecord] {
        pagination::visible_slice(&self.results, self.current_page)
    }

    /// Pagination snapshot for rendering
    pub fn page_view(&self) -> PageView {
        PageView::new(self.results.len(), self.current_page)
    }

    /// Record on the current page at `row`
    pub fn visible_book(&self, row: usize) -> Option<&BookRecord> {
        self.visible().get(row)
    }

    /// Replace the query text
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Mutable access for in-place editing by a surface
    pub fn query_mut(&mut self) -> &mut String {
        &mut self.query
    }

    /// Start a search for the current query
    ///
    /// Returns `None` (and changes nothing) when the query is blank.
    pub fn submit_query(&mut self) -> Option<SearchTicket> {
        let query = self.query.trim();
        if query.is_empty() {
            return None;
        }

        self.generation += 1;
        self.loading = true;

        tracing::info!(query = %query, generation = self.generation, "Search submitted");

        Some(SearchTicket {
            generation: self.generation,
            query: query.to_string(),
            limit: self.limit,
        })
    }

    /// Apply the outcome of the search issued under `ticket`
    pub fn settle(
        &mut self,
        ticket: &SearchTicket,
        outcome: Result<Vec<BookRecord>, BackendError>,
    ) -> SearchSettlement {
        let is_latest = ticket.generation == self.generation;
        if !is_latest && !self.policy.applies_stale() {
            tracing::debug!(
                generation = ticket.generation,
                latest = self.generation,
                "Dropping stale search completion"
            );
            return SearchSettlement::Stale;
        }

        self.loading = false;

        match outcome {
            Ok(results) => {
                let count = results.len();
                self.results = results;
                self.current_page = 1;
                tracing::info!(
                    query = %ticket.query,
                    generation = ticket.generation,
                    count,
                    "Search settled"
                );
                SearchSettlement::Applied { count }
            }
            Err(error) => SearchSettlement::Failed { error },
        }
    }

    /// Move to `target` if it names an existing page
    ///
    /// Returns whether the page changed. Out-of-range targets are ignored.
    pub fn change_page(&mut self, target: usize) -> bool {
        if !pagination::is_valid_page(target, self.results.len()) {
            tracing::debug!(page = target, total = self.total_pages(), "Ignoring out-of-range page");
            return false;
        }
        self.current_page = target;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn books(n: usize) -> Vec<BookRecord> {
        (0..n)
            .map(|i| BookRecord::new(format!("Book {i}"), "Author", "About"))
            .collect()
    }

    fn controller() -> SearchController {
        SearchController::new(1000, CompletionPolicy::LatestOnly)
    }

    fn loaded(n: usize) -> SearchController {
        let mut search = controller();
        search.set_query("anything");
        let ticket = search.submit_query().unwrap();
        search.settle(&ticket, Ok(books(n)));
        search
    }

    #[test]
    fn test_blank_query_is_noop() {
        let mut search = loaded(45);
        search.change_page(2);
        let generation = search.generation();

        for blank in ["", "   ", "\t\n"] {
            search.set_query(blank);
            assert_eq!(search.submit_query(), None);
        }

        assert_eq!(search.results().len(), 45);
        assert!(!search.is_loading());
        assert_eq!(search.current_page(), 2);
        assert_eq!(search.generation(), generation);
    }

    #[test]
    fn test_submit_sets_loading_and_trims() {
        let mut search = controller();
        search.set_query("  space opera ");
        let ticket = search.submit_query().unwrap();

        assert!(search.is_loading());
        assert_eq!(ticket.query, "space opera");
        assert_eq!(ticket.limit, 1000);
        assert_eq!(ticket.generation, 1);
    }

    #[test]
    fn test_success_replaces_results_and_resets_page() {
        let mut search = loaded(100);
        assert!(search.change_page(4));

        search.set_query("other");
        let ticket = search.submit_query().unwrap();
        let settlement = search.settle(&ticket, Ok(books(30)));

        assert!(matches!(settlement, SearchSettlement::Applied { count: 30 }));
        assert_eq!(search.results().len(), 30);
        assert_eq!(search.current_page(), 1);
        assert!(!search.is_loading());
    }

    #[test]
    fn test_failure_keeps_results() {
        let mut search = loaded(25);
        search.change_page(2);

        let ticket = search.submit_query().unwrap();
        let settlement = search.settle(&ticket, Err(BackendError::Service("down".into())));

        assert!(matches!(settlement, SearchSettlement::Failed { .. }));
        assert_eq!(search.results().len(), 25);
        assert_eq!(search.current_page(), 2);
        assert!(!search.is_loading());
    }

    #[test]
    fn test_stale_completion_is_dropped() {
        let mut search = controller();
        search.set_query("first");
        let first = search.submit_query().unwrap();
        search.set_query("second");
        let second = search.submit_query().unwrap();

        let settlement = search.settle(&second, Ok(books(3)));
        assert!(matches!(settlement, SearchSettlement::Applied { count: 3 }));

        let settlement = search.settle(&first, Ok(books(50)));
        assert!(matches!(settlement, SearchSettlement::Stale));
        assert_eq!(search.results().len(), 3);
    }

    #[test]
    fn test_stale_completion_keeps_loading_for_latest() {
        let mut search = controller();
        search.set_query("first");
        let first = search.submit_query().unwrap();
        let _second = search.submit_query().unwrap();

        search.settle(&first, Err(BackendError::EmptyRationale));
        assert!(search.is_loading());
    }

    #[test]
    fn test_last_writer_wins_applies_stale() {
        let mut search = SearchController::new(1000, CompletionPolicy::LastWriterWins);
        search.set_query("q");
        let first = search.submit_query().unwrap();
        let second = search.submit_query().unwrap();

        search.settle(&second, Ok(books(3)));
        let settlement = search.settle(&first, Ok(books(50)));

        assert!(matches!(settlement, SearchSettlement::Applied { count: 50 }));
        assert_eq!(search.results().len(), 50);
    }

    #[test]
    fn test_change_page_bounds() {
        let mut search = loaded(41);
        assert_eq!(search.total_pages(), 3);

        assert!(!search.change_page(0));
        assert!(!search.change_page(4));
        assert_eq!(search.current_page(), 1);

        assert!(search.change_page(3));
        assert_eq!(search.current_page(), 3);
        assert_eq!(search.visible().len(), 1);
        assert_eq!(search.visible_book(0).unwrap().title, "Book 40");
    }

    #[test]
    fn test_change_page_with_no_results() {
        let mut search = controller();
        assert!(!search.change_page(1));
        assert_eq!(search.current_page(), 1);
        assert!(!search.page_view().has_pages());
    }
}
