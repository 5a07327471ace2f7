//! Browser - The Interaction Core
//!
//! The Browser owns the four pieces of interaction state and is the only
//! thing that writes them:
//!
//! - [`SearchController`]: query, results, loading flag, current page
//! - pagination, derived on read from the search state
//! - [`DetailOverlayController`]: the selected book
//! - [`ExplanationController`]: the shared explanation slot
//!
//! # Threading
//!
//! All state lives on one control thread. The two outbound calls run as
//! spawned tasks that only do I/O: each sends a [`Completion`] back over a
//! channel, and the browser applies it when the surface calls
//! [`Browser::poll_completions`] or [`Browser::apply_completion`]. Completion
//! handlers therefore never race user-triggered handlers; the only ordering
//! hazard is the order completions arrive in, which the controllers resolve
//! with tickets.
//!
//! Nothing is ever cancelled. Every issued call runs to completion and its
//! completion is always applied (or recognised as stale).

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::backend::BookBackend;
use crate::book::BookRecord;
use crate::config::BrowserConfig;
use crate::events::{ExplainTarget, UserAction};
use crate::explanation::{ExplanationController, ExplanationSettlement, ExplanationTicket};
use crate::messages::{BrowserNotice, Completion};
use crate::overlay::DetailOverlayController;
use crate::pagination::PageView;
use crate::search::{SearchController, SearchSettlement, SearchTicket};

/// The browser - headless interaction core
pub struct Browser<B: BookBackend> {
    /// Configuration
    config: BrowserConfig,
    /// Recommendation/explanation backend
    backend: Arc<B>,
    /// Query and results
    search: SearchController,
    /// Selected book
    overlay: DetailOverlayController,
    /// Shared explanation slot
    explanation: ExplanationController,
    /// Sender handed to spawned calls
    completion_tx: mpsc::UnboundedSender<Completion>,
    /// Completions waiting to be applied
    completion_rx: mpsc::UnboundedReceiver<Completion>,
    /// Calls issued but not yet applied
    in_flight: usize,
    /// Channel to send notices to the surface
    tx: mpsc::Sender<BrowserNotice>,
}

impl<B: BookBackend + 'static> Browser<B> {
    /// Create a new Browser with the given backend
    pub fn new(backend: B, config: BrowserConfig, tx: mpsc::Sender<BrowserNotice>) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();

        Self {
            search: SearchController::new(config.search.limit, config.completion_policy),
            overlay: DetailOverlayController::new(),
            explanation: ExplanationController::new(config.completion_policy),
            config,
            backend: Arc::new(backend),
            completion_tx,
            completion_rx,
            in_flight: 0,
            tx,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Search state
    pub fn search(&self) -> &SearchController {
        &self.search
    }

    /// Detail overlay state
    pub fn overlay(&self) -> &DetailOverlayController {
        &self.overlay
    }

    /// Explanation state
    pub fn explanation(&self) -> &ExplanationController {
        &self.explanation
    }

    /// Pagination snapshot for the current results and page
    pub fn page_view(&self) -> PageView {
        self.search.page_view()
    }

    /// Calls issued whose completions have not been applied yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Check the backend and report if it is unreachable
    ///
    /// The browser works without this; a failed check only produces a
    /// notice, since the first real call may still succeed.
    pub async fn start(&mut self) {
        if !self.backend.health_check().await {
            tracing::warn!(backend = self.backend.name(), "Backend not reachable");
            self.send(BrowserNotice::BackendUnavailable {
                backend: self.backend.name().to_string(),
            });
        }
    }

    /// Handle an action from the surface
    pub async fn handle_action(&mut self, action: UserAction) {
        match action {
            UserAction::SetQuery(query) => {
                self.search.set_query(query);
            }

            UserAction::SubmitQuery => {
                if let Some(ticket) = self.search.submit_query() {
                    self.spawn_search(ticket);
                }
            }

            UserAction::ChangePage(target) => {
                self.change_page(target);
            }

            UserAction::NextPage => {
                if let Some(target) = self.page_view().next() {
                    self.change_page(target);
                }
            }

            UserAction::PrevPage => {
                if let Some(target) = self.page_view().prev() {
                    self.change_page(target);
                }
            }

            UserAction::OpenDetail { row } => match self.search.visible_book(row) {
                Some(book) => self.overlay.open(book),
                None => tracing::debug!(row, "No book at row"),
            },

            UserAction::CloseDetail => {
                self.overlay.close();
            }

            UserAction::RequestExplanation(target) => {
                let book = match target {
                    ExplainTarget::Row(row) => self.search.visible_book(row).cloned(),
                    ExplainTarget::Selected => self.overlay.selected().cloned(),
                };
                match book {
                    Some(book) => self.request_explanation(&book),
                    None => tracing::debug!(explain_target = ?target, "No book to explain"),
                }
            }

            UserAction::DismissExplanation => {
                self.explanation.dismiss();
            }
        }
    }

    /// Ask for an explanation of any book, listed or not
    pub fn request_explanation(&mut self, book: &BookRecord) {
        let ticket = self.explanation.request(book);
        self.spawn_explanation(ticket);
    }

    fn change_page(&mut self, target: usize) {
        if self.search.change_page(target) {
            self.send(BrowserNotice::ScrollToTop);
        }
    }

    fn spawn_search(&mut self, ticket: SearchTicket) {
        let backend = Arc::clone(&self.backend);
        let tx = self.completion_tx.clone();
        self.in_flight += 1;

        tokio::spawn(async move {
            let outcome = backend.search(&ticket.query, ticket.limit).await;
            let _ = tx.send(Completion::Search { ticket, outcome });
        });
    }

    fn spawn_explanation(&mut self, ticket: ExplanationTicket) {
        let backend = Arc::clone(&self.backend);
        let tx = self.completion_tx.clone();
        self.in_flight += 1;

        tokio::spawn(async move {
            let outcome = backend.explain(&ticket.summary).await;
            let _ = tx.send(Completion::Explanation { ticket, outcome });
        });
    }

    /// Apply every completion that has already arrived (non-blocking)
    ///
    /// Returns whether anything was applied.
    pub async fn poll_completions(&mut self) -> bool {
        let mut applied = false;
        while let Ok(completion) = self.completion_rx.try_recv() {
            self.apply_completion(completion).await;
            applied = true;
        }
        applied
    }

    /// Wait for the next completion
    ///
    /// Pending forever when nothing is in flight, which makes it safe to use
    /// as a `tokio::select!` branch.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        self.completion_rx.recv().await
    }

    /// Wait until every issued call has completed and been applied
    ///
    /// The notice channel does not need to be drained meanwhile.
    pub async fn settle_all(&mut self) {
        while self.in_flight > 0 {
            match self.completion_rx.recv().await {
                Some(completion) => self.apply_completion(completion).await,
                None => break,
            }
        }
    }

    /// Apply one completion to state
    pub async fn apply_completion(&mut self, completion: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match completion {
            Completion::Search { ticket, outcome } => {
                match self.search.settle(&ticket, outcome) {
                    SearchSettlement::Applied { count } => {
                        self.send(BrowserNotice::SearchCompleted {
                            query: ticket.query,
                            count,
                        });
                    }
                    SearchSettlement::Failed { error } => {
                        tracing::warn!(query = %ticket.query, error = %error, "Search failed");
                        self.send(BrowserNotice::SearchFailed {
                            query: ticket.query,
                            error: error.to_string(),
                        });
                    }
                    SearchSettlement::Stale => {}
                }
            }

            Completion::Explanation { ticket, outcome } => {
                match self.explanation.settle(&ticket, outcome) {
                    ExplanationSettlement::Ready | ExplanationSettlement::Stale => {}
                    ExplanationSettlement::Failed { error } => {
                        tracing::warn!(
                            title = %ticket.summary.title,
                            error = %error,
                            "Explanation failed"
                        );
                        self.send(BrowserNotice::ExplanationFailed {
                            title: ticket.summary.title,
                            error: error.to_string(),
                        });
                    }
                }
            }
        }
    }

    /// Send a notice to the surface
    ///
    /// Never waits: a notice that does not fit in the channel is dropped and
    /// logged, so applying completions cannot stall on a surface that is not
    /// reading.
    fn send(&self, notice: BrowserNotice) {
        match self.tx.try_send(notice) {
            Ok(()) => {}
            Err(TrySendError::Full(notice)) => {
                tracing::warn!(?notice, "Notice channel full; dropping notice");
            }
            Err(TrySendError::Closed(_)) => {
                tracing::warn!("Notice channel closed; surface is gone");
            }
        }
    }
}
