//! Explanation Controller
//!
//! One explanation slot for the whole browser, not one per book. It can be
//! filled from the result list or from the detail overlay, for any book.
//!
//! ```text
//!   Idle ──request──▶ Pending ──ok──▶ Ready(text)
//!    ▲                   │
//!    │                   └──err──▶ Failed(fallback)
//!    └──────────── dismiss (from any state)
//! ```
//!
//! Each request gets a token. Under [`CompletionPolicy::LatestOnly`] only the
//! completion carrying the latest token is applied, and dismissing the panel
//! retires the outstanding token so a late answer cannot reopen it. Under
//! [`CompletionPolicy::LastWriterWins`] every completion lands in the slot.

use crate::backend::BackendError;
use crate::book::{BookRecord, BookSummary};
use crate::config::CompletionPolicy;

/// Shown in place of a rationale when the explanation call fails
pub const FALLBACK_MESSAGE: &str = "Could not fetch explanation.";

/// Shown while a rationale is outstanding
pub const PENDING_MESSAGE: &str = "Loading...";

/// Contents of the explanation slot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ExplanationSlot {
    /// Panel closed
    #[default]
    Idle,
    /// Request outstanding
    Pending,
    /// Rationale received
    Ready(String),
    /// Request failed; carries the fallback message
    Failed(String),
}

impl ExplanationSlot {
    /// Whether the panel is shown
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Text to render in the panel
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Pending => Some(PENDING_MESSAGE),
            Self::Ready(text) | Self::Failed(text) => Some(text),
        }
    }
}

/// An explanation request that has been issued and not yet settled
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExplanationTicket {
    /// Token this request was issued under
    pub token: u64,
    /// Payload for the explanation service
    pub summary: BookSummary,
}

/// What settling an explanation did
#[derive(Debug)]
pub enum ExplanationSettlement {
    /// The rationale is now shown
    Ready,
    /// The fallback message is now shown
    Failed {
        /// Why the call failed
        error: BackendError,
    },
    /// A newer request was issued, or the panel dismissed; nothing changed
    Stale,
}

/// Lifecycle of the shared explanation slot
#[derive(Debug)]
pub struct ExplanationController {
    slot: ExplanationSlot,
    /// Book the slot currently speaks about
    subject: Option<BookSummary>,
    /// Token of the request allowed to fill the slot, if any
    latest: Option<u64>,
    next_token: u64,
    policy: CompletionPolicy,
}

impl ExplanationController {
    /// Create an idle controller
    pub fn new(policy: CompletionPolicy) -> Self {
        Self {
            slot: ExplanationSlot::Idle,
            subject: None,
            latest: None,
            next_token: 1,
            policy,
        }
    }

    /// Current slot contents
    pub fn slot(&self) -> &ExplanationSlot {
        &self.slot
    }

    /// Book of the most recent request, while the panel is open
    pub fn subject(&self) -> Option<&BookSummary> {
        self.subject.as_ref()
    }

    /// Whether the panel is shown
    pub fn is_open(&self) -> bool {
        self.slot.is_open()
    }

    /// Mark the slot pending for `book` and hand back the call to make
    pub fn request(&mut self, book: &BookRecord) -> ExplanationTicket {
        let token = self.next_token;
        self.next_token += 1;

        let summary = book.summary();
        self.slot = ExplanationSlot::Pending;
        self.subject = Some(summary.clone());
        self.latest = Some(token);

        tracing::info!(title = %summary.title, token, "Explanation requested");

        ExplanationTicket { token, summary }
    }

    /// Apply the outcome of the request issued under `ticket`
    pub fn settle(
        &mut self,
        ticket: &ExplanationTicket,
        outcome: Result<String, BackendError>,
    ) -> ExplanationSettlement {
        let is_latest = self.latest == Some(ticket.token);
        if !is_latest && !self.policy.applies_stale() {
            tracing::debug!(token = ticket.token, latest = ?self.latest, "Dropping stale explanation");
            return ExplanationSettlement::Stale;
        }

        self.subject = Some(ticket.summary.clone());
        if is_latest {
            self.latest = None;
        }

        match outcome {
            Ok(text) if !text.trim().is_empty() => {
                self.slot = ExplanationSlot::Ready(text);
                ExplanationSettlement::Ready
            }
            Ok(_) => {
                self.slot = ExplanationSlot::Failed(FALLBACK_MESSAGE.to_string());
                ExplanationSettlement::Failed {
                    error: BackendError::EmptyRationale,
                }
            }
            Err(error) => {
                self.slot = ExplanationSlot::Failed(FALLBACK_MESSAGE.to_string());
                ExplanationSettlement::Failed { error }
            }
        }
    }

    /// Close the panel
    pub fn dismiss(&mut self) {
        self.slot = ExplanationSlot::Idle;
        self.subject = None;
        self.latest = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn book(title: &str) -> BookRecord {
        BookRecord::new(title, "Someone", "Something happens.")
    }

    #[test]
    fn test_idle_pending_ready() {
        let mut explain = ExplanationController::new(CompletionPolicy::LatestOnly);
        assert_eq!(explain.slot(), &ExplanationSlot::Idle);
        assert!(!explain.is_open());

        let ticket = explain.request(&book("A"));
        assert_eq!(explain.slot(), &ExplanationSlot::Pending);
        assert_eq!(explain.slot().text(), Some(PENDING_MESSAGE));
        assert_eq!(ticket.summary.title, "A");

        let settlement = explain.settle(&ticket, Ok("Because.".to_string()));
        assert!(matches!(settlement, ExplanationSettlement::Ready));
        assert_eq!(explain.slot(), &ExplanationSlot::Ready("Because.".to_string()));
        assert_eq!(explain.subject().unwrap().title, "A");
    }

    #[test]
    fn test_failure_uses_fallback() {
        let mut explain = ExplanationController::new(CompletionPolicy::LatestOnly);
        let ticket = explain.request(&book("A"));

        let settlement = explain.settle(&ticket, Err(BackendError::Decode("eof".into())));
        assert!(matches!(settlement, ExplanationSettlement::Failed { .. }));
        assert_eq!(
            explain.slot(),
            &ExplanationSlot::Failed(FALLBACK_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_blank_rationale_uses_fallback() {
        let mut explain = ExplanationController::new(CompletionPolicy::LatestOnly);
        let ticket = explain.request(&book("A"));

        explain.settle(&ticket, Ok("  ".to_string()));
        assert_eq!(explain.slot().text(), Some(FALLBACK_MESSAGE));
    }

    #[test]
    fn test_dismiss_from_any_state() {
        let mut explain = ExplanationController::new(CompletionPolicy::LatestOnly);
        explain.dismiss();
        assert_eq!(explain.slot(), &ExplanationSlot::Idle);

        explain.request(&book("A"));
        explain.dismiss();
        assert_eq!(explain.slot(), &ExplanationSlot::Idle);

        let ticket = explain.request(&book("B"));
        explain.settle(&ticket, Ok("Yes.".to_string()));
        explain.dismiss();
        assert_eq!(explain.slot(), &ExplanationSlot::Idle);
        assert!(explain.subject().is_none());
    }

    #[test]
    fn test_stale_answer_is_discarded() {
        let mut explain = ExplanationController::new(CompletionPolicy::LatestOnly);
        let slow = explain.request(&book("Slow"));
        let fast = explain.request(&book("Fast"));

        explain.settle(&fast, Ok("Fast answer".to_string()));
        let settlement = explain.settle(&slow, Ok("Slow answer".to_string()));

        assert!(matches!(settlement, ExplanationSettlement::Stale));
        assert_eq!(explain.slot().text(), Some("Fast answer"));
        assert_eq!(explain.subject().unwrap().title, "Fast");
    }

    #[test]
    fn test_late_answer_after_dismiss_stays_closed() {
        let mut explain = ExplanationController::new(CompletionPolicy::LatestOnly);
        let ticket = explain.request(&book("A"));
        explain.dismiss();

        let settlement = explain.settle(&ticket, Ok("Late".to_string()));
        assert!(matches!(settlement, ExplanationSettlement::Stale));
        assert!(!explain.is_open());
    }

    #[test]
    fn test_last_writer_wins() {
        let mut explain = ExplanationController::new(CompletionPolicy::LastWriterWins);
        let slow = explain.request(&book("Slow"));
        let fast = explain.request(&book("Fast"));

        explain.settle(&fast, Ok("Fast answer".to_string()));
        explain.settle(&slow, Ok("Slow answer".to_string()));

        assert_eq!(explain.slot().text(), Some("Slow answer"));
        assert_eq!(explain.subject().unwrap().title, "Slow");
    }
}
