//! Status Line State
//!
//! Derived from [`BrowserNotice`]s. The surface owns no other copy of
//! browser state; this is just the last thing worth telling the user, with
//! a lifetime so informational messages fade.

use std::time::Duration;

use browser_core::BrowserNotice;

/// How long informational messages stay up
const INFO_TTL: Duration = Duration::from_secs(4);

/// How long errors stay up
const ERROR_TTL: Duration = Duration::from_secs(10);

/// Severity of a status message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    /// Something finished
    Info,
    /// Something failed
    Error,
}

/// A message in the status line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    /// Text shown
    pub text: String,
    /// Severity
    pub kind: StatusKind,
}

/// Status line state
#[derive(Debug, Default)]
pub struct StatusLine {
    current: Option<StatusMessage>,
    remaining: Duration,
}

impl StatusLine {
    /// Empty status line
    pub fn new() -> Self {
        Self::default()
    }

    /// Message to show, if any
    pub fn current(&self) -> Option<&StatusMessage> {
        self.current.as_ref()
    }

    /// Apply a notice from the browser
    pub fn apply_notice(&mut self, notice: &BrowserNotice) {
        let (text, kind) = match notice {
            BrowserNotice::ScrollToTop => return,
            BrowserNotice::SearchCompleted { query, count } => (
                format!("{count} books for \"{query}\""),
                StatusKind::Info,
            ),
            BrowserNotice::SearchFailed { query, error } => (
                format!("Search for \"{query}\" failed: {error}"),
                StatusKind::Error,
            ),
            BrowserNotice::ExplanationFailed { title, error } => (
                format!("No explanation for \"{title}\": {error}"),
                StatusKind::Error,
            ),
            BrowserNotice::BackendUnavailable { backend } => (
                format!("{backend} service is not reachable"),
                StatusKind::Error,
            ),
        };

        self.remaining = match kind {
            StatusKind::Info => INFO_TTL,
            StatusKind::Error => ERROR_TTL,
        };
        self.current = Some(StatusMessage { text, kind });
    }

    /// Advance timers
    pub fn update(&mut self, delta: Duration) {
        if self.current.is_none() {
            return;
        }
        self.remaining = self.remaining.saturating_sub(delta);
        if self.remaining.is_zero() {
            self.current = None;
        }
    }
}
