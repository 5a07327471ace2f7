//! Browser Core - Headless Interaction Core for Book Recommendations
//!
//! This crate holds the interaction state of the book recommendation
//! browser, completely independent of any UI framework. It can drive a TUI,
//! a GUI, or run headless for testing.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                           UI Surface                             │
//! │                    (bookrec-tui / headless)                      │
//! └───────────────┬───────────────────────────────▲──────────────────┘
//!                 │ UserAction (up)               │ BrowserNotice (down)
//! ┌───────────────▼───────────────────────────────┴──────────────────┐
//! │                            Browser                               │
//! │  ┌────────────┐  ┌────────────┐  ┌────────────┐  ┌─────────────┐ │
//! │  │   Search   │─▶│ Pagination │  │   Detail   │  │ Explanation │ │
//! │  │ Controller │  │  (pure fn) │  │  Overlay   │  │ Controller  │ │
//! │  └─────┬──────┘  └────────────┘  └────────────┘  └──────┬──────┘ │
//! │        │ search()          Completion ▲                 │ explain│
//! └────────┼──────────────────────────────┼─────────────────┼────────┘
//!          ▼                              │                 ▼
//!   ┌─────────────────────────────────────┴──────────────────────┐
//!   │              BookBackend (HttpBackend, mocks)               │
//!   └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Browser`]: owns every controller and applies completions
//! - [`UserAction`]: actions sent from a surface to the browser
//! - [`BrowserNotice`]: fire-and-forget messages from the browser
//! - [`BookRecord`]: one recommendation result
//! - [`BookBackend`]: the recommendation/explanation service interface
//!
//! # Quick Start
//!
//! ```ignore
//! use browser_core::{Browser, BrowserConfig, HttpBackend, UserAction};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BrowserConfig::from_env();
//!     let backend = HttpBackend::from_config(&config.service)?;
//!     let (tx, mut rx) = mpsc::channel(100);
//!     let mut browser = Browser::new(backend, config, tx);
//!
//!     browser.handle_action(UserAction::SetQuery("slow-burn mysteries".into())).await;
//!     browser.handle_action(UserAction::SubmitQuery).await;
//!     browser.settle_all().await;
//!
//!     for book in browser.search().visible() {
//!         println!("{} - {}", book.title, book.authors);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod book;
pub mod browser;
pub mod config;
pub mod events;
pub mod explanation;
pub mod messages;
pub mod overlay;
pub mod pagination;
pub mod search;

// Re-exports for convenience
pub use backend::{BackendError, BackendResult, BookBackend, HttpBackend};
pub use book::{BookDetails, BookRecord, BookSummary, PurchaseLink};
pub use browser::Browser;
pub use config::{
    default_config_path, load_config, load_config_from_path, BrowserConfig, CompletionPolicy,
    ConfigError, ConfigOverrides, ConfigSource, SearchConfig, ServiceConfig,
};
pub use events::{ExplainTarget, UserAction};
pub use explanation::{
    ExplanationController, ExplanationSettlement, ExplanationSlot, ExplanationTicket,
    FALLBACK_MESSAGE, PENDING_MESSAGE,
};
pub use messages::{BrowserNotice, Completion};
pub use overlay::DetailOverlayController;
pub use pagination::{PageItem, PageView, PAGE_SIZE};
pub use search::{SearchController, SearchSettlement, SearchTicket};
