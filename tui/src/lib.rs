//! Bookrec TUI - Terminal interface for the book recommendation browser
//!
//! A full-screen terminal surface over [`browser_core`]: a query bar, a
//! paginated result list, a detail overlay, and an explanation panel.
//!
//! # Architecture
//!
//! - **App**: event loop, key bindings, and frame rendering
//! - **Status**: status line derived from browser notices
//! - **Widgets**: wrapped text blocks and the pagination bar
//! - **Cli**: command-line arguments mapped onto config overrides

#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;
pub mod status;
pub mod theme;
pub mod widgets;

pub use app::{App, Focus};
pub use cli::Args;
