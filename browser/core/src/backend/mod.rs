//! Service Backend Integration
//!
//! Abstracted access to the recommendation and explanation services through
//! a common trait interface.
//!
//! # Available Backends
//!
//! - **HTTP**: the JSON service the browser ships against (default)
//!
//! # Usage
//!
//! ```ignore
//! use browser_core::backend::{BookBackend, HttpBackend};
//!
//! let backend = HttpBackend::new("127.0.0.1", 8000, Duration::from_secs(120))?;
//! let books = backend.search("cozy mysteries", 1000).await?;
//! let why = backend.explain(&books[0].summary()).await?;
//! ```

mod http;
mod traits;

pub use http::HttpBackend;
pub use traits::{BackendError, BackendResult, BookBackend};
