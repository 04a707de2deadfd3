//! Error handling and failure statistics.
//!
//! This module provides:
//! - `FetchError`, the structured error carried through the request path
//! - `ErrorType`, the flat category each error is counted under
//! - `FetchStats`, per-category failure counters
//! - `InitializationError` for logger, resolver and TLS setup
//!
//! Callers of `fetch`/`download` only see an empty result; the structured
//! error surfaces through logging and the counters.

mod stats;
mod types;

// Re-export public API
pub use stats::FetchStats;
pub use types::{ErrorType, FetchError, InitializationError};
