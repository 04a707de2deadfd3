//! Failure statistics tracking.
//!
//! Counts failed fetches and downloads per `ErrorType` so the application can
//! report what went wrong without the public API exposing error details.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::ErrorType;

/// Per-category failure counters.
///
/// All categories are initialized to zero on creation. Counters are atomic so
/// the stats can be shared behind an `Arc` if a caller needs to.
pub struct FetchStats {
    errors: HashMap<ErrorType, AtomicUsize>,
}

impl FetchStats {
    pub fn new() -> Self {
        let mut errors = HashMap::new();
        for error in ErrorType::iter() {
            errors.insert(error, AtomicUsize::new(0));
        }
        FetchStats { errors }
    }

    /// Increment an error counter.
    pub fn increment_error(&self, error: ErrorType) {
        if let Some(counter) = self.errors.get(&error) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment error counter for {:?} which is not in the map. \
                 This indicates a bug in FetchStats initialization.",
                error
            );
        }
    }

    /// Get the count for an error type.
    pub fn get_error_count(&self, error: ErrorType) -> usize {
        self.errors
            .get(&error)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Get total error count across all error types.
    pub fn total_errors(&self) -> usize {
        ErrorType::iter().map(|e| self.get_error_count(e)).sum()
    }
}

impl Default for FetchStats {
    fn default() -> Self {
        Self::new()
    }
}
