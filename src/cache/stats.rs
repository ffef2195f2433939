//! Cache Statistics Module
//!
//! Diagnostic snapshot of the cache namespace.

use serde::Serialize;

// == Cache Stats ==
/// Entries currently held by the cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of entries in the namespace
    pub count: usize,
    /// Storage keys of those entries, sorted
    pub keys: Vec<String>,
}

impl CacheStats {
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            count: keys.len(),
            keys,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
