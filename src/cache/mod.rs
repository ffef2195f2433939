//! Cache Module
//!
//! Persistent audio cache with TTL expiration and write-time eviction,
//! layered over a generic key-value storage.

mod clock;
mod entry;
mod eviction;
mod key;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use eviction::evict_overflow;
pub use key::{derive_key, hash_text};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Prefix shared by every audio cache key
pub const CACHE_PREFIX: &str = "audio_cache_";

/// Format version of stored entries
pub const CACHE_VERSION: &str = "v1";

/// Key namespace owned by the cache: prefix, version and separator
pub const CACHE_NAMESPACE: &str = "audio_cache_v1_";

/// Maximum number of cached audio items
pub const DEFAULT_MAX_ENTRIES: usize = 50;

/// Entry lifetime in milliseconds (1 hour)
pub const DEFAULT_TTL_MS: u64 = 60 * 60 * 1000;
