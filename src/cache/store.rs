//! Cache Store Module
//!
//! Audio cache engine: derived keys, TTL checks on read, collision guard and
//! capacity eviction on write, all over a pluggable key-value storage.

use tracing::{debug, warn};

use super::eviction::{evict_overflow, namespace_keys};
use super::{
    derive_key, CacheEntry, CacheStats, Clock, SystemClock, DEFAULT_MAX_ENTRIES, DEFAULT_TTL_MS,
};
use crate::storage::{KeyValueStorage, StorageError, StorageResult};

/// Characters of source text shown in log lines.
const LOG_PREVIEW_CHARS: usize = 50;

fn preview(text: &str) -> String {
    text.chars().take(LOG_PREVIEW_CHARS).collect()
}

// == Cache Store ==
/// Time- and size-bounded audio cache keyed by source text.
///
/// Every failure of the underlying storage degrades to a miss on read and to
/// a skipped write on `put`; nothing is reported to the caller.
#[derive(Debug)]
pub struct CacheStore<S, C = SystemClock> {
    /// Key-value substrate holding the namespace
    storage: S,
    /// Time source for entry timestamps
    clock: C,
    /// Maximum number of entries kept after a write
    max_entries: usize,
    /// Entry lifetime in milliseconds
    ttl_ms: u64,
}

impl<S: KeyValueStorage> CacheStore<S, SystemClock> {
    // == Constructor ==
    /// Creates a cache with the default capacity (50) and TTL (1 hour).
    pub fn new(storage: S) -> Self {
        Self::with_clock(storage, SystemClock, DEFAULT_MAX_ENTRIES, DEFAULT_TTL_MS)
    }

    /// Creates a cache using the capacity and TTL from configuration.
    pub fn from_config(storage: S, config: &crate::config::Config) -> Self {
        Self::with_clock(
            storage,
            SystemClock,
            config.cache_max_entries,
            config.cache_ttl_ms,
        )
    }
}

impl<S: KeyValueStorage, C: Clock> CacheStore<S, C> {
    /// Creates a cache with an explicit clock, capacity and TTL.
    pub fn with_clock(storage: S, clock: C, max_entries: usize, ttl_ms: u64) -> Self {
        Self {
            storage,
            clock,
            max_entries,
            ttl_ms,
        }
    }

    // == Get ==
    /// Looks up the payload cached for `source_text`.
    ///
    /// An expired entry is deleted and reported as a miss. An entry whose
    /// stored text differs (a key collision) or that cannot be parsed is left
    /// in place and also reported as a miss.
    pub fn get(&mut self, source_text: &str) -> Option<String> {
        let key = derive_key(source_text);

        let raw = match self.storage.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("Audio cache miss: {}", preview(source_text));
                return None;
            }
            Err(err) => {
                warn!(error = %err, "Error reading audio cache");
                return None;
            }
        };

        let entry = match CacheEntry::from_json(&raw) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, key = %key, "Unreadable audio cache entry");
                return None;
            }
        };

        if entry.is_expired(self.clock.now_ms(), self.ttl_ms) {
            debug!("Audio cache expired: {}", preview(source_text));
            if let Err(err) = self.storage.remove(&key) {
                warn!(error = %err, key = %key, "Failed to remove expired audio cache entry");
            }
            return None;
        }

        if entry.source_text != source_text {
            debug!(key = %key, "Audio cache key collision, treating as miss");
            return None;
        }

        debug!("Audio cache hit: {}", preview(source_text));
        Some(entry.payload)
    }

    // == Put ==
    /// Stores `payload` for `source_text`, replacing any entry at its key.
    ///
    /// A successful write is followed by a cleanup pass. When the storage is
    /// full, one cleanup pass runs and the write is retried exactly once; if
    /// that also fails the payload is simply not cached.
    pub fn put(&mut self, source_text: &str, payload: &str) {
        let key = derive_key(source_text);

        match self.write_entry(&key, source_text, payload) {
            Ok(()) => {
                debug!("Audio cached: {}", preview(source_text));
                self.evict(Some(key.as_str()));
            }
            Err(StorageError::QuotaExceeded(reason)) => {
                warn!(%reason, "Audio cache storage full, evicting and retrying once");
                self.cleanup();
                match self.write_entry(&key, source_text, payload) {
                    Ok(()) => {
                        debug!("Audio cached after cleanup: {}", preview(source_text));
                        self.evict(Some(key.as_str()));
                    }
                    Err(err) => {
                        warn!(error = %err, "Failed to cache audio even after cleanup");
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "Error caching audio");
            }
        }
    }

    fn write_entry(&mut self, key: &str, source_text: &str, payload: &str) -> StorageResult<()> {
        let entry = CacheEntry::new(source_text, payload, self.clock.now_ms());
        let raw = entry.to_json()?;
        self.storage.set(key, &raw)
    }

    // == Cleanup ==
    /// Evicts the oldest entries beyond capacity. Returns how many went.
    pub fn cleanup(&mut self) -> usize {
        self.evict(None)
    }

    fn evict(&mut self, just_written: Option<&str>) -> usize {
        evict_overflow(&mut self.storage, self.max_entries, just_written)
    }

    // == Clear ==
    /// Removes every entry in the cache namespace and nothing else.
    ///
    /// Returns the number of entries removed.
    pub fn clear(&mut self) -> usize {
        let keys = match namespace_keys(&self.storage) {
            Ok(keys) => keys,
            Err(err) => {
                warn!(error = %err, "Failed to list audio cache for clearing");
                return 0;
            }
        };

        let removed = match self.storage.remove_many(&keys) {
            Ok(removed) => removed,
            Err(err) => {
                warn!(error = %err, "Failed to clear audio cache");
                0
            }
        };

        debug!(removed, "Audio cache cleared");
        removed
    }

    // == Stats ==
    /// Returns the entries currently in the namespace.
    pub fn stats(&self) -> CacheStats {
        match namespace_keys(&self.storage) {
            Ok(keys) => CacheStats::new(keys),
            Err(err) => {
                warn!(error = %err, "Failed to read audio cache stats");
                CacheStats::default()
            }
        }
    }

    /// Borrows the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }
}
