//! Eviction Module
//!
//! Capacity enforcement over the cache namespace: the oldest entries go
//! first, unreadable entries before everything else.

use tracing::{debug, warn};

use super::{CacheEntry, CACHE_NAMESPACE};
use crate::storage::{KeyValueStorage, StorageResult};

// == Namespace Keys ==
/// Lists every storage key owned by the cache, sorted.
pub(crate) fn namespace_keys<S: KeyValueStorage + ?Sized>(storage: &S) -> StorageResult<Vec<String>> {
    let mut keys: Vec<String> = storage
        .keys()?
        .into_iter()
        .filter(|key| key.starts_with(CACHE_NAMESPACE))
        .collect();
    keys.sort();
    Ok(keys)
}

/// Creation time of the entry under `key`; 0 when missing or corrupt.
fn stored_timestamp<S: KeyValueStorage + ?Sized>(storage: &S, key: &str) -> u64 {
    storage
        .get(key)
        .ok()
        .flatten()
        .and_then(|raw| CacheEntry::from_json(&raw).ok())
        .map_or(0, |entry| entry.created_at)
}

// == Evict Overflow ==
/// Deletes the oldest namespace entries until at most `max_entries` remain.
///
/// `keep` names the entry that was just written; among equal timestamps it
/// goes last.
///
/// Returns the number of entries removed. Storage failures are logged and
/// end the pass; they never propagate.
pub fn evict_overflow<S: KeyValueStorage + ?Sized>(
    storage: &mut S,
    max_entries: usize,
    keep: Option<&str>,
) -> usize {
    let keys = match namespace_keys(&*storage) {
        Ok(keys) => keys,
        Err(err) => {
            warn!(error = %err, "Audio cache cleanup could not list keys");
            return 0;
        }
    };

    if keys.len() <= max_entries {
        return 0;
    }

    let mut aged: Vec<(String, u64)> = keys
        .into_iter()
        .map(|key| {
            let timestamp = stored_timestamp(&*storage, &key);
            (key, timestamp)
        })
        .collect();

    // Stable: remaining ties keep key order
    aged.sort_by_key(|(key, timestamp)| (*timestamp, keep == Some(key.as_str())));

    let excess = aged.len() - max_entries;
    let victims: Vec<String> = aged.into_iter().take(excess).map(|(key, _)| key).collect();

    match storage.remove_many(&victims) {
        Ok(removed) => {
            debug!(removed, max_entries, "Audio cache cleanup evicted oldest entries");
            removed
        }
        Err(err) => {
            warn!(error = %err, "Audio cache cleanup failed to remove entries");
            0
        }
    }
}
