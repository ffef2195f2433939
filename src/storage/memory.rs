//! In-Memory Storage
//!
//! Volatile key-value backend with an optional byte quota.

use std::collections::BTreeMap;

use super::{check_quota, item_size, KeyValueStorage, StorageResult};

// == Memory Storage ==
/// Key-value storage held in process memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    /// Stored items, ordered by key
    items: BTreeMap<String, String>,
    /// Maximum bytes (keys + values), None = unlimited
    quota: Option<usize>,
    /// Bytes currently used
    used: usize,
}

impl MemoryStorage {
    // == Constructor ==
    /// Creates an empty, unlimited storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty storage that rejects writes beyond `quota` bytes.
    pub fn with_quota(quota: Option<usize>) -> Self {
        Self {
            quota,
            ..Self::default()
        }
    }

    /// Bytes currently counted against the quota.
    pub fn used_bytes(&self) -> usize {
        self.used
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let previous = self.items.get(key).map(String::as_str);
        check_quota(self.quota, self.used, key, previous, value)?;

        let freed = previous.map_or(0, |old| item_size(key, old));
        self.used = self.used - freed + item_size(key, value);
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        if let Some(old) = self.items.remove(key) {
            self.used -= item_size(key, &old);
        }
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.items.keys().cloned().collect())
    }

    fn len(&self) -> StorageResult<usize> {
        Ok(self.items.len())
    }
}
