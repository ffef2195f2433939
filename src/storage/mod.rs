//! Storage Module
//!
//! Persistent string-keyed key-value substrate shared by the audio cache,
//! chat sessions and saved keywords.

mod file;
mod memory;

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

// == Storage Error ==
/// Failures reported by a storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The write would exceed the backend's byte quota
    #[error("Storage quota exceeded: {0}")]
    QuotaExceeded(String),

    /// The backend cannot be used at all
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Reading or writing the backing file failed
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be encoded or decoded
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

// == Key-Value Storage ==
/// Generic persistent key-value interface.
///
/// Backends must tolerate unrelated writers in the same key space; callers
/// claim a namespace by key prefix and only touch keys inside it.
pub trait KeyValueStorage: Send {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> StorageResult<()>;

    /// Removes every key in `keys` and returns how many were present.
    ///
    /// Backends that persist on each mutation override this to write once
    /// per batch. On error, keys removed before the failure stay removed.
    fn remove_many(&mut self, keys: &[String]) -> StorageResult<usize> {
        let mut removed = 0;
        for key in keys {
            if self.get(key)?.is_some() {
                self.remove(key)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Enumerates every stored key.
    fn keys(&self) -> StorageResult<Vec<String>>;

    /// Number of stored items.
    fn len(&self) -> StorageResult<usize> {
        Ok(self.keys()?.len())
    }

    fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Box<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }

    fn remove_many(&mut self, keys: &[String]) -> StorageResult<usize> {
        (**self).remove_many(keys)
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        (**self).keys()
    }

    fn len(&self) -> StorageResult<usize> {
        (**self).len()
    }
}

// == Shared Storage ==
/// Cloneable handle to one storage backend used by several components.
///
/// Each call takes the inner lock for a single bounded operation only.
#[derive(Clone)]
pub struct SharedStorage {
    inner: Arc<Mutex<Box<dyn KeyValueStorage>>>,
}

impl SharedStorage {
    pub fn new(storage: impl KeyValueStorage + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(storage))),
        }
    }

    /// Opens the backend described by the configuration.
    ///
    /// A configured path selects the JSON file backend, otherwise storage
    /// lives in memory for the lifetime of the process.
    pub fn from_config(config: &crate::config::Config) -> StorageResult<Self> {
        let quota = config.storage_quota();
        match &config.storage_path {
            Some(path) => Ok(Self::new(FileStorage::open(path, quota)?)),
            None => Ok(Self::new(MemoryStorage::with_quota(quota))),
        }
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Box<dyn KeyValueStorage>>> {
        self.inner
            .lock()
            .map_err(|_| StorageError::Unavailable("storage lock poisoned".to_string()))
    }
}

impl std::fmt::Debug for SharedStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedStorage").finish_non_exhaustive()
    }
}

impl KeyValueStorage for SharedStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.lock()?.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.lock()?.set(key, value)
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.lock()?.remove(key)
    }

    fn remove_many(&mut self, keys: &[String]) -> StorageResult<usize> {
        self.lock()?.remove_many(keys)
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        self.lock()?.keys()
    }

    fn len(&self) -> StorageResult<usize> {
        self.lock()?.len()
    }
}

// == Quota Accounting ==
/// Bytes an item occupies against a quota.
pub(crate) fn item_size(key: &str, value: &str) -> usize {
    key.len() + value.len()
}

/// Checks that replacing `previous` with `value` under `key` fits the quota.
pub(crate) fn check_quota(
    quota: Option<usize>,
    used: usize,
    key: &str,
    previous: Option<&str>,
    value: &str,
) -> StorageResult<()> {
    let Some(limit) = quota else {
        return Ok(());
    };

    let freed = previous.map_or(0, |old| item_size(key, old));
    let needed = used.saturating_sub(freed) + item_size(key, value);
    if needed > limit {
        return Err(StorageError::QuotaExceeded(format!(
            "writing '{}' needs {} bytes, quota is {}",
            key, needed, limit
        )));
    }
    Ok(())
}
