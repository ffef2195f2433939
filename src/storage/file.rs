//! File Storage
//!
//! Key-value backend persisted as a single JSON object on disk.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{check_quota, item_size, KeyValueStorage, StorageResult};

// == File Storage ==
/// Key-value storage that survives process restarts.
///
/// Every mutation rewrites the whole file through a temporary sibling and a
/// rename, so a crash leaves either the old or the new contents.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
    quota: Option<usize>,
    used: usize,
}

impl FileStorage {
    // == Constructor ==
    /// Opens the storage file at `path`, creating an empty store if the file
    /// does not exist yet.
    pub fn open(path: impl AsRef<Path>, quota: Option<usize>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        let items: BTreeMap<String, String> = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };

        let used = items.iter().map(|(k, v)| item_size(k, v)).sum();
        debug!(path = %path.display(), items = items.len(), "Opened file storage");

        Ok(Self {
            path,
            items,
            quota,
            used,
        })
    }

    fn persist(&self) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec(&self.items)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let previous = self.items.get(key).map(String::as_str);
        check_quota(self.quota, self.used, key, previous, value)?;

        let previous = self.items.insert(key.to_string(), value.to_string());
        if let Err(err) = self.persist() {
            // Keep memory and disk in agreement
            match previous {
                Some(old) => self.items.insert(key.to_string(), old),
                None => self.items.remove(key),
            };
            return Err(err);
        }

        let freed = previous.map_or(0, |old| item_size(key, &old));
        self.used = self.used - freed + item_size(key, value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        let Some(old) = self.items.remove(key) else {
            return Ok(());
        };

        if let Err(err) = self.persist() {
            self.items.insert(key.to_string(), old);
            return Err(err);
        }

        self.used -= item_size(key, &old);
        Ok(())
    }

    fn remove_many(&mut self, keys: &[String]) -> StorageResult<usize> {
        let removed: Vec<(String, String)> = keys
            .iter()
            .filter_map(|key| self.items.remove_entry(key.as_str()))
            .collect();
        if removed.is_empty() {
            return Ok(0);
        }

        // One rewrite for the whole batch
        if let Err(err) = self.persist() {
            self.items.extend(removed);
            return Err(err);
        }

        let freed: usize = removed.iter().map(|(k, v)| item_size(k, v)).sum();
        self.used -= freed;
        debug!(count = removed.len(), "Removed batch from file storage");
        Ok(removed.len())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.items.keys().cloned().collect())
    }

    fn len(&self) -> StorageResult<usize> {
        Ok(self.items.len())
    }
}
