//! Services Module
//!
//! Orchestration between the HTTP surface, the language model and storage:
//! cached speech synthesis, chat sessions, keyword extraction and grammar
//! explanations.

pub mod chat;
pub mod grammar;
pub mod keywords;
pub mod prompts;
pub mod speech;

use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::storage::{KeyValueStorage, SharedStorage, StorageResult};

pub use chat::{ChatService, CHAT_ERROR_MESSAGE, CHAT_HISTORY_KEY, NEW_SESSION_TITLE};
pub use grammar::{GrammarService, EXPLANATION_ERROR_MESSAGE};
pub use keywords::{KeywordService, SAVED_KEYWORDS_KEY};
pub use speech::{SharedCache, Speech, SpeechService};

// == Stored Lists ==
/// Reads a JSON array stored under `key`.
///
/// Missing, unreadable or unparsable values load as an empty list.
pub(crate) fn load_list<T: DeserializeOwned>(storage: &SharedStorage, key: &str) -> Vec<T> {
    match storage.get(key) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(key, error = %e, "Ignoring unparsable stored list");
            Vec::new()
        }),
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!(key, error = %e, "Failed to read stored list");
            Vec::new()
        }
    }
}

/// Writes `items` as a JSON array under `key`.
pub(crate) fn save_list<T: Serialize>(
    storage: &SharedStorage,
    key: &str,
    items: &[T],
) -> StorageResult<()> {
    let json = serde_json::to_string(items)?;
    storage.clone().set(key, &json)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SavedKeyword;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_load_list_missing_and_corrupt() {
        let storage = SharedStorage::new(MemoryStorage::new());
        assert!(load_list::<SavedKeyword>(&storage, "list").is_empty());

        storage.clone().set("list", "{not json").unwrap();
        assert!(load_list::<SavedKeyword>(&storage, "list").is_empty());
    }

    #[test]
    fn test_save_then_load_list() {
        let storage = SharedStorage::new(MemoryStorage::new());
        let items = vec![SavedKeyword {
            indonesian: "air".to_string(),
            arabic: "مَاءٌ".to_string(),
            translit: "mā'un".to_string(),
        }];
        save_list(&storage, "list", &items).unwrap();
        assert_eq!(load_list::<SavedKeyword>(&storage, "list"), items);
    }
}
