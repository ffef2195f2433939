//! Keyword extraction and the saved keyword list.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::prompts::{keyword_schema, KEYWORD_INSTRUCTION};
use super::{load_list, save_list};
use crate::config::Config;
use crate::gemini::{GenerateContentRequest, GenerationConfig, LanguageModel, ModelError};
use crate::models::{DetailedKeyword, SavedKeyword};
use crate::storage::{KeyValueStorage, SharedStorage, StorageResult};

/// Storage key of the saved keyword list.
pub const SAVED_KEYWORDS_KEY: &str = "savedKeywords_v3";

#[derive(Deserialize)]
struct KeywordEnvelope {
    #[serde(default)]
    keywords: Vec<DetailedKeyword>,
}

#[derive(Clone)]
pub struct KeywordService {
    storage: SharedStorage,
    model: Arc<dyn LanguageModel>,
    chat_model: String,
    /// Serializes read-modify-write of the saved list
    write_lock: Arc<Mutex<()>>,
}

impl KeywordService {
    pub fn new(storage: SharedStorage, model: Arc<dyn LanguageModel>, config: &Config) -> Self {
        Self {
            storage,
            model,
            chat_model: config.chat_model.clone(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Asks the model for the important words of an Indonesian sentence.
    ///
    /// Any failure yields an empty list.
    pub async fn extract(&self, text: &str) -> Vec<DetailedKeyword> {
        match self.try_extract(text).await {
            Ok(keywords) => {
                debug!(count = keywords.len(), "Extracted keywords");
                keywords
            }
            Err(e) => {
                warn!(error = %e, "Keyword extraction failed");
                Vec::new()
            }
        }
    }

    async fn try_extract(&self, text: &str) -> Result<Vec<DetailedKeyword>, ModelError> {
        let request = GenerateContentRequest::from_text(text)
            .system_instruction(KEYWORD_INSTRUCTION)
            .generation_config(GenerationConfig::json(keyword_schema()));

        let response = self.model.generate_content(&self.chat_model, &request).await?;
        let body = response
            .text()
            .ok_or_else(|| ModelError::InvalidResponse("empty keyword response".to_string()))?;

        let envelope: KeywordEnvelope = serde_json::from_str(body.trim())
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;
        Ok(envelope.keywords)
    }

    /// Saved keywords in insertion order, optionally filtered by `query`.
    pub fn saved(&self, query: Option<&str>) -> Vec<SavedKeyword> {
        let keywords: Vec<SavedKeyword> = load_list(&self.storage, SAVED_KEYWORDS_KEY);
        match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => keywords.into_iter().filter(|k| k.matches(q)).collect(),
            None => keywords,
        }
    }

    /// Appends keywords whose Indonesian word is not saved yet.
    ///
    /// Comparison is case-insensitive. Returns how many were added.
    pub async fn save(&self, keywords: &[DetailedKeyword]) -> StorageResult<usize> {
        if keywords.is_empty() {
            return Ok(0);
        }

        let _guard = self.write_lock.lock().await;
        let mut saved: Vec<SavedKeyword> = load_list(&self.storage, SAVED_KEYWORDS_KEY);
        let mut known: HashSet<String> = saved.iter().map(|k| k.indonesian.to_lowercase()).collect();

        let before = saved.len();
        for keyword in keywords {
            if known.insert(keyword.indonesian.to_lowercase()) {
                saved.push(SavedKeyword::from(keyword));
            }
        }

        let added = saved.len() - before;
        if added > 0 {
            save_list(&self.storage, SAVED_KEYWORDS_KEY, &saved)?;
            info!(added, total = saved.len(), "Saved new keywords");
        }
        Ok(added)
    }

    /// Removes every saved keyword, returning how many there were.
    pub async fn clear(&self) -> StorageResult<usize> {
        let _guard = self.write_lock.lock().await;
        let count = load_list::<SavedKeyword>(&self.storage, SAVED_KEYWORDS_KEY).len();
        self.storage.clone().remove(SAVED_KEYWORDS_KEY)?;
        info!(count, "Cleared saved keywords");
        Ok(count)
    }
}
