//! Domain types persisted in storage and exchanged with the model.
//!
//! Field names follow the camelCase JSON the browser client wrote, so
//! stored chat histories and keyword lists stay readable.

use serde::{Deserialize, Serialize};

// == Arabic Text ==
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArabicWithTranslit {
    /// Arabic script with full harakat
    pub arabic: String,
    /// Phonetic transliteration
    pub translit: String,
}

// == Keywords ==
/// Grammatical class of a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WordType {
    #[serde(rename = "fi'il")]
    Fiil,
    #[serde(rename = "isim")]
    Isim,
    #[serde(rename = "lainnya")]
    Lainnya,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerbForms {
    pub madhi: ArabicWithTranslit,
    pub mudhari: ArabicWithTranslit,
    pub amr: ArabicWithTranslit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NounForms {
    pub singular: ArabicWithTranslit,
    pub plural: ArabicWithTranslit,
}

/// Keyword with its morphological analysis, as returned by extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedKeyword {
    pub indonesian: String,
    pub translation: ArabicWithTranslit,
    #[serde(rename = "type")]
    pub word_type: WordType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<ArabicWithTranslit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verb_forms: Option<VerbForms>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noun_forms: Option<NounForms>,
}

/// Minimal keyword record kept in the saved list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedKeyword {
    pub indonesian: String,
    pub arabic: String,
    pub translit: String,
}

impl SavedKeyword {
    /// Case-insensitive match on any of the three fields.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        [&self.indonesian, &self.arabic, &self.translit]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

impl From<&DetailedKeyword> for SavedKeyword {
    fn from(keyword: &DetailedKeyword) -> Self {
        Self {
            indonesian: keyword.indonesian.clone(),
            arabic: keyword.translation.arabic.clone(),
            translit: keyword.translation.translit.clone(),
        }
    }
}

// == Chat ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordExplanation {
    pub arabic: String,
    pub translit: String,
    pub indonesian: String,
}

/// Structured answer of the translation mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationData {
    pub arabic: String,
    pub translit: String,
    #[serde(default)]
    pub explanation: Vec<WordExplanation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<DetailedKeyword>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageAuthor {
    User,
    Ai,
}

impl MessageAuthor {
    /// Role name used in model conversation history.
    pub fn model_role(self) -> &'static str {
        match self {
            MessageAuthor::User => "user",
            MessageAuthor::Ai => "model",
        }
    }
}

/// Plain text or a structured translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Translation(TranslationData),
}

impl MessageContent {
    /// Text form sent back to the model as conversation history.
    pub fn history_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Translation(data) => serde_json::to_string(data).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub id: String,
    pub author: MessageAuthor,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            author: MessageAuthor::User,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn ai(content: MessageContent) -> Self {
        Self {
            id: new_id(),
            author: MessageAuthor::Ai,
            content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

/// How a chat message is answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// Structured translation with word-by-word explanation
    #[default]
    Translate,
    /// Free-form grammar questions answered in Markdown
    Ask,
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
