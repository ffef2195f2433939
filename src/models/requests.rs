//! Request DTOs for the tutor API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use super::domain::ChatMode;

fn require(field: &str, value: &str) -> Option<String> {
    value
        .trim()
        .is_empty()
        .then(|| format!("{} cannot be empty", field))
}

/// Request body for speech synthesis (POST /speech)
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechRequest {
    /// Text to speak, usually Arabic
    pub text: String,
}

impl SpeechRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        require("Text", &self.text)
    }
}

/// Request body for sending a chat message (POST /sessions/:id/messages)
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
    /// Defaults to translation
    #[serde(default)]
    pub mode: ChatMode,
}

impl SendMessageRequest {
    pub fn validate(&self) -> Option<String> {
        require("Message", &self.text)
    }
}

/// Request body for keyword extraction (POST /keywords/extract)
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractKeywordsRequest {
    /// Indonesian sentence
    pub text: String,
}

impl ExtractKeywordsRequest {
    pub fn validate(&self) -> Option<String> {
        require("Text", &self.text)
    }
}

/// Query string for the saved keyword list (GET /keywords?q=)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeywordQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// Request body for a grammar explanation (POST /grammar/explain)
#[derive(Debug, Clone, Deserialize)]
pub struct ExplainRequest {
    /// Grammar concept, e.g. "dhamir muttashil"
    pub concept: String,
    pub arabic: String,
    #[serde(default)]
    pub translit: String,
}

impl ExplainRequest {
    pub fn validate(&self) -> Option<String> {
        require("Concept", &self.concept).or_else(|| require("Arabic word", &self.arabic))
    }
}
