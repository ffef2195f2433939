//! Response DTOs for the tutor API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use super::domain::{DetailedKeyword, SavedKeyword};

/// Response body for speech synthesis (POST /speech)
#[derive(Debug, Clone, Serialize)]
pub struct SpeechResponse {
    /// The spoken text
    pub text: String,
    /// Base64 encoded audio
    pub audio: String,
    /// Whether the audio came from the local cache
    pub cached: bool,
}

impl SpeechResponse {
    pub fn new(text: impl Into<String>, audio: impl Into<String>, cached: bool) -> Self {
        Self {
            text: text.into(),
            audio: audio.into(),
            cached,
        }
    }
}

/// Response body for bulk removals (DELETE /cache, DELETE /keywords)
#[derive(Debug, Clone, Serialize)]
pub struct ClearedResponse {
    pub message: String,
    /// Number of items removed
    pub removed: usize,
}

impl ClearedResponse {
    pub fn new(what: &str, removed: usize) -> Self {
        Self {
            message: format!("Cleared {} {}", removed, what),
            removed,
        }
    }
}

/// Response body for keyword extraction (POST /keywords/extract)
#[derive(Debug, Clone, Serialize)]
pub struct KeywordsResponse {
    pub keywords: Vec<DetailedKeyword>,
    /// Number of keywords newly added to the saved list
    pub saved: usize,
}

/// Response body for the saved keyword list (GET /keywords)
#[derive(Debug, Clone, Serialize)]
pub struct SavedKeywordsResponse {
    pub keywords: Vec<SavedKeyword>,
    pub total: usize,
}

impl SavedKeywordsResponse {
    pub fn new(keywords: Vec<SavedKeyword>) -> Self {
        Self {
            total: keywords.len(),
            keywords,
        }
    }
}

/// Response body for a grammar explanation (POST /grammar/explain)
#[derive(Debug, Clone, Serialize)]
pub struct ExplanationResponse {
    /// Markdown text
    pub explanation: String,
}

/// Response body for delete operations
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// Identifier of what was deleted
    pub id: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(what: &str, id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            message: format!("{} '{}' deleted successfully", what, id),
            id,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
