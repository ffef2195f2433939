//! Cache Entry Module
//!
//! Defines the stored form of a cached audio payload.

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A cached synthesis result together with the text it was produced from.
///
/// Serialized as `{"text", "audio", "timestamp"}` so entries written by the
/// browser client stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Text the payload was synthesized from, used to detect key collisions
    #[serde(rename = "text")]
    pub source_text: String,
    /// Base64 audio payload
    #[serde(rename = "audio")]
    pub payload: String,
    /// Creation timestamp (Unix milliseconds)
    #[serde(rename = "timestamp")]
    pub created_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    pub fn new(source_text: impl Into<String>, payload: impl Into<String>, created_at: u64) -> Self {
        Self {
            source_text: source_text.into(),
            payload: payload.into(),
            created_at,
        }
    }

    // == Age ==
    /// Milliseconds elapsed since creation; 0 if `now_ms` is earlier.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.created_at)
    }

    // == Is Expired ==
    /// Checks if the entry has outlived `ttl_ms`.
    ///
    /// Boundary condition: an entry exactly `ttl_ms` old is still valid; it
    /// expires one millisecond later.
    pub fn is_expired(&self, now_ms: u64, ttl_ms: u64) -> bool {
        self.age_ms(now_ms) > ttl_ms
    }

    // == Encoding ==
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}
