//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::cache::{DEFAULT_MAX_ENTRIES, DEFAULT_TTL_MS};
use crate::gemini::GEMINI_API_BASE;

/// Default storage quota, matching a browser's 5 MB local storage budget.
pub const DEFAULT_STORAGE_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Clone)]
pub struct Config {
    /// Maximum number of cached audio entries
    pub cache_max_entries: usize,
    /// Audio cache entry lifetime in milliseconds
    pub cache_ttl_ms: u64,
    /// JSON file backing the key-value storage, None = in memory
    pub storage_path: Option<PathBuf>,
    /// Storage quota in bytes, 0 = unlimited
    pub storage_quota_bytes: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Generative-language API key
    pub api_key: Option<String>,
    /// Generative-language API base URL
    pub gemini_base_url: String,
    /// Model used for translation, chat and keyword extraction
    pub chat_model: String,
    /// Model used for speech synthesis
    pub tts_model: String,
    /// Prebuilt voice for speech synthesis
    pub tts_voice: String,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum cached audio items (default: 50)
    /// - `CACHE_TTL_MS` - Audio cache TTL in milliseconds (default: 3600000)
    /// - `STORAGE_PATH` - Storage file (default: unset, in memory)
    /// - `STORAGE_QUOTA_BYTES` - Storage quota, 0 = unlimited (default: 5 MB)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `GEMINI_API_KEY` or `API_KEY` - API key (required to start)
    /// - `GEMINI_BASE_URL` - API base URL
    /// - `CHAT_MODEL` - Chat model (default: gemini-2.5-flash)
    /// - `TTS_MODEL` - Speech model (default: gemini-2.5-flash-preview-tts)
    /// - `TTS_VOICE` - Prebuilt voice (default: Kore)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_max_entries: env_or("CACHE_MAX_ENTRIES", defaults.cache_max_entries),
            cache_ttl_ms: env_or("CACHE_TTL_MS", defaults.cache_ttl_ms),
            storage_path: env_non_empty("STORAGE_PATH").map(PathBuf::from),
            storage_quota_bytes: env_or("STORAGE_QUOTA_BYTES", defaults.storage_quota_bytes),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            api_key: env_non_empty("GEMINI_API_KEY").or_else(|| env_non_empty("API_KEY")),
            gemini_base_url: env_non_empty("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            chat_model: env_non_empty("CHAT_MODEL").unwrap_or(defaults.chat_model),
            tts_model: env_non_empty("TTS_MODEL").unwrap_or(defaults.tts_model),
            tts_voice: env_non_empty("TTS_VOICE").unwrap_or(defaults.tts_voice),
        }
    }

    /// Storage quota as an optional limit.
    pub fn storage_quota(&self) -> Option<usize> {
        (self.storage_quota_bytes > 0).then_some(self.storage_quota_bytes)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_max_entries: DEFAULT_MAX_ENTRIES,
            cache_ttl_ms: DEFAULT_TTL_MS,
            storage_path: None,
            storage_quota_bytes: DEFAULT_STORAGE_QUOTA_BYTES,
            server_port: 3000,
            api_key: None,
            gemini_base_url: GEMINI_API_BASE.to_string(),
            chat_model: "gemini-2.5-flash".to_string(),
            tts_model: "gemini-2.5-flash-preview-tts".to_string(),
            tts_voice: "Kore".to_string(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("cache_max_entries", &self.cache_max_entries)
            .field("cache_ttl_ms", &self.cache_ttl_ms)
            .field("storage_path", &self.storage_path)
            .field("storage_quota_bytes", &self.storage_quota_bytes)
            .field("server_port", &self.server_port)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("gemini_base_url", &self.gemini_base_url)
            .field("chat_model", &self.chat_model)
            .field("tts_model", &self.tts_model)
            .field("tts_voice", &self.tts_voice)
            .finish()
    }
}
