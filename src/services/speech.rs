//! Cached speech synthesis.
//!
//! The only caller of the audio cache: looks up the text first and only asks
//! the model to synthesize on a miss.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::gemini::{GenerateContentRequest, GenerationConfig, LanguageModel, ModelError};
use crate::storage::SharedStorage;

/// Audio cache shared between handlers.
pub type SharedCache = Arc<RwLock<CacheStore<SharedStorage>>>;

/// Synthesized audio and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Speech {
    /// Base64 encoded audio
    pub audio: String,
    pub cached: bool,
}

#[derive(Clone)]
pub struct SpeechService {
    cache: SharedCache,
    model: Arc<dyn LanguageModel>,
    tts_model: String,
    voice: String,
}

impl SpeechService {
    pub fn new(cache: SharedCache, model: Arc<dyn LanguageModel>, config: &Config) -> Self {
        Self {
            cache,
            model,
            tts_model: config.tts_model.clone(),
            voice: config.tts_voice.clone(),
        }
    }

    /// Returns audio for `text`, from the cache when possible.
    ///
    /// `Ok(None)` means the model answered without audio. The cache lock is
    /// released while the model is working.
    pub async fn speak(&self, text: &str) -> Result<Option<Speech>, ModelError> {
        let cached = self.cache.write().await.get(text);
        if let Some(audio) = cached {
            return Ok(Some(Speech {
                audio,
                cached: true,
            }));
        }

        let request = GenerateContentRequest::from_text(text)
            .generation_config(GenerationConfig::audio(self.voice.as_str()));
        let response = self.model.generate_content(&self.tts_model, &request).await?;

        let Some(audio) = response.inline_audio().map(str::to_string) else {
            warn!(model = %self.tts_model, "Speech response carried no audio");
            return Ok(None);
        };

        debug!(bytes = audio.len(), "Synthesized speech");
        self.cache.write().await.put(text, &audio);

        Ok(Some(Speech {
            audio,
            cached: false,
        }))
    }
}
