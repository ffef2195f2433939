//! Gemini Module
//!
//! Client for the hosted generative-language REST API and the
//! `LanguageModel` seam the services are written against.

mod client;
mod sse;
mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use client::{GeminiClient, GEMINI_API_BASE};
pub use sse::SseDecoder;
pub use types::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    InlineData, Part, PrebuiltVoiceConfig, SpeechConfig, VoiceConfig,
};

// == Model Error ==
/// Failures talking to the language model service.
#[derive(Error, Debug)]
pub enum ModelError {
    /// No API key was configured
    #[error("API key is not set")]
    MissingApiKey,

    /// The request never produced an HTTP response
    #[error("Request failed: {0}")]
    Request(String),

    /// The API answered with an error status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The API answered with something we cannot use
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

// == Language Model ==
/// Request/response and streaming access to a hosted model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Sends one `generateContent` request.
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ModelError>;

    /// Sends a streaming request and concatenates the text chunks.
    ///
    /// `on_text` receives the accumulated text after every chunk; the return
    /// value is the final accumulated text. The default implementation
    /// issues a single non-streaming request and reports it as one chunk.
    async fn stream_generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
        on_text: &mut (dyn for<'s> FnMut(&'s str) + Send),
    ) -> Result<String, ModelError> {
        let response = self.generate_content(model, request).await?;
        let text = response.text().unwrap_or_default();
        on_text(&text);
        Ok(text)
    }
}
