//! HTTP client for the generative-language REST API.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::sse::SseDecoder;
use super::types::{GenerateContentRequest, GenerateContentResponse};
use super::{LanguageModel, ModelError};
use crate::config::Config;

/// Public REST endpoint.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

// == Gemini Client ==
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ModelError> {
        Self::with_base_url(api_key, GEMINI_API_BASE)
    }

    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ModelError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ModelError::Request(e.to_string()))?;

        Ok(Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ModelError> {
        let api_key = config.api_key.clone().ok_or(ModelError::MissingApiKey)?;
        Self::with_base_url(api_key, &config.gemini_base_url)
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    async fn post(
        &self,
        url: String,
        request: &GenerateContentRequest,
    ) -> Result<reqwest::Response, ModelError> {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ModelError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(parse_api_error(status.as_u16(), &body));
        }
        Ok(response)
    }
}

/// Builds an API error, preferring `error.message` from a JSON body.
fn parse_api_error(status: u16, body: &str) -> ModelError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    warn!(status, message = %message, "Model API returned an error");
    ModelError::Api { status, message }
}

/// Appends the text of one streamed chunk; malformed chunks are skipped.
fn append_chunk(accumulated: &mut String, payload: &str) -> bool {
    match serde_json::from_str::<GenerateContentResponse>(payload) {
        Ok(chunk) => match chunk.text() {
            Some(text) if !text.is_empty() => {
                accumulated.push_str(&text);
                true
            }
            _ => false,
        },
        Err(e) => {
            debug!(error = %e, "Skipping malformed stream chunk");
            false
        }
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ModelError> {
        let url = self.endpoint(model, "generateContent");
        debug!(model, "Sending generateContent request");

        let response = self.post(url, request).await?;
        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))
    }

    async fn stream_generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
        on_text: &mut (dyn for<'s> FnMut(&'s str) + Send),
    ) -> Result<String, ModelError> {
        let url = format!("{}?alt=sse", self.endpoint(model, "streamGenerateContent"));
        debug!(model, "Sending streamGenerateContent request");

        let response = self.post(url, request).await?;
        let mut stream = response.bytes_stream();
        let mut decoder = SseDecoder::new();
        let mut accumulated = String::new();

        while let Some(chunk) = stream.next().await {
            let bytes = chunk.map_err(|e| ModelError::Request(format!("Stream error: {}", e)))?;
            for payload in decoder.push(&bytes) {
                if append_chunk(&mut accumulated, &payload) {
                    on_text(&accumulated);
                }
            }
        }
        for payload in decoder.finish() {
            if append_chunk(&mut accumulated, &payload) {
                on_text(&accumulated);
            }
        }

        Ok(accumulated)
    }
}
