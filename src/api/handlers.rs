//! API Handlers
//!
//! HTTP request handlers for each tutor endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

use crate::cache::{CacheStats, CacheStore};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::gemini::{GeminiClient, LanguageModel};
use crate::models::{
    ChatMessage, ChatSession, ClearedResponse, DeleteResponse, ExplainRequest,
    ExplanationResponse, ExtractKeywordsRequest, HealthResponse, KeywordQuery, KeywordsResponse,
    SavedKeywordsResponse, SendMessageRequest, SpeechRequest, SpeechResponse,
};
use crate::services::{ChatService, GrammarService, KeywordService, SharedCache, SpeechService};
use crate::storage::SharedStorage;

/// Application state shared across all handlers.
///
/// The audio cache sits behind `Arc<RwLock<>>`; the services are cheap
/// clones sharing one storage backend and one model client.
#[derive(Clone)]
pub struct AppState {
    /// Audio cache, also used by `speech`
    pub cache: SharedCache,
    pub speech: SpeechService,
    pub chat: ChatService,
    pub keywords: KeywordService,
    pub grammar: GrammarService,
}

impl AppState {
    /// Wires the services around a storage backend and a model.
    pub fn new(storage: SharedStorage, model: Arc<dyn LanguageModel>, config: &Config) -> Self {
        let cache: SharedCache = Arc::new(RwLock::new(CacheStore::from_config(
            storage.clone(),
            config,
        )));
        let keywords = KeywordService::new(storage.clone(), model.clone(), config);

        Self {
            speech: SpeechService::new(cache.clone(), model.clone(), config),
            chat: ChatService::new(storage, model.clone(), keywords.clone(), config),
            grammar: GrammarService::new(model, config),
            keywords,
            cache,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Opens the configured storage and builds the API client, which
    /// requires an API key.
    pub fn from_config(config: &Config) -> Result<Self> {
        let storage = SharedStorage::from_config(config)?;
        let model = GeminiClient::from_config(config)?;
        Ok(Self::new(storage, Arc::new(model), config))
    }
}

/// Handler for POST /speech
///
/// Returns base64 audio for the text, synthesizing it only on a cache miss.
pub async fn speech_handler(
    State(state): State<AppState>,
    Json(req): Json<SpeechRequest>,
) -> Result<Json<SpeechResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let speech = state
        .speech
        .speak(&req.text)
        .await?
        .ok_or_else(|| AppError::Upstream("Model returned no audio".to_string()))?;

    Ok(Json(SpeechResponse::new(req.text, speech.audio, speech.cached)))
}

/// Handler for GET /cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    let cache = state.cache.read().await;
    Json(cache.stats())
}

/// Handler for DELETE /cache
///
/// Removes every cached audio entry; other stored data is untouched.
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearedResponse> {
    let removed = state.cache.write().await.clear();
    info!(removed, "Audio cache cleared");
    Json(ClearedResponse::new("cached audio entries", removed))
}

/// Handler for POST /sessions
pub async fn create_session_handler(State(state): State<AppState>) -> Result<Json<ChatSession>> {
    Ok(Json(state.chat.create_session().await?))
}

/// Handler for GET /sessions
pub async fn list_sessions_handler(State(state): State<AppState>) -> Json<Vec<ChatSession>> {
    Json(state.chat.sessions())
}

/// Handler for GET /sessions/:id
pub async fn get_session_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ChatSession>> {
    Ok(Json(state.chat.session(&id)?))
}

/// Handler for DELETE /sessions/:id
pub async fn delete_session_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.chat.delete_session(&id).await?;
    Ok(Json(DeleteResponse::new("Session", id)))
}

/// Handler for POST /sessions/:id/messages
///
/// Answers the message in the requested mode and returns the AI message.
pub async fn send_message_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<ChatMessage>> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let reply = state.chat.send_message(&id, &req.text, req.mode).await?;
    Ok(Json(reply))
}

/// Handler for POST /keywords/extract
///
/// Extracts detailed keywords and adds the new ones to the saved list.
pub async fn extract_keywords_handler(
    State(state): State<AppState>,
    Json(req): Json<ExtractKeywordsRequest>,
) -> Result<Json<KeywordsResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let keywords = state.keywords.extract(&req.text).await;
    let saved = state.keywords.save(&keywords).await?;
    Ok(Json(KeywordsResponse { keywords, saved }))
}

/// Handler for GET /keywords
pub async fn list_keywords_handler(
    State(state): State<AppState>,
    Query(query): Query<KeywordQuery>,
) -> Json<SavedKeywordsResponse> {
    Json(SavedKeywordsResponse::new(
        state.keywords.saved(query.q.as_deref()),
    ))
}

/// Handler for DELETE /keywords
pub async fn clear_keywords_handler(State(state): State<AppState>) -> Result<Json<ClearedResponse>> {
    let removed = state.keywords.clear().await?;
    Ok(Json(ClearedResponse::new("saved keywords", removed)))
}

/// Handler for POST /grammar/explain
pub async fn explain_handler(
    State(state): State<AppState>,
    Json(req): Json<ExplainRequest>,
) -> Result<Json<ExplanationResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let explanation = state
        .grammar
        .explain(&req.concept, &req.arabic, &req.translit)
        .await;
    Ok(Json(ExplanationResponse { explanation }))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
