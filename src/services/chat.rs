//! Named chat sessions against the model.
//!
//! Sessions live in storage as one JSON array. A message is answered in one
//! of two modes:
//! - translate: structured JSON translation, followed by keyword extraction
//!   whose results are merged into the saved keyword list
//! - ask: free-form Markdown from a grammar assistant
//!
//! Both modes stream the answer and reconcile the accumulated text once the
//! stream ends. Model failures never fail the request; the AI message then
//! carries a fixed apology instead.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::keywords::KeywordService;
use super::prompts::{translation_schema, GENERAL_CHAT_INSTRUCTION, TRANSLATION_INSTRUCTION};
use super::{load_list, save_list};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::gemini::{Content, GenerateContentRequest, GenerationConfig, LanguageModel, ModelError};
use crate::models::domain::new_id;
use crate::models::{
    ChatMessage, ChatMode, ChatSession, MessageAuthor, MessageContent, TranslationData,
};
use crate::storage::SharedStorage;

/// Storage key of the session list.
pub const CHAT_HISTORY_KEY: &str = "chatHistory_multi_v3";
/// Title of a session before its first message.
pub const NEW_SESSION_TITLE: &str = "Percakapan Baru";
/// AI message used when answering fails.
pub const CHAT_ERROR_MESSAGE: &str = "Maaf, terjadi kesalahan. Silakan coba lagi.";

const TITLE_MAX_CHARS: usize = 40;

/// Session title derived from the first user message.
fn session_title(text: &str) -> String {
    let mut title: String = text.chars().take(TITLE_MAX_CHARS).collect();
    if text.chars().count() > TITLE_MAX_CHARS {
        title.push_str("...");
    }
    title
}

fn history(messages: &[ChatMessage]) -> Vec<Content> {
    messages
        .iter()
        .map(|message| {
            let text = message.content.history_text();
            match message.author {
                MessageAuthor::User => Content::user(text),
                MessageAuthor::Ai => Content::model(text),
            }
        })
        .collect()
}

#[derive(Clone)]
pub struct ChatService {
    storage: SharedStorage,
    model: Arc<dyn LanguageModel>,
    keywords: KeywordService,
    chat_model: String,
    /// Serializes read-modify-write of the session list
    write_lock: Arc<Mutex<()>>,
}

impl ChatService {
    pub fn new(
        storage: SharedStorage,
        model: Arc<dyn LanguageModel>,
        keywords: KeywordService,
        config: &Config,
    ) -> Self {
        Self {
            storage,
            model,
            keywords,
            chat_model: config.chat_model.clone(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    // == Sessions ==
    /// All sessions, most recently created first.
    pub fn sessions(&self) -> Vec<ChatSession> {
        load_list(&self.storage, CHAT_HISTORY_KEY)
    }

    pub fn session(&self, id: &str) -> Result<ChatSession> {
        self.sessions()
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Session '{}' not found", id)))
    }

    pub async fn create_session(&self) -> Result<ChatSession> {
        let session = ChatSession {
            id: new_id(),
            title: NEW_SESSION_TITLE.to_string(),
            messages: Vec::new(),
        };

        let _guard = self.write_lock.lock().await;
        let mut sessions = self.sessions();
        sessions.insert(0, session.clone());
        save_list(&self.storage, CHAT_HISTORY_KEY, &sessions)?;

        info!(id = %session.id, "Created chat session");
        Ok(session)
    }

    pub async fn delete_session(&self, id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut sessions = self.sessions();
        let before = sessions.len();
        sessions.retain(|s| s.id != id);
        if sessions.len() == before {
            return Err(AppError::NotFound(format!("Session '{}' not found", id)));
        }

        save_list(&self.storage, CHAT_HISTORY_KEY, &sessions)?;
        info!(id, "Deleted chat session");
        Ok(())
    }

    // == Messages ==
    /// Sends a user message and appends both it and the answer to the session.
    ///
    /// Returns the AI message. The model is called without holding the
    /// session lock, so the session is looked up again before appending.
    pub async fn send_message(&self, id: &str, text: &str, mode: ChatMode) -> Result<ChatMessage> {
        let prior = self.session(id)?.messages;

        let content = match self.answer(&prior, text, mode).await {
            Ok(content) => content,
            Err(e) => {
                warn!(error = %e, session = id, ?mode, "Answering chat message failed");
                MessageContent::Text(CHAT_ERROR_MESSAGE.to_string())
            }
        };
        let reply = ChatMessage::ai(content);

        let _guard = self.write_lock.lock().await;
        let mut sessions = self.sessions();
        let session = sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Session '{}' not found", id)))?;

        if session.messages.is_empty() {
            session.title = session_title(text);
        }
        session.messages.push(ChatMessage::user(text));
        session.messages.push(reply.clone());
        save_list(&self.storage, CHAT_HISTORY_KEY, &sessions)?;

        Ok(reply)
    }

    async fn answer(
        &self,
        prior: &[ChatMessage],
        text: &str,
        mode: ChatMode,
    ) -> std::result::Result<MessageContent, ModelError> {
        match mode {
            ChatMode::Translate => self.translate(prior, text).await,
            ChatMode::Ask => self.ask(prior, text).await,
        }
    }

    async fn translate(
        &self,
        prior: &[ChatMessage],
        text: &str,
    ) -> std::result::Result<MessageContent, ModelError> {
        let request = GenerateContentRequest::with_history(history(prior), text)
            .system_instruction(TRANSLATION_INSTRUCTION)
            .generation_config(GenerationConfig::json(translation_schema()));

        let full = self.stream(&request).await?;
        let mut data: TranslationData = serde_json::from_str(full.trim())
            .map_err(|e| ModelError::InvalidResponse(format!("translation is not valid JSON: {}", e)))?;

        if data.keywords.is_empty() {
            data.keywords = self.keywords.extract(text).await;
        }
        if let Err(e) = self.keywords.save(&data.keywords).await {
            warn!(error = %e, "Failed to save extracted keywords");
        }

        Ok(MessageContent::Translation(data))
    }

    async fn ask(
        &self,
        prior: &[ChatMessage],
        text: &str,
    ) -> std::result::Result<MessageContent, ModelError> {
        let request = GenerateContentRequest::with_history(history(prior), text)
            .system_instruction(GENERAL_CHAT_INSTRUCTION);

        let full = self.stream(&request).await?;
        if full.trim().is_empty() {
            return Err(ModelError::InvalidResponse("empty answer".to_string()));
        }
        Ok(MessageContent::Text(full))
    }

    async fn stream(&self, request: &GenerateContentRequest) -> std::result::Result<String, ModelError> {
        let mut chunks = 0usize;
        let mut on_text = |accumulated: &str| {
            chunks += 1;
            debug!(chunks, chars = accumulated.chars().count(), "Received answer chunk");
        };
        self.model
            .stream_generate_content(&self.chat_model, request, &mut on_text)
            .await
    }
}
