//! Domain types and HTTP models for the tutor API
//!
//! `domain` holds what is persisted and exchanged with the model;
//! `requests` and `responses` are the DTOs of the HTTP surface.

pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ArabicWithTranslit, ChatMessage, ChatMode, ChatSession, DetailedKeyword, MessageAuthor,
    MessageContent, NounForms, SavedKeyword, TranslationData, VerbForms, WordExplanation,
    WordType,
};
pub use requests::{
    ExplainRequest, ExtractKeywordsRequest, KeywordQuery, SendMessageRequest, SpeechRequest,
};
pub use responses::{
    ClearedResponse, DeleteResponse, ErrorResponse, ExplanationResponse, HealthResponse,
    KeywordsResponse, SavedKeywordsResponse, SpeechResponse,
};
