//! Arabic Tutor - Indonesian to Arabic translation and grammar service
//!
//! Orchestrates a hosted generative-language API for translation, keyword
//! extraction, grammar explanations and speech, with a bounded local cache
//! for synthesized audio.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod gemini;
pub mod models;
pub mod services;
pub mod storage;

pub use api::AppState;
pub use config::Config;
