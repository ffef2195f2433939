//! Short grammar explanations for a single word.

use std::sync::Arc;

use tracing::warn;

use super::prompts::grammar_prompt;
use crate::config::Config;
use crate::gemini::{GenerateContentRequest, LanguageModel};

/// Returned instead of an explanation when the model fails.
pub const EXPLANATION_ERROR_MESSAGE: &str =
    "Maaf, terjadi kesalahan saat mencoba mendapatkan penjelasan.";

#[derive(Clone)]
pub struct GrammarService {
    model: Arc<dyn LanguageModel>,
    chat_model: String,
}

impl GrammarService {
    pub fn new(model: Arc<dyn LanguageModel>, config: &Config) -> Self {
        Self {
            model,
            chat_model: config.chat_model.clone(),
        }
    }

    /// Explains in one or two sentences how `concept` shapes the word.
    pub async fn explain(&self, concept: &str, arabic: &str, translit: &str) -> String {
        let request = GenerateContentRequest::from_text(grammar_prompt(concept, arabic, translit));

        match self.model.generate_content(&self.chat_model, &request).await {
            Ok(response) => match response.text().filter(|t| !t.trim().is_empty()) {
                Some(text) => text,
                None => {
                    warn!("Grammar explanation response was empty");
                    EXPLANATION_ERROR_MESSAGE.to_string()
                }
            },
            Err(e) => {
                warn!(error = %e, concept, "Grammar explanation failed");
                EXPLANATION_ERROR_MESSAGE.to_string()
            }
        }
    }
}
