//! Remote translation through the Gemini text model.

use std::sync::Arc;

use super::client::GeminiClient;
use super::types::{GenerateContentRequest, Part};
use crate::config::Tone;
use crate::error::TranslationError;
use crate::session::{TranslationRequest, Translator};

pub struct TextTranslator {
    client: Arc<GeminiClient>,
    model: String,
}

impl TextTranslator {
    pub fn new(client: Arc<GeminiClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Translate `text` (non-empty) and return the trimmed result.
    pub fn translate_text(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
        tone: Tone,
    ) -> Result<String, TranslationError> {
        let prompt = build_prompt(text, source_lang, target_lang, tone);
        let request = GenerateContentRequest::user(vec![Part::text(prompt)]);

        let response = self.client.generate(&self.model, &request)?;
        extract_translation(&response.first_text())
    }
}

impl Translator for TextTranslator {
    fn translate(&self, request: &TranslationRequest) -> Result<String, TranslationError> {
        self.translate_text(
            &request.text,
            request.source.name,
            request.target.name,
            request.tone,
        )
    }
}

pub fn build_prompt(text: &str, source_lang: &str, target_lang: &str, tone: Tone) -> String {
    format!(
        "Role: Expert Linguist and Translator.\n\
         Task: Translate the following text from {source_lang} to {target_lang}.\n\
         Style/Tone: {tone}.\n\
         \n\
         Constraints:\n\
         1. Return ONLY the translated text.\n\
         2. Do not include any preamble, notes, or explanations.\n\
         3. Ensure the tone matches the requested style ({tone}).\n\
         \n\
         Text to translate:\n\
         \"{text}\""
    )
}

fn extract_translation(raw: &str) -> Result<String, TranslationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TranslationError::EmptyResponse);
    }
    Ok(trimmed.to_string())
}
