use std::time::Instant;

use crate::config::{Language, Tone, TranslationStatus};

/// Everything the GUI renders. Mutated only through `Session`.
///
/// `translated_text` belongs to `input_text` under the current languages
/// and tone only while `status` is `Success`.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub source: &'static Language,
    pub target: &'static Language,
    pub input_text: String,
    pub translated_text: String,
    pub status: TranslationStatus,
    pub tone: Tone,
    pub is_listening: bool,
    pub is_speaking: bool,
    /// Latest non-final voice transcript, display only
    pub interim_text: String,
    /// Message the user has to acknowledge
    pub notice: Option<String>,
    pub copied_until: Option<Instant>,
}

impl SessionState {
    pub fn new(source: &'static Language, target: &'static Language) -> Self {
        Self {
            source,
            target,
            input_text: String::new(),
            translated_text: String::new(),
            status: TranslationStatus::Idle,
            tone: Tone::default(),
            is_listening: false,
            is_speaking: false,
            interim_text: String::new(),
            notice: None,
            copied_until: None,
        }
    }

    pub fn has_input(&self) -> bool {
        !self.input_text.trim().is_empty()
    }

    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied_until.is_some_and(|until| now < until)
    }
}
