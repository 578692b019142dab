use std::time::Instant;

use crate::config::{Language, Tone};
use crate::session::Session;

/// User intent collected while rendering, applied once the frame's
/// borrows of the session state are gone.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum UiAction {
    EditInput(String),
    ClearInput,
    SetTone(Tone),
    SetSource(&'static Language),
    SetTarget(&'static Language),
    Swap,
    ToggleListening,
    Copy,
    Speak,
    DismissNotice,
}

pub struct TranslatorApp {
    pub(crate) session: Session,
}

impl TranslatorApp {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub(crate) fn apply(&mut self, action: UiAction, now: Instant) {
        match action {
            UiAction::EditInput(text) => self.session.set_input_text(text, now),
            UiAction::ClearInput => self.session.clear_input(now),
            UiAction::SetTone(tone) => self.session.set_tone(tone),
            UiAction::SetSource(language) => self.session.set_source_language(language, now),
            UiAction::SetTarget(language) => self.session.set_target_language(language, now),
            UiAction::Swap => self.session.swap_languages(now),
            UiAction::ToggleListening => self.session.toggle_listening(),
            UiAction::Copy => {
                self.session.copy(now);
            }
            UiAction::Speak => {
                self.session.speak();
            }
            UiAction::DismissNotice => self.session.dismiss_notice(),
        }
    }
}
