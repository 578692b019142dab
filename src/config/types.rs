//! Core enums shared between the session and the GUI.

use std::fmt;

// ============================================================================
// TONE
// ============================================================================

/// Requested style of the translation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Standard,
    Professional,
    Casual,
    Creative,
}

impl Tone {
    pub const ALL: [Tone; 4] = [
        Tone::Standard,
        Tone::Professional,
        Tone::Casual,
        Tone::Creative,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Standard => "Standard",
            Tone::Professional => "Professional",
            Tone::Casual => "Casual",
            Tone::Creative => "Creative",
        }
    }

    /// Label for the tone selector
    pub fn short_label(self) -> &'static str {
        match self {
            Tone::Standard => "Std",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TRANSLATION STATUS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TranslationStatus {
    #[default]
    Idle,
    Translating,
    Success,
    Error,
}
