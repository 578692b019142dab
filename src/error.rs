//! Error taxonomy shared across the app.
//!
//! Remote-call errors never reach the GUI: `session` turns them into state
//! transitions and log lines.

use thiserror::Error;

/// Startup configuration problems. All of these are fatal.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("no Gemini API key configured (set GEMINI_API_KEY or API_KEY)")]
    MissingApiKey,
    #[error("{var} must be a whole number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} names an unsupported language: {value:?}")]
    UnknownLanguage { var: &'static str, value: String },
}

/// Failures of a single `generateContent` round trip.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("the API key was rejected")]
    InvalidApiKey,
    #[error("request timed out")]
    Timeout,
    #[error("HTTP {0}")]
    Status(u16),
    #[error("request blocked: {0}")]
    Blocked(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unreadable response: {0}")]
    Decode(String),
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(401) | ureq::Error::StatusCode(403) => ApiError::InvalidApiKey,
            ureq::Error::StatusCode(code) => ApiError::Status(code),
            ureq::Error::Timeout(_) => ApiError::Timeout,
            ureq::Error::Json(e) => ApiError::Decode(e.to_string()),
            other => ApiError::Transport(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("empty response from translation model")]
    EmptyResponse,
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("no audio data received from speech model")]
    MissingAudio,
    #[error("audio payload is not valid base64: {0}")]
    InvalidPayload(#[from] base64::DecodeError),
    #[error("playback failed: {0}")]
    Playback(String),
}

#[derive(Debug, Error)]
pub enum RecognitionError {
    /// No capture facility on this machine. Shown to the user.
    #[error("{0}")]
    Unsupported(String),
    #[error("audio input error: {0}")]
    Device(String),
    #[error("transcription failed: {0}")]
    Transcription(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_status_codes_map_to_invalid_key() {
        assert!(matches!(
            ApiError::from(ureq::Error::StatusCode(401)),
            ApiError::InvalidApiKey
        ));
        assert!(matches!(
            ApiError::from(ureq::Error::StatusCode(403)),
            ApiError::InvalidApiKey
        ));
        assert!(matches!(
            ApiError::from(ureq::Error::StatusCode(503)),
            ApiError::Status(503)
        ));
    }

    #[test]
    fn missing_key_message_names_the_variables() {
        let msg = ConfigError::MissingApiKey.to_string();
        assert!(msg.contains("GEMINI_API_KEY"));
        assert!(msg.contains("API_KEY"));
    }
}
