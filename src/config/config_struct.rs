//! Runtime configuration, read once from the environment at startup.

use std::time::Duration;

use super::languages::{find_language, Language, DEFAULT_SOURCE, DEFAULT_TARGET};
use crate::error::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const DEFAULT_STT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_VOICE: &str = "Kore";
pub const DEFAULT_DEBOUNCE_MS: u64 = 800;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Clone)]
pub struct Config {
    /// `None` when unset; `GeminiClient::new` turns that into an error.
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub text_model: String,
    pub tts_model: String,
    pub stt_model: String,
    pub voice_name: String,
    pub debounce: Duration,
    pub request_timeout: Duration,
    pub default_source: &'static Language,
    pub default_target: &'static Language,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            tts_model: DEFAULT_TTS_MODEL.to_string(),
            stt_model: DEFAULT_STT_MODEL.to_string(),
            voice_name: DEFAULT_VOICE.to_string(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_source: DEFAULT_SOURCE,
            default_target: DEFAULT_TARGET,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base_url", &self.api_base_url)
            .field("text_model", &self.text_model)
            .field("tts_model", &self.tts_model)
            .field("stt_model", &self.stt_model)
            .field("voice_name", &self.voice_name)
            .field("debounce", &self.debounce)
            .field("request_timeout", &self.request_timeout)
            .field("default_source", &self.default_source.code)
            .field("default_target", &self.default_target.code)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup. Blank values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Config::default();

        config.api_key = get("GEMINI_API_KEY").or_else(|| get("API_KEY"));

        if let Some(url) = get("GEMINI_API_BASE_URL") {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = get("TRANSLATOR_TEXT_MODEL") {
            config.text_model = model;
        }
        if let Some(model) = get("TRANSLATOR_TTS_MODEL") {
            config.tts_model = model;
        }
        if let Some(model) = get("TRANSLATOR_STT_MODEL") {
            config.stt_model = model;
        }
        if let Some(voice) = get("TRANSLATOR_VOICE") {
            config.voice_name = voice;
        }

        if let Some(raw) = get("TRANSLATOR_DEBOUNCE_MS") {
            config.debounce = Duration::from_millis(parse_number("TRANSLATOR_DEBOUNCE_MS", raw)?);
        }
        if let Some(raw) = get("TRANSLATOR_TIMEOUT_SECS") {
            config.request_timeout =
                Duration::from_secs(parse_number("TRANSLATOR_TIMEOUT_SECS", raw)?);
        }

        if let Some(raw) = get("TRANSLATOR_SOURCE_LANG") {
            config.default_source = parse_language("TRANSLATOR_SOURCE_LANG", raw)?;
        }
        if let Some(raw) = get("TRANSLATOR_TARGET_LANG") {
            config.default_target = parse_language("TRANSLATOR_TARGET_LANG", raw)?;
        }

        Ok(config)
    }
}

fn parse_number(var: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { var, value })
}

fn parse_language(var: &'static str, value: String) -> Result<&'static Language, ConfigError> {
    find_language(&value).ok_or(ConfigError::UnknownLanguage { var, value })
}
