use std::time::Duration;

use super::types::{GenerateContentRequest, GenerateContentResponse};
use crate::config::Config;
use crate::error::{ApiError, ConfigError};

/// Shared handle to the Gemini REST API.
///
/// Built once in `main` and handed to the translation, speech and
/// transcription services.
pub struct GeminiClient {
    agent: ureq::Agent,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Fails with `ConfigError::MissingApiKey` before any request is made.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?
            .to_string();

        Ok(Self {
            agent: build_agent(config.request_timeout),
            api_key,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    /// One `generateContent` round trip. No retries.
    pub fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ApiError> {
        let url = self.endpoint(model);
        log::debug!("POST {}", url);

        let mut resp = self
            .agent
            .post(&url)
            .header("x-goog-api-key", self.api_key.as_str())
            .send_json(request)?;

        let response: GenerateContentResponse = resp
            .body_mut()
            .read_json()
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        if let Some(reason) = response.block_reason() {
            return Err(ApiError::Blocked(reason.to_string()));
        }

        Ok(response)
    }
}

fn build_agent(timeout: Duration) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build();
    config.into()
}
