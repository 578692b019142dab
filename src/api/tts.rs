//! Text-to-Speech using the Gemini speech model.
//!
//! The model answers with one inline base64 payload of 16-bit mono PCM at
//! 24kHz. `SpeechClient` fetches it, decodes it and plays it to the end
//! through an `AudioOutput`.

pub mod pcm;
pub mod player;

use std::sync::Arc;

use super::client::GeminiClient;
use super::types::{GenerateContentRequest, GenerationConfig, Part, SpeechConfig};
use crate::error::SpeechError;
use crate::session::Speaker;
use pcm::{decode_pcm_payload, PcmBuffer};

/// Sink for decoded speech. `play` blocks until playback has finished.
pub trait AudioOutput: Send + Sync {
    fn play(&self, buffer: &PcmBuffer) -> Result<(), SpeechError>;
}

pub struct SpeechClient {
    client: Arc<GeminiClient>,
    model: String,
    voice_name: String,
    output: Box<dyn AudioOutput>,
}

impl SpeechClient {
    pub fn new(
        client: Arc<GeminiClient>,
        model: impl Into<String>,
        voice_name: impl Into<String>,
        output: Box<dyn AudioOutput>,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            voice_name: voice_name.into(),
            output,
        }
    }

    /// Fetch and decode speech for `text` without playing it.
    pub fn synthesize(&self, text: &str) -> Result<PcmBuffer, SpeechError> {
        let request = build_request(text, &self.voice_name);
        let response = self.client.generate(&self.model, &request)?;

        let inline = response
            .first_inline_data()
            .filter(|data| !data.data.trim().is_empty())
            .ok_or(SpeechError::MissingAudio)?;

        decode_pcm_payload(&inline.data, &inline.mime_type)
    }
}

impl Speaker for SpeechClient {
    fn speak(&self, text: &str) -> Result<(), SpeechError> {
        let buffer = self.synthesize(text)?;
        log::info!("TTS: playing {:.1}s of audio", buffer.duration().as_secs_f32());
        self.output.play(&buffer)
    }
}

fn build_request(text: &str, voice_name: &str) -> GenerateContentRequest {
    GenerateContentRequest::user(vec![Part::text(text)]).with_config(GenerationConfig {
        response_modalities: vec!["AUDIO".to_string()],
        speech_config: Some(SpeechConfig::prebuilt(voice_name)),
        ..Default::default()
    })
}
