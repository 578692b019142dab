//! Speech-to-text for voice input: short WAV clips sent to Gemini as
//! inline audio.

use std::io::Cursor;
use std::sync::Arc;

use anyhow::Result;
use base64::{engine::general_purpose, Engine as _};

use super::client::GeminiClient;
use super::types::{GenerateContentRequest, GenerationConfig, Part};
use crate::error::ApiError;

pub struct Transcriber {
    client: Arc<GeminiClient>,
    model: String,
}

impl Transcriber {
    pub fn new(client: Arc<GeminiClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Transcribe a WAV clip spoken in `language`. An empty string means
    /// the model heard no speech.
    pub fn transcribe(&self, wav_data: &[u8], language: &str) -> Result<String, ApiError> {
        let request = build_request(wav_data, language);
        let response = self.client.generate(&self.model, &request)?;
        Ok(clean_transcript(&response.first_text()))
    }
}

fn build_request(wav_data: &[u8], language: &str) -> GenerateContentRequest {
    let prompt = format!(
        "Transcribe the following {} speech verbatim. \
         Only return the transcription text without any additional commentary or formatting. \
         If there is no intelligible speech, return an empty response.",
        language
    );
    let b64_audio = general_purpose::STANDARD.encode(wav_data);

    GenerateContentRequest::user(vec![Part::text(prompt), Part::inline("audio/wav", b64_audio)])
        .with_config(GenerationConfig {
            temperature: Some(0.0),
            ..Default::default()
        })
}

fn clean_transcript(raw: &str) -> String {
    raw.trim().trim_matches('"').trim().to_string()
}

/// 16-bit mono WAV in memory
pub fn encode_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut wav_cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut wav_cursor, spec)?;
        for sample in samples {
            writer.write_sample(*sample)?;
        }
        writer.finalize()?;
    }
    Ok(wav_cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_round_trips_through_hound() {
        let samples: Vec<i16> = (0..1600).map(|i| (i % 200) as i16 * 50).collect();
        let wav = encode_wav(&samples, 16000).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");

        let reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
        assert_eq!(reader.spec().sample_rate, 16000);
        assert_eq!(reader.spec().channels, 1);
        let decoded: Vec<i16> = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded, samples);
    }

    #[test]
    fn request_embeds_language_and_audio() {
        let value = serde_json::to_value(build_request(&[1, 2, 3], "Urdu")).unwrap();
        let parts = &value["contents"][0]["parts"];
        assert!(parts[0]["text"].as_str().unwrap().contains("Urdu speech"));
        assert_eq!(parts[1]["inlineData"]["mimeType"], "audio/wav");
        assert_eq!(parts[1]["inlineData"]["data"], "AQID");
        assert_eq!(value["generationConfig"]["temperature"], 0.0);
    }

    #[test]
    fn transcript_is_unquoted() {
        assert_eq!(clean_transcript("  \"hello there\"\n"), "hello there");
        assert_eq!(clean_transcript("\n"), "");
    }
}
