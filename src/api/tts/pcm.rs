//! Decoding of the speech model's raw PCM payload.

use std::time::Duration;

use base64::{engine::general_purpose, Engine as _};

use crate::error::SpeechError;

/// Output sample rate of the Gemini speech model (24kHz)
pub const SOURCE_SAMPLE_RATE: u32 = 24000;

/// Normalized mono audio ready for playback.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl PcmBuffer {
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }
}

/// Decode a base64 payload of little-endian i16 mono PCM.
///
/// The rate comes from a `rate=` parameter in `mime_type` when present,
/// otherwise 24kHz.
pub fn decode_pcm_payload(data_b64: &str, mime_type: &str) -> Result<PcmBuffer, SpeechError> {
    let bytes = general_purpose::STANDARD.decode(data_b64.trim())?;
    if bytes.len() % 2 != 0 {
        log::warn!("PCM payload has an odd byte count ({}), dropping the tail", bytes.len());
    }

    Ok(PcmBuffer {
        samples: pcm16_to_f32(&bytes),
        sample_rate: rate_from_mime(mime_type).unwrap_or(SOURCE_SAMPLE_RATE),
    })
}

pub fn pcm16_to_f32(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0)
        .collect()
}

/// `audio/L16;codec=pcm;rate=24000` -> 24000
fn rate_from_mime(mime_type: &str) -> Option<u32> {
    mime_type
        .split(';')
        .filter_map(|param| param.trim().strip_prefix("rate="))
        .find_map(|rate| rate.trim().parse().ok())
        .filter(|&rate| rate > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(samples: &[i16]) -> String {
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        general_purpose::STANDARD.encode(bytes)
    }

    #[test]
    fn decodes_every_sample_normalized() {
        let samples = [0i16, 1, -1, 16384, -16384, i16::MAX, i16::MIN, 1234];
        let buffer = decode_pcm_payload(&encode(&samples), "").unwrap();

        assert_eq!(buffer.sample_rate, 24000);
        assert_eq!(buffer.samples.len(), samples.len());
        for (decoded, raw) in buffer.samples.iter().zip(samples) {
            assert!((decoded - raw as f32 / 32768.0).abs() < 1e-7);
        }
        assert_eq!(buffer.samples[6], -1.0);
        assert!(buffer.samples[5] < 1.0);
    }

    #[test]
    fn one_second_of_audio() {
        let samples = vec![100i16; 24000];
        let buffer = decode_pcm_payload(&encode(&samples), "audio/L16;codec=pcm;rate=24000").unwrap();
        assert_eq!(buffer.duration(), Duration::from_secs(1));
    }

    #[test]
    fn rate_parameter_overrides_default() {
        let buffer = decode_pcm_payload(&encode(&[1, 2]), "audio/L16; rate=16000").unwrap();
        assert_eq!(buffer.sample_rate, 16000);

        let buffer = decode_pcm_payload(&encode(&[1, 2]), "audio/L16;rate=zero").unwrap();
        assert_eq!(buffer.sample_rate, 24000);
    }

    #[test]
    fn odd_trailing_byte_is_dropped() {
        let payload = general_purpose::STANDARD.encode([0x00, 0x40, 0x7f]);
        let buffer = decode_pcm_payload(&payload, "").unwrap();
        assert_eq!(buffer.samples, vec![0.5]);
    }

    #[test]
    fn invalid_base64_is_an_error() {
        assert!(matches!(
            decode_pcm_payload("not base64!!", ""),
            Err(SpeechError::InvalidPayload(_))
        ));
    }
}
