//! Cuts a 16 kHz mono stream into utterances at speech pauses.

use log::debug;

/// Sample rate the segmenter and the transcriber work at
pub const SEGMENT_RATE: u32 = 16_000;

const FRAME_MS: u32 = 20;
const FRAME_SAMPLES: usize = (SEGMENT_RATE * FRAME_MS / 1000) as usize;

/// RMS (0.0..1.0) a frame needs to count as speech
pub const DEFAULT_SPEECH_THRESHOLD: f32 = 0.015;
pub const DEFAULT_PAUSE_MS: u32 = 700;
pub const DEFAULT_MAX_UTTERANCE_MS: u32 = 15_000;

/// Energy-based pause detector that also collects the audio between pauses.
///
/// Silence before the first speech frame is dropped. An utterance is
/// emitted once `pause_ms` of silence follows speech, or when it reaches
/// `max_utterance_ms`.
pub struct PauseSegmenter {
    threshold: f32,
    pause_frames: u32,
    max_samples: usize,
    /// Incomplete frame carried over between pushes
    pending: Vec<i16>,
    utterance: Vec<i16>,
    silence_frames: u32,
    has_speech: bool,
}

impl Default for PauseSegmenter {
    fn default() -> Self {
        Self::new(
            DEFAULT_SPEECH_THRESHOLD,
            DEFAULT_PAUSE_MS,
            DEFAULT_MAX_UTTERANCE_MS,
        )
    }
}

impl PauseSegmenter {
    pub fn new(threshold: f32, pause_ms: u32, max_utterance_ms: u32) -> Self {
        let pause_frames = pause_ms.div_ceil(FRAME_MS).max(1);
        let max_samples = (SEGMENT_RATE as usize * max_utterance_ms as usize) / 1000;
        debug!(
            "PauseSegmenter: threshold={}, pause={}ms ({} frames), max={}ms",
            threshold, pause_ms, pause_frames, max_utterance_ms
        );
        Self {
            threshold,
            pause_frames,
            max_samples: max_samples.max(FRAME_SAMPLES),
            pending: Vec::with_capacity(FRAME_SAMPLES),
            utterance: Vec::new(),
            silence_frames: 0,
            has_speech: false,
        }
    }

    /// Feed samples; returns every utterance completed by them.
    pub fn push(&mut self, samples: &[i16]) -> Vec<Vec<i16>> {
        let mut completed = Vec::new();
        self.pending.extend_from_slice(samples);

        let mut start = 0;
        while self.pending.len() - start >= FRAME_SAMPLES {
            let frame = &self.pending[start..start + FRAME_SAMPLES];
            start += FRAME_SAMPLES;

            let is_speech = frame_rms(frame) >= self.threshold;
            if !is_speech && !self.has_speech {
                continue;
            }
            self.utterance.extend_from_slice(frame);

            if is_speech {
                self.has_speech = true;
                self.silence_frames = 0;
            } else {
                self.silence_frames += 1;
            }

            if self.silence_frames >= self.pause_frames {
                debug!(
                    "Pause after {}ms of silence",
                    self.silence_frames * FRAME_MS
                );
                completed.push(self.take());
            } else if self.utterance.len() >= self.max_samples {
                debug!("Utterance reached max length, cutting");
                completed.push(self.take());
            }
        }
        self.pending.drain(..start);

        completed
    }

    /// Return whatever speech is still buffered.
    pub fn flush(&mut self) -> Option<Vec<i16>> {
        if self.has_speech {
            let tail = std::mem::take(&mut self.pending);
            self.utterance.extend_from_slice(&tail);
            return Some(self.take());
        }
        self.pending.clear();
        self.utterance.clear();
        None
    }

    #[cfg(test)]
    fn has_speech(&self) -> bool {
        self.has_speech
    }

    fn take(&mut self) -> Vec<i16> {
        self.silence_frames = 0;
        self.has_speech = false;
        std::mem::take(&mut self.utterance)
    }
}

fn frame_rms(frame: &[i16]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let sum: f32 = frame
        .iter()
        .map(|&s| {
            let f = s as f32 / 32768.0;
            f * f
        })
        .sum();
    (sum / frame.len() as f32).sqrt()
}
