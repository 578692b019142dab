//! Microphone capture: cpal input, pause segmentation, Gemini transcription.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};

use super::segmenter::{PauseSegmenter, SEGMENT_RATE};
use crate::api::stt::encode_wav;
use crate::api::Transcriber;
use crate::error::{ApiError, RecognitionError};
use crate::session::{CaptureSink, SpeechCapture};

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const STARTUP_TIMEOUT: Duration = Duration::from_secs(3);

/// Turns one WAV utterance into text. An empty string means no speech.
pub trait UtteranceTranscriber: Send + Sync {
    fn transcribe(&self, wav: &[u8], language: &str) -> Result<String, ApiError>;
}

impl UtteranceTranscriber for Transcriber {
    fn transcribe(&self, wav: &[u8], language: &str) -> Result<String, ApiError> {
        Transcriber::transcribe(self, wav, language)
    }
}

/// Continuous voice input from the default microphone.
///
/// Each run owns a worker thread that keeps the cpal stream (streams are
/// not `Send`), cuts the audio at pauses and sends every utterance to the
/// transcriber. Recognized text arrives as final segments. A failed
/// transcription ends the run.
pub struct MicrophoneCapture {
    transcriber: Arc<dyn UtteranceTranscriber>,
    stop_signal: Option<Arc<AtomicBool>>,
}

impl MicrophoneCapture {
    pub fn new(transcriber: Arc<dyn UtteranceTranscriber>) -> Self {
        Self {
            transcriber,
            stop_signal: None,
        }
    }
}

impl SpeechCapture for MicrophoneCapture {
    fn start(
        &mut self,
        locale: &str,
        language_name: &str,
        sink: CaptureSink,
    ) -> Result<(), RecognitionError> {
        self.stop();

        if cpal::default_host().default_input_device().is_none() {
            return Err(RecognitionError::Unsupported(
                "Voice input needs a microphone, and none was found.".to_string(),
            ));
        }

        let stop_signal = Arc::new(AtomicBool::new(false));
        let (ready_tx, ready_rx) = mpsc::channel();
        let worker = CaptureWorker {
            transcriber: Arc::clone(&self.transcriber),
            language: language_name.to_string(),
            stop_signal: Arc::clone(&stop_signal),
            sink,
        };
        std::thread::spawn(move || worker.run(ready_tx));

        match ready_rx.recv_timeout(STARTUP_TIMEOUT) {
            Ok(Ok(())) => {
                log::info!("Microphone capture started ({})", locale);
                self.stop_signal = Some(stop_signal);
                Ok(())
            }
            Ok(Err(e)) => Err(RecognitionError::Device(e.to_string())),
            Err(_) => {
                stop_signal.store(true, Ordering::SeqCst);
                Err(RecognitionError::Device(
                    "microphone did not start in time".to_string(),
                ))
            }
        }
    }

    fn stop(&mut self) {
        if let Some(signal) = self.stop_signal.take() {
            signal.store(true, Ordering::SeqCst);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunEnd {
    Stopped,
    Failed,
    SessionGone,
}

struct CaptureWorker {
    transcriber: Arc<dyn UtteranceTranscriber>,
    language: String,
    stop_signal: Arc<AtomicBool>,
    sink: CaptureSink,
}

impl CaptureWorker {
    fn run(self, ready_tx: Sender<Result<()>>) {
        let (audio_tx, audio_rx) = mpsc::channel::<Vec<i16>>();
        let stream = match open_input_stream(audio_tx) {
            Ok(stream) => stream,
            Err(e) => {
                log::error!("Failed to open microphone: {:#}", e);
                let _ = ready_tx.send(Err(e));
                return;
            }
        };
        if ready_tx.send(Ok(())).is_err() {
            // start() gave up waiting
            return;
        }
        self.sink.started();

        let mut segmenter = PauseSegmenter::default();
        let end = self.record(&audio_rx, &mut segmenter);
        drop(stream);
        if end != RunEnd::SessionGone {
            self.finish(&audio_rx, segmenter);
        }
    }

    /// Transcribe utterances until stopped or a transcription fails.
    fn record(&self, audio_rx: &Receiver<Vec<i16>>, segmenter: &mut PauseSegmenter) -> RunEnd {
        while !self.stop_signal.load(Ordering::SeqCst) {
            match audio_rx.recv_timeout(POLL_INTERVAL) {
                Ok(chunk) => {
                    for utterance in segmenter.push(&chunk) {
                        match self.transcribe(&utterance) {
                            Ok(true) => {}
                            Ok(false) => return RunEnd::SessionGone,
                            Err(e) => {
                                log::warn!("{}", e);
                                self.sink.error(e.to_string());
                                return RunEnd::Failed;
                            }
                        }
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    let e = RecognitionError::Device("microphone stream closed".to_string());
                    self.sink.error(e.to_string());
                    return RunEnd::Failed;
                }
            }
        }
        RunEnd::Stopped
    }

    /// Transcribe what is still buffered, then report the end of the run.
    fn finish(&self, audio_rx: &Receiver<Vec<i16>>, mut segmenter: PauseSegmenter) {
        let mut utterances: Vec<Vec<i16>> = audio_rx
            .try_iter()
            .flat_map(|chunk| segmenter.push(&chunk))
            .collect();
        utterances.extend(segmenter.flush());

        for utterance in utterances {
            if let Err(e) = self.transcribe(&utterance) {
                log::warn!("Dropping buffered speech: {}", e);
            }
        }
        log::info!("Microphone capture stopped");
        self.sink.ended();
    }

    /// Ok(false) once the session is gone.
    fn transcribe(&self, samples: &[i16]) -> Result<bool, RecognitionError> {
        let wav = match encode_wav(samples, SEGMENT_RATE) {
            Ok(wav) => wav,
            Err(e) => {
                log::error!("Failed to encode utterance: {:#}", e);
                return Ok(true);
            }
        };
        log::debug!(
            "Transcribing {:.1}s of audio",
            samples.len() as f32 / SEGMENT_RATE as f32
        );

        let text = self.transcriber.transcribe(&wav, &self.language)?;
        if text.is_empty() {
            return Ok(true);
        }
        Ok(self.sink.segment(text, true))
    }
}

fn open_input_stream(audio_tx: Sender<Vec<i16>>) -> Result<cpal::Stream> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| anyhow!("No input device available"))?;
    let supported = device.default_input_config()?;

    let sample_rate = supported.sample_rate();
    let channels = supported.channels() as usize;
    let config = supported.config();
    log::debug!("Input device: {}Hz, {} ch", sample_rate, channels);

    let stream = match supported.sample_format() {
        cpal::SampleFormat::F32 => {
            build_input::<f32>(&device, &config, channels, sample_rate, audio_tx)?
        }
        cpal::SampleFormat::I16 => {
            build_input::<i16>(&device, &config, channels, sample_rate, audio_tx)?
        }
        cpal::SampleFormat::U16 => {
            build_input::<u16>(&device, &config, channels, sample_rate, audio_tx)?
        }
        other => bail!("Unsupported input sample format: {:?}", other),
    };
    stream.play()?;
    Ok(stream)
}

fn build_input<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    sample_rate: u32,
    audio_tx: Sender<Vec<i16>>,
) -> Result<cpal::Stream>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let channels = channels.max(1);
    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            let mono: Vec<i16> = data
                .chunks(channels)
                .map(|frame| {
                    let sum: f32 = frame.iter().map(|s| s.to_sample::<f32>()).sum();
                    let value = (sum / frame.len() as f32).clamp(-1.0, 1.0);
                    (value * i16::MAX as f32) as i16
                })
                .collect();
            let _ = audio_tx.send(resample_to_16khz(&mono, sample_rate));
        },
        |err| log::error!("Audio input error: {}", err),
        None,
    )?;
    Ok(stream)
}

/// Nearest-sample resampling to the segmenter rate.
pub fn resample_to_16khz(samples: &[i16], source_rate: u32) -> Vec<i16> {
    if source_rate == SEGMENT_RATE || source_rate == 0 {
        return samples.to_vec();
    }
    let new_len = samples.len() as u64 * SEGMENT_RATE as u64 / source_rate as u64;
    (0..new_len)
        .filter_map(|i| {
            let src = i * source_rate as u64 / SEGMENT_RATE as u64;
            samples.get(src as usize).copied()
        })
        .collect()
}
