//! Blocking playback of a decoded PCM buffer on the default output device.

use std::collections::VecDeque;
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};

use super::pcm::PcmBuffer;
use super::AudioOutput;
use crate::error::SpeechError;

/// Extra wait after the queue drains so the device flushes its last period
const DRAIN_GRACE: Duration = Duration::from_millis(100);

/// cpal-backed speaker output. A fresh stream is opened for every buffer
/// and dropped once playback ends.
#[derive(Default)]
pub struct CpalOutput;

impl CpalOutput {
    pub fn new() -> Self {
        Self
    }
}

impl AudioOutput for CpalOutput {
    fn play(&self, buffer: &PcmBuffer) -> Result<(), SpeechError> {
        play_blocking(buffer).map_err(|e| SpeechError::Playback(format!("{:#}", e)))
    }
}

fn play_blocking(buffer: &PcmBuffer) -> Result<()> {
    if buffer.samples.is_empty() {
        return Ok(());
    }

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow!("No audio output device found"))?;
    let supported = device.default_output_config()?;

    let device_rate = supported.sample_rate();
    let channels = supported.channels() as usize;
    let samples = resample_linear(&buffer.samples, buffer.sample_rate, device_rate);
    log::debug!(
        "Playing {} samples ({}Hz -> {}Hz, {} ch)",
        buffer.samples.len(),
        buffer.sample_rate,
        device_rate,
        channels
    );

    let queue = Arc::new(Mutex::new(VecDeque::from(samples)));
    let (done_tx, done_rx) = mpsc::channel();
    let config = supported.config();

    let stream = match supported.sample_format() {
        cpal::SampleFormat::F32 => {
            build_stream::<f32>(&device, &config, channels, queue, done_tx)?
        }
        cpal::SampleFormat::I16 => {
            build_stream::<i16>(&device, &config, channels, queue, done_tx)?
        }
        cpal::SampleFormat::U16 => {
            build_stream::<u16>(&device, &config, channels, queue, done_tx)?
        }
        other => bail!("Unsupported output sample format: {:?}", other),
    };
    stream.play()?;

    let result = wait_for_drain(&done_rx, buffer.duration() + Duration::from_secs(2));
    drop(stream);
    result
}

/// Block until the callback reports an empty queue. A device that stops
/// pulling data runs into `deadline` and fails the playback.
fn wait_for_drain(done_rx: &mpsc::Receiver<()>, deadline: Duration) -> Result<()> {
    match done_rx.recv_timeout(deadline) {
        Ok(()) => {
            std::thread::sleep(DRAIN_GRACE);
            Ok(())
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            bail!("playback did not drain within {:?}", deadline)
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => bail!("audio stream closed unexpectedly"),
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    queue: Arc<Mutex<VecDeque<f32>>>,
    done_tx: mpsc::Sender<()>,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let mut done_tx = Some(done_tx);
    let channels = channels.max(1);

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let mut queue = queue.lock().unwrap_or_else(|e| e.into_inner());
            // Mono source: same sample on every channel of the frame
            for frame in data.chunks_mut(channels) {
                let value = match queue.pop_front() {
                    Some(sample) => sample.clamp(-1.0, 1.0),
                    None => 0.0,
                };
                for out in frame.iter_mut() {
                    *out = T::from_sample(value);
                }
            }
            if queue.is_empty() {
                if let Some(tx) = done_tx.take() {
                    let _ = tx.send(());
                }
            }
        },
        |err| log::error!("Audio output error: {}", err),
        None,
    )?;

    Ok(stream)
}

/// Simple linear resampling (good enough for speech)
pub fn resample_linear(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || from_rate == 0 || to_rate == 0 || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let new_len = (samples.len() as f64 / ratio) as usize;
    let mut output = Vec::with_capacity(new_len);

    for i in 0..new_len {
        let src_pos = i as f64 * ratio;
        let src_idx = src_pos as usize;
        let frac = (src_pos - src_idx as f64) as f32;

        let s1 = samples.get(src_idx).copied().unwrap_or(0.0);
        let s2 = samples.get(src_idx + 1).copied().unwrap_or(s1);

        output.push(s1 * (1.0 - frac) + s2 * frac);
    }

    output
}
