//! Voice input backends for `session::SpeechCapture`.

mod microphone;
pub mod segmenter;

pub use microphone::MicrophoneCapture;
