pub mod client;
pub mod stt;
pub mod text;
pub mod tts;
pub mod types;

pub use client::GeminiClient;
pub use stt::Transcriber;
pub use text::TextTranslator;
pub use tts::{player::CpalOutput, SpeechClient};
