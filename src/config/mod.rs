//! Configuration module for live-translator.
//!
//! - `types`: tone and status enums
//! - `languages`: the static language catalog
//! - `config_struct`: environment-driven runtime config

mod config_struct;
mod languages;
mod types;

pub use config_struct::Config;
pub use languages::{find_language, Language, LANGUAGES};
pub use types::{Tone, TranslationStatus};
