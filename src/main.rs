mod api;
mod capture;
mod config;
mod error;
mod gui;
mod session;

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use env_logger::Env;

use api::{CpalOutput, GeminiClient, SpeechClient, TextTranslator, Transcriber};
use capture::MicrophoneCapture;
use config::Config;
use gui::{ArboardClipboard, TranslatorApp};
use session::{Backends, Notifier, Session};

pub const WINDOW_WIDTH: f32 = 960.0;
pub const WINDOW_HEIGHT: f32 = 560.0;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    // Configuration problems are fatal before any window or request
    let config = Config::from_env().context("invalid configuration")?;
    log::info!("Starting with {:?}", config);
    let client = Arc::new(GeminiClient::new(&config).context("cannot create Gemini client")?);

    let translator = Arc::new(TextTranslator::new(
        Arc::clone(&client),
        config.text_model.clone(),
    ));
    let speaker = Arc::new(SpeechClient::new(
        Arc::clone(&client),
        config.tts_model.clone(),
        config.voice_name.clone(),
        Box::new(CpalOutput::new()),
    ));
    let transcriber = Arc::new(Transcriber::new(
        Arc::clone(&client),
        config.stt_model.clone(),
    ));

    let viewport = eframe::egui::ViewportBuilder::default()
        .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
        .with_min_inner_size([640.0, 420.0])
        .with_resizable(true);
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Live Translator",
        options,
        Box::new(move |cc| {
            gui::configure_fonts(&cc.egui_ctx);

            // Workers wake the UI through this
            let egui_ctx = cc.egui_ctx.clone();
            let notify: Notifier = Arc::new(move || egui_ctx.request_repaint());

            let backends = Backends {
                translator,
                speaker,
                clipboard: Box::new(ArboardClipboard::new()),
                capture: Box::new(MicrophoneCapture::new(transcriber)),
            };
            let session = Session::new(&config, backends, notify);
            Ok(Box::new(TranslatorApp::new(session)))
        }),
    )
    .map_err(|e| anyhow!("GUI error: {}", e))
}
