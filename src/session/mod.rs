//! Translation session: the view state plus the rules that move it.
//!
//! All state lives on the UI thread. Remote calls run on worker threads and
//! post `SessionEvent`s back; `tick` drains them and fires the debounce.
//!
//! Every input, tone or language change takes a new request generation.
//! A translation result is applied only while its generation is still the
//! latest, so late answers for superseded text are dropped.

mod backends;
mod debounce;
mod state;


pub use backends::{
    CaptureEvent, CaptureSink, ClipboardSink, Notifier, SpeechCapture, Speaker,
    TranslationRequest, Translator,
};
use debounce::Debouncer;
pub use state::SessionState;

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{Config, Language, Tone, TranslationStatus};
use crate::error::{RecognitionError, SpeechError, TranslationError};

/// How long the "copied" indicator stays up
pub const COPIED_INDICATOR: Duration = Duration::from_secs(2);

pub(crate) enum SessionEvent {
    Translated {
        generation: u64,
        result: Result<String, TranslationError>,
    },
    SpeechFinished(Result<(), SpeechError>),
    Capture {
        run: u64,
        event: CaptureEvent,
    },
}

/// The injected implementations a session talks to.
pub struct Backends {
    pub translator: Arc<dyn Translator>,
    pub speaker: Arc<dyn Speaker>,
    pub clipboard: Box<dyn ClipboardSink>,
    pub capture: Box<dyn SpeechCapture>,
}

pub struct Session {
    state: SessionState,
    translator: Arc<dyn Translator>,
    speaker: Arc<dyn Speaker>,
    clipboard: Box<dyn ClipboardSink>,
    capture: Box<dyn SpeechCapture>,
    debouncer: Debouncer,
    /// Generation of the latest input; results carrying another one are stale
    generation: u64,
    /// Id of the current voice capture run
    capture_run: u64,
    in_flight: usize,
    events_tx: Sender<SessionEvent>,
    events_rx: Receiver<SessionEvent>,
    notify: Notifier,
}

impl Session {
    pub fn new(config: &Config, backends: Backends, notify: Notifier) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            state: SessionState::new(config.default_source, config.default_target),
            translator: backends.translator,
            speaker: backends.speaker,
            clipboard: backends.clipboard,
            capture: backends.capture,
            debouncer: Debouncer::new(config.debounce),
            generation: 0,
            capture_run: 0,
            in_flight: 0,
            events_tx,
            events_rx,
            notify,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Translation requests issued whose results have not come back yet.
    pub fn in_flight_translations(&self) -> usize {
        self.in_flight
    }

    // ========================================================================
    // USER ACTIONS
    // ========================================================================

    pub fn set_input_text(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        if text == self.state.input_text {
            return;
        }
        self.state.input_text = text;
        self.on_input_changed(now);
    }

    pub fn clear_input(&mut self, now: Instant) {
        self.set_input_text(String::new(), now);
    }

    /// Re-translates right away, skipping the debounce.
    pub fn set_tone(&mut self, tone: Tone) {
        if tone == self.state.tone {
            return;
        }
        self.state.tone = tone;

        if self.state.has_input() {
            self.debouncer.cancel();
            self.next_generation();
            self.request_translation();
        }
    }

    pub fn set_source_language(&mut self, language: &'static Language, now: Instant) {
        if language == self.state.source {
            return;
        }
        self.state.source = language;
        self.on_languages_changed(now);
    }

    pub fn set_target_language(&mut self, language: &'static Language, now: Instant) {
        if language == self.state.target {
            return;
        }
        self.state.target = language;
        self.on_languages_changed(now);
    }

    /// Exchange the languages and the two texts, then translate the new
    /// input through the debounce.
    pub fn swap_languages(&mut self, now: Instant) {
        std::mem::swap(&mut self.state.source, &mut self.state.target);
        std::mem::swap(&mut self.state.input_text, &mut self.state.translated_text);
        self.on_input_changed(now);
    }

    /// Returns false when there is nothing to say or playback is running.
    pub fn speak(&mut self) -> bool {
        if self.state.translated_text.is_empty() || self.state.is_speaking {
            return false;
        }
        self.state.is_speaking = true;

        let speaker = Arc::clone(&self.speaker);
        let text = self.state.translated_text.clone();
        let tx = self.events_tx.clone();
        let notify = Arc::clone(&self.notify);
        std::thread::spawn(move || {
            let result = speaker.speak(&text);
            let _ = tx.send(SessionEvent::SpeechFinished(result));
            notify();
        });
        true
    }

    /// Returns true when the translation was copied.
    pub fn copy(&mut self, now: Instant) -> bool {
        if self.state.translated_text.is_empty() {
            return false;
        }
        match self.clipboard.set_text(&self.state.translated_text) {
            Ok(()) => {
                self.state.copied_until = Some(now + COPIED_INDICATOR);
                true
            }
            Err(e) => {
                log::error!("Failed to copy: {:#}", e);
                false
            }
        }
    }

    pub fn toggle_listening(&mut self) {
        if self.state.is_listening {
            self.capture.stop();
            self.state.is_listening = false;
            self.state.interim_text.clear();
            return;
        }

        self.capture_run += 1;
        let sink = CaptureSink::new(
            self.capture_run,
            self.events_tx.clone(),
            Arc::clone(&self.notify),
        );
        let source = self.state.source;
        match self.capture.start(source.locale, source.name, sink) {
            Ok(()) => log::info!("Voice input requested ({})", source.locale),
            Err(RecognitionError::Unsupported(message)) => {
                self.state.notice = Some(message);
            }
            Err(e) => log::error!("Speech recognition error: {}", e),
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.state.notice = None;
    }

    // ========================================================================
    // EVENT LOOP
    // ========================================================================

    /// Apply finished background work and fire the debounce if due.
    /// Returns true when the state may have changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;

        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event, now);
            changed = true;
        }

        if self.debouncer.fire_if_due(now) {
            self.request_translation();
            changed = true;
        }

        if self.state.copied_until.is_some_and(|until| now >= until) {
            self.state.copied_until = None;
            changed = true;
        }

        changed
    }

    /// Time until the next deadline `tick` has to observe.
    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        [self.debouncer.deadline(), self.state.copied_until]
            .into_iter()
            .flatten()
            .min()
            .map(|at| at.saturating_duration_since(now))
    }

    fn handle_event(&mut self, event: SessionEvent, now: Instant) {
        match event {
            SessionEvent::Translated { generation, result } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.on_translated(generation, result);
            }
            SessionEvent::SpeechFinished(result) => {
                self.state.is_speaking = false;
                if let Err(e) = result {
                    log::error!("TTS failed: {}", e);
                }
            }
            SessionEvent::Capture { run, event } => self.on_capture_event(run, event, now),
        }
    }

    fn on_translated(&mut self, generation: u64, result: Result<String, TranslationError>) {
        if generation != self.generation {
            log::debug!(
                "Dropping stale translation (generation {} < {})",
                generation,
                self.generation
            );
            return;
        }

        match result {
            Ok(text) => {
                self.state.translated_text = text;
                self.state.status = TranslationStatus::Success;
            }
            Err(e) => {
                log::warn!("Translation error: {}", e);
                self.state.status = TranslationStatus::Error;
            }
        }
    }

    fn on_capture_event(&mut self, run: u64, event: CaptureEvent, now: Instant) {
        // Text from a stopped run is still the user's speech; status
        // changes from it are not.
        let current = run == self.capture_run;

        match event {
            CaptureEvent::Started if current => self.state.is_listening = true,
            CaptureEvent::Segment { text, is_final } => {
                let text = text.trim();
                if !is_final {
                    if current {
                        self.state.interim_text = text.to_string();
                    }
                    return;
                }
                if current {
                    self.state.interim_text.clear();
                }
                if text.is_empty() {
                    return;
                }
                let joined = if self.state.input_text.is_empty() {
                    text.to_string()
                } else {
                    format!("{} {}", self.state.input_text, text)
                };
                self.set_input_text(joined, now);
            }
            CaptureEvent::Error(message) => {
                log::error!("Speech recognition error: {}", message);
                if current {
                    self.capture.stop();
                    self.state.is_listening = false;
                    self.state.interim_text.clear();
                }
            }
            CaptureEvent::Ended if current => {
                self.state.is_listening = false;
                self.state.interim_text.clear();
            }
            _ => {}
        }
    }

    // ========================================================================
    // TRANSLATION
    // ========================================================================

    fn on_input_changed(&mut self, now: Instant) {
        self.next_generation();

        if self.state.has_input() {
            self.debouncer.schedule(now);
        } else {
            self.debouncer.cancel();
            self.state.translated_text.clear();
            self.state.status = TranslationStatus::Idle;
        }
    }

    fn on_languages_changed(&mut self, now: Instant) {
        if self.state.has_input() {
            self.next_generation();
            self.debouncer.schedule(now);
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn request_translation(&mut self) {
        if !self.state.has_input() {
            self.state.status = TranslationStatus::Idle;
            return;
        }

        let request = TranslationRequest {
            text: self.state.input_text.clone(),
            source: self.state.source,
            target: self.state.target,
            tone: self.state.tone,
        };
        let generation = self.generation;
        log::debug!(
            "Translating {} chars {} -> {} ({}), generation {}",
            request.text.chars().count(),
            request.source.code,
            request.target.code,
            request.tone,
            generation
        );

        self.state.status = TranslationStatus::Translating;
        self.in_flight += 1;

        let translator = Arc::clone(&self.translator);
        let tx = self.events_tx.clone();
        let notify = Arc::clone(&self.notify);
        std::thread::spawn(move || {
            let result = translator.translate(&request);
            let _ = tx.send(SessionEvent::Translated { generation, result });
            notify();
        });
    }

    /// Block until one background event arrives and apply it.
    #[cfg(test)]
    pub(crate) fn wait_for_event(&mut self, timeout: Duration, now: Instant) -> bool {
        match self.events_rx.recv_timeout(timeout) {
            Ok(event) => {
                self.handle_event(event, now);
                true
            }
            Err(_) => false,
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.capture.stop();
    }
}
