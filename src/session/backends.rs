//! Seams between the session and the outside world. The app wires the
//! Gemini, cpal and arboard implementations in; tests wire fakes.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use super::SessionEvent;
use crate::config::{Language, Tone};
use crate::error::{RecognitionError, SpeechError, TranslationError};

/// Wakes the UI after a worker posted an event.
pub type Notifier = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone)]
pub struct TranslationRequest {
    pub text: String,
    pub source: &'static Language,
    pub target: &'static Language,
    pub tone: Tone,
}

/// Remote translation. Called on a worker thread, one attempt per call.
pub trait Translator: Send + Sync {
    fn translate(&self, request: &TranslationRequest) -> Result<String, TranslationError>;
}

/// Remote speech synthesis plus playback. Returns once playback ended.
pub trait Speaker: Send + Sync {
    fn speak(&self, text: &str) -> Result<(), SpeechError>;
}

pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> anyhow::Result<()>;
}

/// Continuous voice input with interim results.
pub trait SpeechCapture {
    /// Begin capturing in `locale`. Events arrive through `sink`, starting
    /// with `CaptureEvent::Started`.
    fn start(
        &mut self,
        locale: &str,
        language_name: &str,
        sink: CaptureSink,
    ) -> Result<(), RecognitionError>;

    fn stop(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaptureEvent {
    Started,
    Segment { text: String, is_final: bool },
    Error(String),
    Ended,
}

/// Handle a capture backend uses to report back to the session.
#[derive(Clone)]
pub struct CaptureSink {
    run: u64,
    tx: Sender<SessionEvent>,
    notify: Notifier,
}

impl CaptureSink {
    pub(crate) fn new(run: u64, tx: Sender<SessionEvent>, notify: Notifier) -> Self {
        Self { run, tx, notify }
    }

    /// Returns false once the session is gone.
    pub fn send(&self, event: CaptureEvent) -> bool {
        let delivered = self
            .tx
            .send(SessionEvent::Capture {
                run: self.run,
                event,
            })
            .is_ok();
        (self.notify)();
        delivered
    }

    pub fn started(&self) -> bool {
        self.send(CaptureEvent::Started)
    }

    pub fn segment(&self, text: impl Into<String>, is_final: bool) -> bool {
        self.send(CaptureEvent::Segment {
            text: text.into(),
            is_final,
        })
    }

    pub fn error(&self, message: impl Into<String>) -> bool {
        self.send(CaptureEvent::Error(message.into()))
    }

    pub fn ended(&self) -> bool {
        self.send(CaptureEvent::Ended)
    }
}
