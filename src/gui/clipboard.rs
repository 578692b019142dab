use anyhow::Result;
use arboard::Clipboard;

use crate::session::ClipboardSink;

/// System clipboard. The handle is opened lazily and kept, since some
/// platforms drop the contents once the owning handle goes away.
#[derive(Default)]
pub struct ArboardClipboard {
    inner: Option<Clipboard>,
}

impl ArboardClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardSink for ArboardClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let clipboard = match self.inner.as_mut() {
            Some(clipboard) => clipboard,
            None => self.inner.insert(Clipboard::new()?),
        };
        clipboard.set_text(text.to_string())?;
        Ok(())
    }
}
