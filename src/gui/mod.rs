mod app;
mod clipboard;
mod fonts;

pub use app::TranslatorApp;
pub use clipboard::ArboardClipboard;
pub use fonts::configure_fonts;
