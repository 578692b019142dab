mod rendering;
mod types;

pub use types::TranslatorApp;

use std::time::Instant;

use eframe::egui;

impl eframe::App for TranslatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Background results first, so this frame shows them
        let now = Instant::now();
        self.session.tick(now);

        let actions = self.render(ctx, now);
        for action in actions {
            self.apply(action, Instant::now());
        }

        // Deadlines the session waits on (debounce, copied badge)
        if let Some(delay) = self.session.next_wakeup(Instant::now()) {
            ctx.request_repaint_after(delay);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("Window closed");
    }
}
