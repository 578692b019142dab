use std::time::Instant;

use eframe::egui;

use super::types::{TranslatorApp, UiAction};
use crate::config::{Language, Tone, TranslationStatus, LANGUAGES};
use crate::session::SessionState;

const ERROR_RED: egui::Color32 = egui::Color32::from_rgb(220, 70, 70);
const LISTENING_RED: egui::Color32 = egui::Color32::from_rgb(230, 60, 60);
const COPIED_GREEN: egui::Color32 = egui::Color32::from_rgb(70, 180, 90);
const PANEL_ROWS: usize = 8;

impl TranslatorApp {
    pub(crate) fn render(&self, ctx: &egui::Context, now: Instant) -> Vec<UiAction> {
        let mut actions = Vec::new();
        let state = self.session.state();
        let copied = state.is_copied(now);

        egui::CentralPanel::default()
            .frame(
                egui::Frame::central_panel(&ctx.style()).inner_margin(egui::Margin::same(16)),
            )
            .show(ctx, |ui| {
                render_header(ui, state, &mut actions);
                ui.add_space(8.0);
                render_language_bar(ui, state, &mut actions);
                ui.add_space(8.0);

                let pending = self.session.in_flight_translations();
                ui.columns(2, |columns| {
                    render_input_panel(&mut columns[0], state, &mut actions);
                    render_output_panel(&mut columns[1], state, copied, pending, &mut actions);
                });
            });

        if let Some(notice) = &state.notice {
            render_notice(ctx, notice, &mut actions);
        }

        actions
    }
}

fn render_header(ui: &mut egui::Ui, state: &SessionState, actions: &mut Vec<UiAction>) {
    ui.horizontal(|ui| {
        ui.heading("🌐 Live Translator");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            // Right-to-left layout, so iterate backwards to keep the order
            for tone in Tone::ALL.iter().rev() {
                let label = ui
                    .selectable_label(state.tone == *tone, tone.short_label())
                    .on_hover_text(tone.as_str());
                if label.clicked() && state.tone != *tone {
                    actions.push(UiAction::SetTone(*tone));
                }
            }
            ui.label(egui::RichText::new("Tone").weak());
        });
    });
}

fn render_language_bar(ui: &mut egui::Ui, state: &SessionState, actions: &mut Vec<UiAction>) {
    ui.horizontal(|ui| {
        ui.label("From");
        if let Some(language) = language_picker(ui, "source_language", state.source) {
            actions.push(UiAction::SetSource(language));
        }

        if ui
            .button("⇄")
            .on_hover_text("Swap languages")
            .clicked()
        {
            actions.push(UiAction::Swap);
        }

        ui.label("To");
        if let Some(language) = language_picker(ui, "target_language", state.target) {
            actions.push(UiAction::SetTarget(language));
        }
    });
}

/// Returns the newly picked language, if any.
fn language_picker(
    ui: &mut egui::Ui,
    id: &str,
    current: &'static Language,
) -> Option<&'static Language> {
    let mut picked = None;
    egui::ComboBox::from_id_salt(id)
        .selected_text(format!("{} {}", current.flag, current.name))
        .width(170.0)
        .show_ui(ui, |ui| {
            for language in LANGUAGES {
                let text = format!("{} {}", language.flag, language.name);
                if ui
                    .selectable_label(language == current, text)
                    .clicked()
                    && language != current
                {
                    picked = Some(language);
                }
            }
        });
    picked
}

fn render_input_panel(ui: &mut egui::Ui, state: &SessionState, actions: &mut Vec<UiAction>) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(state.source.name).strong());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let (icon, hover) = if state.is_listening {
                (
                    egui::RichText::new("⏹ Stop").color(LISTENING_RED),
                    "Stop voice input",
                )
            } else {
                (egui::RichText::new("🎤 Speak"), "Dictate in the source language")
            };
            if ui.button(icon).on_hover_text(hover).clicked() {
                actions.push(UiAction::ToggleListening);
            }

            if !state.input_text.is_empty()
                && ui.button("✕").on_hover_text("Clear").clicked()
            {
                actions.push(UiAction::ClearInput);
            }
        });
    });

    let mut input = state.input_text.clone();
    let response = ui.add(
        egui::TextEdit::multiline(&mut input)
            .hint_text("Type or speak to translate...")
            .desired_rows(PANEL_ROWS)
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        actions.push(UiAction::EditInput(input));
    }

    ui.horizontal(|ui| {
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(egui::RichText::new(char_count_label(&state.input_text)).small().weak());
        });
    });

    if state.is_listening {
        ui.horizontal(|ui| {
            ui.spinner();
            let hint = if state.interim_text.is_empty() {
                "Listening...".to_string()
            } else {
                state.interim_text.clone()
            };
            ui.label(egui::RichText::new(hint).italics().weak());
        });
    }
}

fn render_output_panel(
    ui: &mut egui::Ui,
    state: &SessionState,
    copied: bool,
    pending: usize,
    actions: &mut Vec<UiAction>,
) {
    let has_output = !state.translated_text.is_empty();

    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(state.target.name).strong());
        if state.status == TranslationStatus::Translating {
            ui.spinner()
                .on_hover_text(format!("{} request(s) in flight", pending));
        }
        if let Some(badge) = tone_badge(state) {
            ui.label(egui::RichText::new(badge).small().weak());
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let speak = if state.is_speaking { "🔊 Playing" } else { "🔊" };
            if ui
                .add_enabled(has_output && !state.is_speaking, egui::Button::new(speak))
                .on_hover_text("Listen")
                .clicked()
            {
                actions.push(UiAction::Speak);
            }

            let copy = if copied {
                egui::RichText::new("Copied ✔").color(COPIED_GREEN)
            } else {
                egui::RichText::new("📋 Copy")
            };
            if ui
                .add_enabled(has_output, egui::Button::new(copy))
                .clicked()
            {
                actions.push(UiAction::Copy);
            }
        });
    });

    egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(8))
        .show(ui, |ui| {
            ui.set_min_height(ui.text_style_height(&egui::TextStyle::Body) * PANEL_ROWS as f32);
            ui.set_width(ui.available_width());

            if has_output {
                ui.add(egui::Label::new(state.translated_text.as_str()).selectable(true));
            } else if state.status == TranslationStatus::Translating {
                ui.label(egui::RichText::new("Translating...").italics().weak());
            } else {
                ui.label(egui::RichText::new("Translation will appear here").weak());
            }
        });

    if state.status == TranslationStatus::Error {
        ui.colored_label(
            ERROR_RED,
            "⚠ Connection interrupted. Edit the text to retry.",
        );
    }
}

/// Counts characters, not bytes.
fn char_count_label(text: &str) -> String {
    format!("{} chars", text.chars().count())
}

/// Shown next to a translation made in a non-default tone.
fn tone_badge(state: &SessionState) -> Option<String> {
    if state.translated_text.is_empty() || state.tone == Tone::Standard {
        return None;
    }
    Some(format!("{} tone", state.tone))
}

fn render_notice(ctx: &egui::Context, notice: &str, actions: &mut Vec<UiAction>) {
    egui::Window::new("Voice input")
        .collapsible(false)
        .resizable(false)
        .default_width(320.0)
        .pivot(egui::Align2::CENTER_CENTER)
        .default_pos(ctx.screen_rect().center())
        .show(ctx, |ui| {
            ui.label(notice);
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                actions.push(UiAction::DismissNotice);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::find_language;

    fn state() -> SessionState {
        SessionState::new(find_language("en").unwrap(), find_language("ur").unwrap())
    }

    #[test]
    fn char_count_counts_characters() {
        assert_eq!(char_count_label(""), "0 chars");
        assert_eq!(char_count_label("hello"), "5 chars");
        assert_eq!(char_count_label("سلام"), "4 chars");
    }

    #[test]
    fn tone_badge_needs_output_and_non_standard_tone() {
        let mut state = state();
        state.tone = Tone::Casual;
        assert_eq!(tone_badge(&state), None);

        state.translated_text = "ہیلو".to_string();
        assert_eq!(tone_badge(&state).as_deref(), Some("Casual tone"));

        state.tone = Tone::Standard;
        assert_eq!(tone_badge(&state), None);
    }
}
