//! Landing screen

use super::fields::primary_button;
use crate::orchestrator::AppCommand;
use crate::ui::state::UiState;
use crate::ui::theme::Theme;
use egui::{self, RichText};

pub struct WelcomeScreen<'a> {
    state: &'a mut UiState,
    theme: &'a Theme,
}

impl<'a> WelcomeScreen<'a> {
    pub fn new(state: &'a mut UiState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.2);

            ui.label(
                RichText::new("BraillAI")
                    .size(44.0)
                    .strong()
                    .color(self.theme.text_primary),
            );
            ui.add_space(self.theme.spacing_sm);
            ui.label(
                RichText::new("Your voice-first personal assistant")
                    .size(18.0)
                    .color(self.theme.text_muted),
            );

            ui.add_space(self.theme.spacing_lg);

            if primary_button(ui, self.theme, true, "Get Started", "Get started").clicked() {
                self.state.send(AppCommand::GetStarted);
            }
        });
    }
}
