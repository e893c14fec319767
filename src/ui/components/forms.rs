//! Setup (credentials) and personal-info forms

use super::fields::{form_field, labeled_button, primary_button};
use crate::orchestrator::AppCommand;
use crate::speech::FormField;
use crate::ui::state::UiState;
use crate::ui::theme::Theme;
use crate::view::DashboardView;
use egui::{self, RichText};

pub struct SetupForm<'a> {
    view: &'a DashboardView,
    state: &'a mut UiState,
    theme: &'a Theme,
}

impl<'a> SetupForm<'a> {
    pub fn new(view: &'a DashboardView, state: &'a mut UiState, theme: &'a Theme) -> Self {
        Self { view, state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        ui.heading("Assistant Setup");
        ui.label(
            RichText::new("Enter the keys the assistant needs to run.")
                .color(self.theme.text_muted),
        );
        ui.add_space(self.theme.spacing);

        form_field(ui, self.view, self.state, self.theme, FormField::GeminiKey, true);
        form_field(ui, self.view, self.state, self.theme, FormField::DeviceRunnerKey, true);
        form_field(ui, self.view, self.state, self.theme, FormField::DeviceId, false);

        ui.add_space(self.theme.spacing);
        ui.horizontal(|ui| {
            let text = if self.view.saving { "Saving..." } else { "Save Configuration" };
            if primary_button(ui, self.theme, !self.view.saving, text, "Save configuration")
                .clicked()
            {
                self.state
                    .send(AppCommand::SaveConfig(self.state.config_draft.clone()));
            }
            if labeled_button(ui, true, "Switch Profile", "Switch profile").clicked() {
                self.state.send(AppCommand::SwitchProfile);
            }
        });
    }
}

pub struct PersonalInfoForm<'a> {
    view: &'a DashboardView,
    state: &'a mut UiState,
    theme: &'a Theme,
}

impl<'a> PersonalInfoForm<'a> {
    pub fn new(view: &'a DashboardView, state: &'a mut UiState, theme: &'a Theme) -> Self {
        Self { view, state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        ui.heading("Your Profile");
        ui.label(
            RichText::new("Shown to responders during an emergency.")
                .color(self.theme.text_muted),
        );
        ui.add_space(self.theme.spacing);

        egui::ScrollArea::vertical()
            .id_salt("personal_info_form")
            .max_height(ui.available_height() - 70.0)
            .show(ui, |ui| {
                for field in [
                    FormField::Name,
                    FormField::DateOfBirth,
                    FormField::BloodType,
                    FormField::Address,
                    FormField::EmergencyContactName,
                    FormField::EmergencyContactNumber,
                ] {
                    form_field(ui, self.view, self.state, self.theme, field, false);
                }
            });

        ui.add_space(self.theme.spacing);
        ui.horizontal(|ui| {
            let text = if self.view.saving { "Saving..." } else { "Save Profile" };
            if primary_button(ui, self.theme, !self.view.saving, text, "Save profile").clicked() {
                self.state
                    .send(AppCommand::SavePersonalInfo(self.state.info_draft.clone()));
            }
            if labeled_button(ui, true, "Switch Profile", "Switch profile").clicked() {
                self.state.send(AppCommand::SwitchProfile);
            }
        });
    }
}
