//! Profile selector: pick, create or delete local profiles

use super::fields::{card, labeled_button, primary_button};
use crate::orchestrator::AppCommand;
use crate::profile::Profile;
use crate::ui::state::{Confirm, UiState};
use crate::ui::theme::Theme;
use crate::view::DashboardView;
use egui::{self, RichText, Vec2};

pub struct ProfileSelector<'a> {
    view: &'a DashboardView,
    state: &'a mut UiState,
    theme: &'a Theme,
}

impl<'a> ProfileSelector<'a> {
    pub fn new(view: &'a DashboardView, state: &'a mut UiState, theme: &'a Theme) -> Self {
        Self { view, state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        let view = self.view;
        ui.vertical_centered(|ui| {
            ui.add_space(self.theme.spacing_lg);
            ui.heading("Who's using BraillAI?");
            ui.add_space(self.theme.spacing);
        });

        egui::ScrollArea::vertical()
            .id_salt("profile_list")
            .auto_shrink([false, true])
            .max_height(ui.available_height() - 120.0)
            .show(ui, |ui| {
                if view.profiles.is_empty() {
                    ui.label(
                        RichText::new("No profiles yet. Create one to get started.")
                            .color(self.theme.text_muted),
                    );
                }
                for profile in &view.profiles {
                    self.show_profile(ui, profile);
                    ui.add_space(self.theme.spacing_sm);
                }
            });

        ui.add_space(self.theme.spacing);
        ui.horizontal(|ui| {
            if primary_button(ui, self.theme, true, "➕ New Profile", "Create new profile").clicked()
            {
                self.state.send(AppCommand::CreateProfile);
            }
            if labeled_button(ui, true, "Back", "Back to welcome").clicked() {
                self.state.send(AppCommand::Back);
            }
        });
    }

    fn show_profile(&mut self, ui: &mut egui::Ui, profile: &Profile) {
        let active = self.view.active_profile_id.as_deref() == Some(profile.id.as_str());
        card(self.theme).show(ui, |ui| {
            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(Vec2::splat(40.0), egui::Sense::hover());
                ui.painter()
                    .circle_filled(rect.center(), 20.0, self.theme.primary);
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    profile.initial(),
                    egui::FontId::proportional(20.0),
                    self.theme.text_primary,
                );

                ui.vertical(|ui| {
                    ui.label(
                        RichText::new(profile.display_name())
                            .size(18.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );
                    if active {
                        ui.label(RichText::new("Active").small().color(self.theme.success));
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let name = profile.display_name();
                    if labeled_button(ui, true, "🗑", &format!("Delete profile {}", name)).clicked()
                    {
                        self.state.confirm = Some(Confirm::DeleteProfile {
                            id: profile.id.clone(),
                            name: name.to_string(),
                        });
                    }
                    if labeled_button(ui, true, "Select", &format!("Select profile {}", name))
                        .clicked()
                    {
                        self.state.send(AppCommand::SelectProfile {
                            id: profile.id.clone(),
                        });
                    }
                });
            });
        });
    }
}
