//! Windows drawn over the current screen: emergency alert, contact picker,
//! confirmations and toast notices

use super::fields::{labeled_button, primary_button};
use crate::emergency::AlertPayload;
use crate::orchestrator::AppCommand;
use crate::ui::state::UiState;
use crate::ui::theme::Theme;
use crate::view::DashboardView;
use egui::{self, Align2, RichText, Vec2};

fn modal(title: &str, id: &str) -> egui::Window<'static> {
    egui::Window::new(title.to_string())
        .id(egui::Id::new(id.to_string()))
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
}

pub struct AlertWindow<'a> {
    view: &'a DashboardView,
    state: &'a mut UiState,
    theme: &'a Theme,
}

impl<'a> AlertWindow<'a> {
    pub fn new(view: &'a DashboardView, state: &'a mut UiState, theme: &'a Theme) -> Self {
        Self { view, state, theme }
    }

    pub fn show(self, ctx: &egui::Context) {
        let Some(alert) = &self.view.alert else {
            return;
        };
        modal("🚨 EMERGENCY ALERT", "emergency_alert")
            .frame(
                egui::Frame::window(&ctx.style())
                    .fill(self.theme.emergency.gamma_multiply(0.35))
                    .stroke(egui::Stroke::new(3.0, self.theme.emergency)),
            )
            .show(ctx, |ui| {
                ui.set_min_width(360.0);
                ui.label(
                    RichText::new("Emergency services have been notified")
                        .strong()
                        .color(self.theme.text_primary),
                );
                ui.add_space(self.theme.spacing_sm);
                show_alert_fields(ui, alert);
                ui.add_space(self.theme.spacing);
                if primary_button(ui, self.theme, true, "Dismiss", "Dismiss emergency alert")
                    .clicked()
                {
                    self.state.send(AppCommand::DismissAlert);
                }
            });
    }
}

fn show_alert_fields(ui: &mut egui::Ui, alert: &AlertPayload) {
    egui::Grid::new("alert_fields")
        .num_columns(2)
        .spacing([16.0, 6.0])
        .show(ui, |ui| {
            ui.label(RichText::new("Name").strong());
            ui.label(alert.display_name());
            ui.end_row();
            ui.label(RichText::new("Blood Type").strong());
            ui.label(alert.display_blood());
            ui.end_row();
            ui.label(RichText::new("Address").strong());
            ui.label(alert.display_address());
            ui.end_row();
            ui.label(RichText::new("Emergency Contact").strong());
            ui.label(alert.display_contact());
            ui.end_row();
        });
}

pub struct ContactPicker<'a> {
    view: &'a DashboardView,
    state: &'a mut UiState,
    theme: &'a Theme,
}

impl<'a> ContactPicker<'a> {
    pub fn new(view: &'a DashboardView, state: &'a mut UiState, theme: &'a Theme) -> Self {
        Self { view, state, theme }
    }

    pub fn show(self, ctx: &egui::Context) {
        let Some(action) = self.view.picker else {
            return;
        };
        let contacts = &self.view.contacts;
        modal(action.picker_title(), "contact_picker").show(ctx, |ui| {
            ui.set_min_width(300.0);
            for contact in contacts {
                let text = format!("{}  ·  {}", contact.name, contact.number);
                let label = format!("{} {}", action.verb(), contact.name);
                let response = ui.add_sized(
                    Vec2::new(ui.available_width(), 40.0),
                    egui::Button::new(text),
                );
                response.widget_info(|| {
                    egui::WidgetInfo::labeled(egui::WidgetType::Button, true, &label)
                });
                if response.clicked() {
                    self.state.send(AppCommand::PickContact {
                        name: contact.name.clone(),
                    });
                }
            }
            ui.add_space(self.theme.spacing_sm);
            if labeled_button(ui, true, "Cancel", "Cancel contact selection").clicked() {
                self.state.send(AppCommand::CancelPicker);
            }
        });
    }
}

pub struct ConfirmDialog<'a> {
    state: &'a mut UiState,
    theme: &'a Theme,
}

impl<'a> ConfirmDialog<'a> {
    pub fn new(state: &'a mut UiState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ctx: &egui::Context) {
        let Some(confirm) = &self.state.confirm else {
            return;
        };
        let question = confirm.question();
        let mut accepted = false;
        let mut cancelled = false;

        modal("Please confirm", "confirm_dialog").show(ctx, |ui| {
            ui.label(RichText::new(&question).color(self.theme.text_primary));
            ui.add_space(self.theme.spacing);
            ui.horizontal(|ui| {
                accepted = labeled_button(ui, true, "Delete", "Confirm delete").clicked();
                cancelled = labeled_button(ui, true, "Cancel", "Cancel delete").clicked();
            });
        });

        if accepted {
            self.state.accept_confirm();
        } else if cancelled {
            self.state.cancel_confirm();
        }
    }
}

pub struct Toasts<'a> {
    view: &'a DashboardView,
    state: &'a mut UiState,
    theme: &'a Theme,
}

impl<'a> Toasts<'a> {
    pub fn new(view: &'a DashboardView, state: &'a mut UiState, theme: &'a Theme) -> Self {
        Self { view, state, theme }
    }

    pub fn show(self, ctx: &egui::Context) {
        if self.view.notices.is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("toasts"))
            .anchor(Align2::RIGHT_TOP, [-16.0, 16.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for notice in &self.view.notices {
                    let color = self.theme.notice_color(notice.level);
                    egui::Frame::none()
                        .fill(self.theme.bg_secondary)
                        .stroke(egui::Stroke::new(2.0, color))
                        .rounding(self.theme.button_rounding)
                        .inner_margin(self.theme.spacing_sm)
                        .show(ui, |ui| {
                            ui.set_max_width(320.0);
                            ui.horizontal(|ui| {
                                let label = format!("Notice: {}", notice.text);
                                ui.label(RichText::new(&notice.text).color(self.theme.text_primary))
                                    .widget_info(|| {
                                        egui::WidgetInfo::labeled(
                                            egui::WidgetType::Label,
                                            true,
                                            &label,
                                        )
                                    });
                                if labeled_button(ui, true, "✕", "Dismiss notice").clicked() {
                                    self.state.send(AppCommand::DismissNotice(notice.id));
                                }
                            });
                        });
                    ui.add_space(4.0);
                }
            });
    }
}
