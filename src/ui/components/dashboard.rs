//! Main dashboard: session controls, quick commands, feed, reminders and
//! contacts

use super::fields::{card, form_field, labeled_button, primary_button};
use crate::feed::{FeedEntry, FeedKind};
use crate::orchestrator::AppCommand;
use crate::protocol::{AssistantCommand, QuickActionKind};
use crate::speech::FormField;
use crate::ui::state::{Confirm, UiState};
use crate::ui::theme::Theme;
use crate::view::{format_time_12h, DashboardView, ReminderList};
use egui::{self, RichText, Vec2};

pub struct Dashboard<'a> {
    view: &'a DashboardView,
    state: &'a mut UiState,
    theme: &'a Theme,
}

impl<'a> Dashboard<'a> {
    pub fn new(view: &'a DashboardView, state: &'a mut UiState, theme: &'a Theme) -> Self {
        Self { view, state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        self.show_header(ui);
        ui.add_space(self.theme.spacing);

        egui::ScrollArea::vertical()
            .id_salt("dashboard")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                self.show_commands(ui);
                ui.add_space(self.theme.spacing);

                ui.columns(2, |columns| {
                    self.show_summary(&mut columns[0]);
                    columns[0].add_space(self.theme.spacing);
                    self.show_reminders(&mut columns[0]);

                    self.show_feed(&mut columns[1]);
                });

                ui.add_space(self.theme.spacing);
                self.show_contacts(ui);
                // Room for the floating SOS button
                ui.add_space(96.0);
            });
    }

    fn show_header(&mut self, ui: &mut egui::Ui) {
        let view = self.view;
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.heading(&view.greeting);
                ui.horizontal(|ui| {
                    let color = self.theme.status_color(&view.status_label);
                    ui.label(RichText::new("●").color(color));
                    ui.label(RichText::new(&view.status_label).color(color))
                        .widget_info(|| {
                            egui::WidgetInfo::labeled(
                                egui::WidgetType::Label,
                                true,
                                format!("Assistant status: {}", view.status_label),
                            )
                        });
                    if view.listening {
                        ui.label(RichText::new("🎙 Listening").color(self.theme.listening));
                    }
                });
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if labeled_button(ui, true, "Switch Profile", "Switch profile").clicked() {
                    self.state.send(AppCommand::SwitchProfile);
                }
                if labeled_button(ui, true, "Edit Profile", "Edit profile").clicked() {
                    self.state.send(AppCommand::EditPersonalInfo);
                }

                let voice_text = if view.voice_input_enabled { "🎤 Voice: On" } else { "🎤 Voice: Off" };
                if labeled_button(ui, view.voice_available, voice_text, "Toggle voice input")
                    .clicked()
                {
                    self.state.send(AppCommand::ToggleVoiceInput);
                }

                let font_text = if view.large_font { "🔤 Large Font: On" } else { "🔤 Large Font: Off" };
                if labeled_button(ui, true, font_text, "Toggle large font").clicked() {
                    self.state.send(AppCommand::ToggleLargeFont);
                }

                if view.session.is_active() {
                    let stopping = !matches!(
                        view.session,
                        crate::session::AssistantSessionState::Starting
                            | crate::session::AssistantSessionState::Running
                    );
                    if labeled_button(ui, !stopping, "⏹ Stop Assistant", "Stop assistant")
                        .clicked()
                    {
                        self.state.send(AppCommand::StopAssistant);
                    }
                } else if primary_button(
                    ui,
                    self.theme,
                    view.connected,
                    "▶ Start Assistant",
                    "Start assistant",
                )
                .clicked()
                {
                    self.state.send(AppCommand::StartAssistant);
                }
            });
        });
    }

    fn show_commands(&mut self, ui: &mut egui::Ui) {
        card(self.theme).show(ui, |ui| {
            ui.label(RichText::new("Quick Commands").strong().size(18.0));
            ui.add_space(self.theme.spacing_sm);
            egui::Grid::new("quick_commands")
                .num_columns(3)
                .spacing([self.theme.spacing_sm, self.theme.spacing_sm])
                .show(ui, |ui| {
                    for (i, command) in AssistantCommand::ALL.iter().enumerate() {
                        let text = RichText::new(command.title()).size(16.0);
                        let button = egui::Button::new(text)
                            .min_size(Vec2::new(180.0, 56.0))
                            .rounding(self.theme.button_rounding);
                        let button = if *command == AssistantCommand::Emergency {
                            button.fill(self.theme.emergency)
                        } else {
                            button
                        };
                        let response = ui.add(button);
                        let label = command.title().to_string();
                        response.widget_info(|| {
                            egui::WidgetInfo::labeled(egui::WidgetType::Button, true, &label)
                        });
                        if response.clicked() {
                            self.state.send(AppCommand::SendCommand(*command));
                        }
                        if i % 3 == 2 {
                            ui.end_row();
                        }
                    }
                });
        });
    }

    fn show_summary(&mut self, ui: &mut egui::Ui) {
        let summary = &self.view.summary;
        card(self.theme).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new("Today").strong().size(18.0));
            ui.label(RichText::new(&summary.date_label).color(self.theme.text_muted));
            ui.add_space(self.theme.spacing_sm);
            ui.label(format!(
                "💊 {} reminder{} pending",
                summary.pending_reminders,
                if summary.pending_reminders == 1 { "" } else { "s" }
            ));
            ui.label(format!(
                "📝 {} note{}",
                summary.notes,
                if summary.notes == 1 { "" } else { "s" }
            ));
            if labeled_button(ui, true, "⟳ Refresh", "Refresh dashboard").clicked() {
                self.state.send(AppCommand::RefreshDashboard);
            }
        });
    }

    fn show_reminders(&mut self, ui: &mut egui::Ui) {
        let view = self.view;
        card(self.theme).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new("Medicine Reminders").strong().size(18.0));
            ui.add_space(self.theme.spacing_sm);

            match &view.reminders {
                ReminderList::Loading => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading reminders...");
                    });
                }
                ReminderList::Failed => {
                    ui.label(RichText::new("Could not load reminders").color(self.theme.error));
                }
                ReminderList::Loaded(reminders) if reminders.is_empty() => {
                    ui.label(RichText::new("No reminders set").color(self.theme.text_muted));
                }
                ReminderList::Loaded(reminders) => {
                    for reminder in reminders {
                        ui.horizontal(|ui| {
                            ui.label(
                                RichText::new(format_time_12h(&reminder.time))
                                    .monospace()
                                    .color(self.theme.primary),
                            );
                            ui.label(&reminder.medicine);
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    let label = format!(
                                        "Delete reminder {} at {}",
                                        reminder.medicine, reminder.time
                                    );
                                    if labeled_button(ui, true, "🗑", &label).clicked() {
                                        self.state.confirm = Some(Confirm::DeleteReminder {
                                            time: reminder.time.clone(),
                                            medicine: reminder.medicine.clone(),
                                        });
                                    }
                                },
                            );
                        });
                    }
                }
            }
        });
    }

    fn show_feed(&mut self, ui: &mut egui::Ui) {
        let view = self.view;
        card(self.theme).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new("Conversation").strong().size(18.0));
            ui.add_space(self.theme.spacing_sm);
            egui::ScrollArea::vertical()
                .id_salt("feed")
                .max_height(320.0)
                .stick_to_bottom(true)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if view.feed.is_empty() {
                        ui.label(
                            RichText::new("Start the assistant to begin a conversation.")
                                .color(self.theme.text_muted),
                        );
                    }
                    for entry in &view.feed {
                        self.show_feed_entry(ui, entry);
                    }
                });
        });
    }

    fn show_feed_entry(&self, ui: &mut egui::Ui, entry: &FeedEntry) {
        let (prefix, color, spoken) = match entry.kind {
            FeedKind::User => ("You: ", self.theme.primary, "You said"),
            FeedKind::Assistant => ("BraillAI: ", self.theme.success, "Assistant said"),
            FeedKind::System => ("", self.theme.text_secondary, "System"),
            FeedKind::Terminal => ("", self.theme.text_muted, "Output"),
        };
        let text = RichText::new(format!("{}{}", prefix, entry.text)).color(color);
        let text = if entry.kind == FeedKind::Terminal {
            text.monospace().small()
        } else {
            text
        };
        let label = format!("{}: {}", spoken, entry.text);
        ui.label(text)
            .widget_info(|| egui::WidgetInfo::labeled(egui::WidgetType::Label, true, &label));
    }

    fn show_contacts(&mut self, ui: &mut egui::Ui) {
        let view = self.view;
        card(self.theme).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new("Contacts").strong().size(18.0));
            ui.add_space(self.theme.spacing_sm);

            if view.contacts.is_empty() {
                ui.label(RichText::new("No contacts yet").color(self.theme.text_muted));
            }
            for contact in &view.contacts {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&contact.name).strong());
                    ui.label(RichText::new(&contact.number).color(self.theme.text_muted));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let name = &contact.name;
                        if labeled_button(ui, true, "🗑", &format!("Delete contact {}", name))
                            .clicked()
                        {
                            self.state.confirm =
                                Some(Confirm::DeleteContact { name: name.clone() });
                        }
                        if labeled_button(ui, true, "💬", &format!("Message {}", name)).clicked()
                        {
                            self.state.send(AppCommand::QuickAction {
                                action: QuickActionKind::Message,
                                contact: name.clone(),
                            });
                        }
                        if labeled_button(ui, true, "📞", &format!("Call {}", name)).clicked() {
                            self.state.send(AppCommand::QuickAction {
                                action: QuickActionKind::Call,
                                contact: name.clone(),
                            });
                        }
                    });
                });
            }

            ui.separator();
            form_field(ui, view, self.state, self.theme, FormField::ContactName, false);
            form_field(ui, view, self.state, self.theme, FormField::ContactNumber, false);
            if labeled_button(ui, true, "➕ Add Contact", "Add contact").clicked() {
                self.state.submit_contact();
            }
        });
    }
}

/// Floating emergency button, always reachable on the dashboard
pub struct SosButton<'a> {
    state: &'a mut UiState,
    theme: &'a Theme,
}

impl<'a> SosButton<'a> {
    pub fn new(state: &'a mut UiState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ctx: &egui::Context) {
        egui::Area::new(egui::Id::new("sos_button"))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-24.0, -24.0])
            .show(ctx, |ui| {
                let button = egui::Button::new(
                    RichText::new("🆘 SOS")
                        .size(22.0)
                        .strong()
                        .color(self.theme.text_primary),
                )
                .fill(self.theme.emergency)
                .rounding(egui::Rounding::same(40.0))
                .min_size(Vec2::splat(80.0));
                let response = ui.add(button);
                response.widget_info(|| {
                    egui::WidgetInfo::labeled(egui::WidgetType::Button, true, "Emergency SOS")
                });
                if response.clicked() {
                    self.state.send(AppCommand::TriggerSos);
                }
            });
    }
}
