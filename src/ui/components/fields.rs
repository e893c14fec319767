//! Labelled inputs and buttons shared by every screen
//!
//! Every interactive widget gets an explicit accessibility label so screen
//! readers and UI tests can find it by name.

use crate::orchestrator::AppCommand;
use crate::speech::FormField;
use crate::ui::state::UiState;
use crate::ui::theme::Theme;
use crate::view::DashboardView;
use egui::{self, Response, RichText, Vec2, WidgetInfo, WidgetText, WidgetType};

/// Button with an accessibility label distinct from its visible text
pub fn labeled_button(
    ui: &mut egui::Ui,
    enabled: bool,
    text: impl Into<WidgetText>,
    label: &str,
) -> Response {
    let response = ui.add_enabled(enabled, egui::Button::new(text).min_size(Vec2::new(44.0, 36.0)));
    let label = label.to_string();
    response.widget_info(|| WidgetInfo::labeled(WidgetType::Button, enabled, &label));
    response
}

/// Filled button for the main action of a screen
pub fn primary_button(
    ui: &mut egui::Ui,
    theme: &Theme,
    enabled: bool,
    text: &str,
    label: &str,
) -> Response {
    let button = egui::Button::new(RichText::new(text).strong().color(theme.text_primary))
        .fill(theme.primary)
        .rounding(theme.button_rounding)
        .min_size(Vec2::new(160.0, 44.0));
    let response = ui.add_enabled(enabled, button);
    let label = label.to_string();
    response.widget_info(|| WidgetInfo::labeled(WidgetType::Button, enabled, &label));
    response
}

/// Text input for `field`, with a microphone button when voice input is on
pub fn form_field(
    ui: &mut egui::Ui,
    view: &DashboardView,
    state: &mut UiState,
    theme: &Theme,
    field: FormField,
    secret: bool,
) {
    ui.label(RichText::new(field.label()).color(theme.text_secondary));
    ui.horizontal(|ui| {
        let width = if view.voice_input_enabled {
            ui.available_width() - 56.0
        } else {
            ui.available_width()
        };
        let value = state.field_mut(field);
        let edit = if field.is_multiline() {
            egui::TextEdit::multiline(value).desired_rows(3)
        } else {
            egui::TextEdit::singleline(value).password(secret)
        };
        let response = ui.add(edit.desired_width(width).id(egui::Id::new(("field", field))));
        response.widget_info(|| WidgetInfo::labeled(WidgetType::TextEdit, true, field.label()));

        if view.voice_input_enabled {
            mic_button(ui, view, state, theme, field);
        }
    });
    ui.add_space(theme.spacing_sm);
}

fn mic_button(
    ui: &mut egui::Ui,
    view: &DashboardView,
    state: &mut UiState,
    theme: &Theme,
    field: FormField,
) {
    let capturing = view.capturing == Some(field);
    let (icon, color, label) = if capturing {
        ("⏹", theme.listening, format!("Stop voice input for {}", field.label()))
    } else {
        ("🎤", theme.text_secondary, format!("Voice input for {}", field.label()))
    };

    let response = labeled_button(ui, true, RichText::new(icon).size(18.0).color(color), &label);
    if response.clicked() {
        state.send(if capturing {
            AppCommand::StopCapture
        } else {
            AppCommand::StartCapture(field)
        });
    }
}

/// Rounded card frame used for dashboard panels
pub fn card(theme: &Theme) -> egui::Frame {
    egui::Frame::none()
        .fill(theme.bg_secondary)
        .rounding(theme.card_rounding)
        .inner_margin(theme.spacing)
}
