//! Colors, spacing and text sizes for the dashboard
//!
//! The palette is high-contrast; large-font mode scales the whole UI through
//! the egui zoom factor instead of per-widget sizes.

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Vec2, Visuals};

/// Zoom applied when large font is on
pub const LARGE_FONT_ZOOM: f32 = 1.35;

#[derive(Clone, Debug)]
pub struct Theme {
    pub primary: Color32,
    pub success: Color32,
    pub warning: Color32,
    pub error: Color32,
    /// SOS button and alert window
    pub emergency: Color32,

    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,

    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    /// Listening indicator
    pub listening: Color32,

    pub button_rounding: Rounding,
    pub card_rounding: Rounding,

    pub spacing: f32,
    pub spacing_lg: f32,
    pub spacing_sm: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            primary: Color32::from_rgb(59, 130, 246),
            success: Color32::from_rgb(34, 197, 94),
            warning: Color32::from_rgb(250, 204, 21),
            error: Color32::from_rgb(248, 113, 113),
            emergency: Color32::from_rgb(220, 38, 38),

            bg_primary: Color32::from_rgb(10, 10, 15),
            bg_secondary: Color32::from_rgb(24, 24, 32),
            bg_tertiary: Color32::from_rgb(45, 45, 58),

            text_primary: Color32::WHITE,
            text_secondary: Color32::from_rgb(226, 232, 240),
            text_muted: Color32::from_rgb(161, 161, 170),

            listening: Color32::from_rgb(34, 211, 238),

            button_rounding: Rounding::same(10.0),
            card_rounding: Rounding::same(14.0),

            spacing: 16.0,
            spacing_lg: 28.0,
            spacing_sm: 8.0,
        }
    }

    /// Install visuals and text styles
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::dark();

        visuals.panel_fill = self.bg_primary;
        visuals.window_fill = self.bg_secondary;
        visuals.extreme_bg_color = self.bg_tertiary;

        visuals.widgets.noninteractive.bg_fill = self.bg_secondary;
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_secondary);

        visuals.widgets.inactive.bg_fill = self.bg_tertiary;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.widgets.hovered.bg_fill = self.primary.gamma_multiply(0.8);
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.5, self.text_primary);

        visuals.widgets.active.bg_fill = self.primary;
        visuals.widgets.active.fg_stroke = Stroke::new(1.5, self.text_primary);

        // Thick focus ring for keyboard navigation
        visuals.selection.bg_fill = self.primary.gamma_multiply(0.4);
        visuals.selection.stroke = Stroke::new(2.0, self.warning);

        visuals.hyperlink_color = self.primary;
        visuals.window_rounding = self.card_rounding;
        visuals.window_stroke = Stroke::new(1.0, self.bg_tertiary);

        ctx.set_visuals(visuals);

        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = Vec2::splat(self.spacing_sm);
        style.spacing.window_margin = egui::Margin::same(self.spacing);
        style.spacing.button_padding = Vec2::new(self.spacing, self.spacing_sm);

        style.text_styles.insert(
            egui::TextStyle::Heading,
            FontId::new(26.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Body,
            FontId::new(16.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Monospace,
            FontId::new(14.0, FontFamily::Monospace),
        );
        style.text_styles.insert(
            egui::TextStyle::Button,
            FontId::new(16.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Small,
            FontId::new(13.0, FontFamily::Proportional),
        );

        ctx.set_style(style);
    }

    /// Switch the zoom factor for large-font mode
    pub fn apply_font_scale(&self, ctx: &egui::Context, large_font: bool) {
        let zoom = if large_font { LARGE_FONT_ZOOM } else { 1.0 };
        if (ctx.zoom_factor() - zoom).abs() > f32::EPSILON {
            ctx.set_zoom_factor(zoom);
        }
    }

    pub fn notice_color(&self, level: crate::feed::NoticeLevel) -> Color32 {
        use crate::feed::NoticeLevel;
        match level {
            NoticeLevel::Info => self.primary,
            NoticeLevel::Success => self.success,
            NoticeLevel::Error => self.error,
        }
    }

    pub fn status_color(&self, label: &str) -> Color32 {
        match label {
            "Running" => self.success,
            "Starting..." | "Stopping..." => self.warning,
            "Disconnected" => self.error,
            _ => self.text_muted,
        }
    }
}
