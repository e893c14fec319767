//! Main application struct and eframe integration

use crate::orchestrator::{AppCommand, AppEvent, OrchestratorHandle};
use crate::screen::Screen;
use crate::ui::components::{
    AlertWindow, ConfirmDialog, ContactPicker, Dashboard, PersonalInfoForm, ProfileSelector,
    SetupForm, SosButton, Toasts, WelcomeScreen,
};
use crate::ui::state::UiState;
use crate::ui::theme::Theme;
use crate::view::DashboardView;
use egui::{self, CentralPanel};
use tracing::{info, warn};

/// Draw one frame of `view`
///
/// Kept free of the orchestrator so it can be driven by UI tests.
pub fn render(ctx: &egui::Context, view: &DashboardView, state: &mut UiState, theme: &Theme) {
    CentralPanel::default()
        .frame(
            egui::Frame::none()
                .fill(theme.bg_primary)
                .inner_margin(theme.spacing_lg),
        )
        .show(ctx, |ui| match view.screen {
            Screen::Welcome => WelcomeScreen::new(state, theme).show(ui),
            Screen::ProfileSelector => ProfileSelector::new(view, state, theme).show(ui),
            Screen::Setup => SetupForm::new(view, state, theme).show(ui),
            Screen::Profile => PersonalInfoForm::new(view, state, theme).show(ui),
            Screen::Dashboard => Dashboard::new(view, state, theme).show(ui),
        });

    if view.screen == Screen::Dashboard {
        SosButton::new(state, theme).show(ctx);
    }
    ContactPicker::new(view, state, theme).show(ctx);
    ConfirmDialog::new(state, theme).show(ctx);
    AlertWindow::new(view, state, theme).show(ctx);
    Toasts::new(view, state, theme).show(ctx);
}

pub struct BraillApp {
    handle: OrchestratorHandle,
    state: UiState,
    theme: Theme,
}

impl BraillApp {
    pub fn new(cc: &eframe::CreationContext<'_>, handle: OrchestratorHandle) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        // Wake the UI whenever the orchestrator publishes
        let ctx = cc.egui_ctx.clone();
        handle.set_repaint_callback(move || ctx.request_repaint());

        Self {
            handle,
            state: UiState::new(),
            theme,
        }
    }

    fn poll_events(&mut self, ctx: &egui::Context) {
        while let Some(event) = self.handle.try_recv_event() {
            match event {
                AppEvent::Shutdown => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
                other => self.state.handle_event(&other),
            }
        }
    }

    fn flush_commands(&mut self) {
        for command in self.state.take_commands() {
            if let Err(e) = self.handle.send_command(command) {
                warn!("[UI] {}", e);
            }
        }
    }
}

impl eframe::App for BraillApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_events(ctx);

        let view = self.handle.view();
        self.state.sync(&view);
        self.theme.apply_font_scale(ctx, view.large_font);

        render(ctx, &view, &mut self.state, &self.theme);
        self.flush_commands();
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("[UI] Shutting down");
        let _ = self.handle.send_command(AppCommand::Shutdown);
    }
}
