//! egui/eframe front-end
//!
//! Renders the orchestrator's published view and turns clicks into commands.

mod app;
pub mod components;
mod state;
mod theme;

pub use app::{render, BraillApp};
pub use state::{Confirm, UiState};
pub use theme::{Theme, LARGE_FONT_ZOOM};
