//! Screen and overlay widgets
//!
//! Widgets read the [`DashboardView`](crate::view::DashboardView) and queue
//! commands on the [`UiState`](crate::ui::UiState); none of them talks to the
//! orchestrator directly.

mod dashboard;
mod fields;
mod forms;
mod overlays;
mod profiles;
mod welcome;

pub use dashboard::{Dashboard, SosButton};
pub use fields::{card, form_field, labeled_button, primary_button};
pub use forms::{PersonalInfoForm, SetupForm};
pub use overlays::{AlertWindow, ConfirmDialog, ContactPicker, Toasts};
pub use profiles::ProfileSelector;
pub use welcome::WelcomeScreen;
