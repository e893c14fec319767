//! UI-local state
//!
//! Form drafts and pending confirmations live here, not in the session. The
//! drafts are reloaded from the published view whenever a new screen entry
//! is observed. Widgets queue [`AppCommand`]s in the outbox; the app drains
//! it into the orchestrator once per frame.

use crate::orchestrator::{AppCommand, AppEvent};
use crate::profile::{Config, PersonalInfo};
use crate::speech::{apply_transcript, FormField};
use crate::view::DashboardView;

/// Destructive action waiting for a yes/no
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirm {
    DeleteProfile { id: String, name: String },
    DeleteReminder { time: String, medicine: String },
    DeleteContact { name: String },
}

impl Confirm {
    pub fn question(&self) -> String {
        match self {
            Confirm::DeleteProfile { name, .. } => {
                format!("Delete profile \"{}\"? This cannot be undone.", name)
            }
            Confirm::DeleteReminder { time, medicine } => {
                format!("Delete the {} reminder at {}?", medicine, time)
            }
            Confirm::DeleteContact { name } => format!("Delete contact \"{}\"?", name),
        }
    }

    fn into_command(self) -> AppCommand {
        match self {
            Confirm::DeleteProfile { id, .. } => AppCommand::DeleteProfile { id },
            Confirm::DeleteReminder { time, medicine } => {
                AppCommand::DeleteReminder { time, medicine }
            }
            Confirm::DeleteContact { name } => AppCommand::DeleteContact { name },
        }
    }
}

#[derive(Debug, Default)]
pub struct UiState {
    pub config_draft: Config,
    pub info_draft: PersonalInfo,
    pub contact_name: String,
    pub contact_number: String,
    pub confirm: Option<Confirm>,
    seen_entry: Option<u64>,
    outbox: Vec<AppCommand>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reload drafts after a screen entry
    pub fn sync(&mut self, view: &DashboardView) {
        if self.seen_entry == Some(view.screen_entry) {
            return;
        }
        self.seen_entry = Some(view.screen_entry);
        self.config_draft = view.config.clone();
        self.info_draft = view.personal_info.clone();
        self.confirm = None;
    }

    pub fn send(&mut self, command: AppCommand) {
        self.outbox.push(command);
    }

    pub fn take_commands(&mut self) -> Vec<AppCommand> {
        std::mem::take(&mut self.outbox)
    }

    /// Queued commands, oldest first
    pub fn pending(&self) -> &[AppCommand] {
        &self.outbox
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::GeminiKey => &mut self.config_draft.gemini_key,
            FormField::DeviceRunnerKey => &mut self.config_draft.device_runner_key,
            FormField::DeviceId => &mut self.config_draft.device_id,
            FormField::Name => &mut self.info_draft.name,
            FormField::DateOfBirth => &mut self.info_draft.date_of_birth,
            FormField::BloodType => &mut self.info_draft.blood_type,
            FormField::Address => &mut self.info_draft.address,
            FormField::EmergencyContactName => &mut self.info_draft.emergency_contact_name,
            FormField::EmergencyContactNumber => &mut self.info_draft.emergency_contact_number,
            FormField::ContactName => &mut self.contact_name,
            FormField::ContactNumber => &mut self.contact_number,
        }
    }

    pub fn handle_event(&mut self, event: &AppEvent) {
        if let AppEvent::Transcript { field, text } = event {
            apply_transcript(*field, self.field_mut(*field), text);
        }
    }

    /// Queue the contact form and clear it
    pub fn submit_contact(&mut self) {
        let name = std::mem::take(&mut self.contact_name);
        let number = std::mem::take(&mut self.contact_number);
        self.send(AppCommand::AddContact { name, number });
    }

    pub fn accept_confirm(&mut self) {
        if let Some(confirm) = self.confirm.take() {
            self.send(confirm.into_command());
        }
    }

    pub fn cancel_confirm(&mut self) {
        self.confirm = None;
    }
}
