//! Messages between the UI and the orchestrator

use crate::profile::{Config, PersonalInfo};
use crate::protocol::{AssistantCommand, QuickActionKind};
use crate::speech::FormField;
use uuid::Uuid;

/// User intents sent from the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    // Navigation and profiles
    GetStarted,
    Back,
    SwitchProfile,
    CreateProfile,
    SelectProfile { id: String },
    /// Confirmation has already been given by the user
    DeleteProfile { id: String },
    EditPersonalInfo,
    SaveConfig(Config),
    SavePersonalInfo(PersonalInfo),

    // Assistant session
    StartAssistant,
    StopAssistant,
    SendCommand(AssistantCommand),
    /// Floating SOS button
    TriggerSos,
    /// Contact chosen in the call/message picker
    PickContact { name: String },
    CancelPicker,
    /// Direct call/message from the contact list
    QuickAction {
        action: QuickActionKind,
        contact: String,
    },
    DismissAlert,

    // Contacts
    AddContact { name: String, number: String },
    DeleteContact { name: String },

    // Dashboard
    RefreshDashboard,
    DeleteReminder { time: String, medicine: String },
    ToggleLargeFont,
    ToggleVoiceInput,
    StartCapture(FormField),
    StopCapture,
    DismissNotice(Uuid),

    Shutdown,
}

/// A command tagged with the order in which the UI issued it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamped {
    pub seq: u64,
    pub command: AppCommand,
}

/// Events pushed to the UI besides the shared view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Dictated text for a form field owned by the UI
    Transcript { field: FormField, text: String },
    Shutdown,
}
