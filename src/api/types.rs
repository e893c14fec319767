//! JSON bodies of the dashboard HTTP API

use crate::profile::PersonalInfo;
use serde::{Deserialize, Serialize};

/// A medicine reminder owned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// `HH:MM`, 24-hour
    pub time: String,
    pub medicine: String,
    /// Date string of the last day the reminder fired, empty when never
    #[serde(default, alias = "lastTriggered")]
    pub last_triggered: Option<String>,
}

impl Reminder {
    pub fn new(time: impl Into<String>, medicine: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            medicine: medicine.into(),
            last_triggered: None,
        }
    }

    /// Exact `(time, medicine)` identity used for deletion
    pub fn matches(&self, time: &str, medicine: &str) -> bool {
        self.time == time && self.medicine == medicine
    }

    /// Whether the reminder already fired on `date` (same format the backend writes)
    pub fn triggered_on(&self, date: &str) -> bool {
        self.last_triggered.as_deref() == Some(date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(default)]
    pub time: String,
    pub text: String,
}

/// Body of `POST /api/save-profile`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProfileRequest {
    pub name: String,
    pub dob: String,
    pub blood: String,
    pub address: String,
    pub emergency_name: String,
    pub emergency_number: String,
}

impl From<&PersonalInfo> for SaveProfileRequest {
    fn from(info: &PersonalInfo) -> Self {
        Self {
            name: info.name.clone(),
            dob: info.date_of_birth.clone(),
            blood: info.blood_type.clone(),
            address: info.address.clone(),
            emergency_name: info.emergency_contact_name.clone(),
            emergency_number: info.emergency_contact_number.clone(),
        }
    }
}

/// Body of `POST /api/delete-reminder`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteReminderRequest {
    pub time: String,
    pub medicine: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RemindersResponse {
    pub reminders: Vec<Reminder>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NotesResponse {
    pub notes: Vec<Note>,
}
