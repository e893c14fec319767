//! Read-only snapshot the UI renders from
//!
//! The orchestrator rebuilds this after every processed message; the UI never
//! sees the session itself. Formatting helpers are pure so they can be tested
//! with fixed clocks.

use crate::api::{Note, Reminder};
use crate::contacts::Contact;
use crate::emergency::AlertPayload;
use crate::feed::{FeedEntry, Notice};
use crate::profile::{Config, PersonalInfo, Profile};
use crate::protocol::QuickActionKind;
use crate::screen::Screen;
use crate::session::AssistantSessionState;
use crate::speech::FormField;
use chrono::{NaiveDate, Timelike};

/// Greeting shown at the top of the dashboard
pub fn greeting(hour: u32, info: &PersonalInfo) -> String {
    match info.first_name() {
        Some(first) => {
            let salutation = if hour < 12 {
                "Good Morning"
            } else if hour < 17 {
                "Good Afternoon"
            } else {
                "Good Evening"
            };
            format!("{}, {}", salutation, first)
        }
        None => "Hello, User".to_string(),
    }
}

/// `"HH:MM"` to `"h:MM AM"`; unparseable input is returned unchanged
pub fn format_time_12h(time: &str) -> String {
    let Some((hour, minute)) = time.split_once(':') else {
        return time.to_string();
    };
    let Ok(hour) = hour.trim().parse::<u32>() else {
        return time.to_string();
    };
    let display_hour = match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    let meridiem = if hour >= 12 { "PM" } else { "AM" };
    format!("{}:{} {}", display_hour, minute.trim(), meridiem)
}

/// Date string the backend writes into `last_triggered`, e.g. `Fri Oct 16 2026`
pub fn trigger_date_key(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// Summary card date, e.g. `Friday, Oct 16`
pub fn summary_date_label(date: NaiveDate) -> String {
    date.format("%A, %b %-d").to_string()
}

/// Reminders that have not fired yet today
pub fn pending_today(reminders: &[Reminder], today: NaiveDate) -> usize {
    let key = trigger_date_key(today);
    reminders.iter().filter(|r| !r.triggered_on(&key)).count()
}

/// Connection plus session badge text
///
/// An idle session reads "Connected" until the assistant has run once on
/// this connection, then "Stopped".
pub fn status_label(connected: bool, session: AssistantSessionState, has_run: bool) -> &'static str {
    match (connected, session) {
        (false, _) => "Disconnected",
        (true, AssistantSessionState::Idle) if !has_run => "Connected",
        (true, state) => state.label(),
    }
}

/// Dashboard summary card
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub date_label: String,
    pub pending_reminders: usize,
    pub notes: usize,
}

impl Summary {
    /// Failed reads count as zero
    pub fn build(
        today: NaiveDate,
        reminders: Option<&[Reminder]>,
        notes: Option<&[Note]>,
    ) -> Self {
        Self {
            date_label: summary_date_label(today),
            pending_reminders: reminders.map_or(0, |r| pending_today(r, today)),
            notes: notes.map_or(0, |n| n.len()),
        }
    }
}

/// Reminder list state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReminderList {
    #[default]
    Loading,
    Loaded(Vec<Reminder>),
    Failed,
}

/// Everything a frame needs
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub screen: Screen,
    /// Bumped on every screen entry; the UI reloads its form drafts on change
    pub screen_entry: u64,

    pub profiles: Vec<Profile>,
    pub active_profile_id: Option<String>,
    pub config: Config,
    pub personal_info: PersonalInfo,
    pub contacts: Vec<Contact>,

    pub connected: bool,
    pub session: AssistantSessionState,
    pub listening: bool,
    pub status_label: String,

    pub feed: Vec<FeedEntry>,
    pub notices: Vec<Notice>,
    pub alert: Option<AlertPayload>,
    pub picker: Option<QuickActionKind>,

    pub greeting: String,
    pub summary: Summary,
    pub reminders: ReminderList,

    pub large_font: bool,
    pub voice_input_enabled: bool,
    pub voice_available: bool,
    pub capturing: Option<FormField>,
    /// A save request is in flight
    pub saving: bool,
}

impl DashboardView {
    pub fn active_profile(&self) -> Option<&Profile> {
        let id = self.active_profile_id.as_deref()?;
        self.profiles.iter().find(|p| p.id == id)
    }
}

/// Local hour used for the greeting
pub fn local_hour() -> u32 {
    chrono::Local::now().hour()
}

pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
