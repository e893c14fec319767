//! Screen state machine
//!
//! Exactly one screen is visible at a time. Every successful navigation is
//! an "entry" and carries the screen's fixed spoken announcement; re-renders
//! never produce entries.

use crate::profile::{Config, PersonalInfo};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Pause between entering a screen and announcing it
pub const ANNOUNCE_DELAY: Duration = Duration::from_millis(600);

/// Pause after a successful personal-info save before the dashboard opens
pub const PROFILE_SAVED_DELAY: Duration = Duration::from_millis(800);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    Welcome,
    ProfileSelector,
    Setup,
    /// Personal-info form
    Profile,
    Dashboard,
}

impl Screen {
    /// Fixed text spoken when the screen is entered
    pub fn announcement(&self) -> &'static str {
        match self {
            Screen::Welcome => {
                "Welcome to BraillAI. Your voice-powered assistant for independence. Press Get Started to begin."
            }
            Screen::ProfileSelector => "Select your profile or create a new one.",
            Screen::Setup => {
                "Let's get you set up. We need your API keys to connect BraillAI to your phone."
            }
            Screen::Profile => {
                "Please enter your personal information and emergency contact details."
            }
            Screen::Dashboard => {
                "Welcome to your dashboard. You can now use voice commands, set reminders, or call your contacts."
            }
        }
    }

    /// Screens reachable without an active profile
    pub fn requires_active_profile(&self) -> bool {
        matches!(self, Screen::Profile | Screen::Dashboard)
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Screen::Welcome => write!(f, "Welcome"),
            Screen::ProfileSelector => write!(f, "ProfileSelector"),
            Screen::Setup => write!(f, "Setup"),
            Screen::Profile => write!(f, "Profile"),
            Screen::Dashboard => write!(f, "Dashboard"),
        }
    }
}

/// Where a freshly selected profile lands
///
/// Config completeness is checked before personal-info completeness.
pub fn route_for(config: &Config, personal_info: &PersonalInfo) -> Screen {
    if !config.has_required_keys() {
        Screen::Setup
    } else if !personal_info.is_complete() {
        Screen::Profile
    } else {
        Screen::Dashboard
    }
}

/// User intents that move between screens
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation<'a> {
    GetStarted,
    ProfileSelected {
        config: &'a Config,
        personal_info: &'a PersonalInfo,
    },
    ProfileCreated,
    ConfigSaved,
    PersonalInfoSaved,
    /// Jump to the personal-info form (e.g. emergency with incomplete info)
    EditPersonalInfo,
    SwitchProfile,
    Back,
}

/// A completed navigation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry {
    pub from: Screen,
    pub to: Screen,
    /// Monotonic entry counter, one per navigation
    pub seq: u64,
}

impl Entry {
    pub fn announcement(&self) -> &'static str {
        self.to.announcement()
    }
}

#[derive(Debug, Default)]
pub struct ScreenStateMachine {
    current: Screen,
    entries: u64,
}

impl ScreenStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Screen {
        self.current
    }

    /// Number of entries so far
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Apply a navigation intent
    ///
    /// Returns `None` when the intent is not valid from the current screen.
    pub fn navigate(&mut self, nav: Navigation<'_>, has_active_profile: bool) -> Option<Entry> {
        let target = match (&nav, self.current) {
            (Navigation::GetStarted, Screen::Welcome) => Screen::ProfileSelector,
            (
                Navigation::ProfileSelected {
                    config,
                    personal_info,
                },
                _,
            ) => route_for(config, personal_info),
            (Navigation::ProfileCreated, _) => Screen::Setup,
            (Navigation::ConfigSaved, Screen::Setup) => Screen::Profile,
            (Navigation::PersonalInfoSaved, Screen::Profile) => Screen::Dashboard,
            (Navigation::EditPersonalInfo, _) => Screen::Profile,
            (Navigation::SwitchProfile, _) => Screen::ProfileSelector,
            (Navigation::Back, _) => Screen::Welcome,
            (nav, current) => {
                warn!("[SCREEN] Ignoring {:?} on {}", nav, current);
                return None;
            }
        };

        let target = if target.requires_active_profile() && !has_active_profile {
            debug!("[SCREEN] {} needs an active profile, routing to selector", target);
            Screen::ProfileSelector
        } else {
            target
        };

        Some(self.enter(target))
    }

    /// Land on the profile selector after the active profile disappeared
    pub fn on_active_profile_removed(&mut self) -> Option<Entry> {
        if self.current.requires_active_profile() {
            Some(self.enter(Screen::ProfileSelector))
        } else {
            None
        }
    }

    fn enter(&mut self, to: Screen) -> Entry {
        let from = self.current;
        self.current = to;
        self.entries += 1;
        debug!("[SCREEN] {} -> {} (entry {})", from, to, self.entries);
        Entry {
            from,
            to,
            seq: self.entries,
        }
    }
}
