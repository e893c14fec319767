//! Assistant session lifecycle
//!
//! `Idle -> Starting -> Running -> Stopping -> Idle`. Start and stop are
//! optimistic: the state moves before the backend confirms.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Delay after which an unconfirmed stop resolves to `Idle`
pub const STOP_RESOLVE_DELAY: Duration = Duration::from_secs(2);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssistantSessionState {
    #[default]
    Idle,
    Starting,
    Running,
    Stopping,
}

impl AssistantSessionState {
    /// True while the assistant is up or coming up
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Starting | Self::Running)
    }

    /// Status badge text
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Stopped",
            Self::Starting => "Starting...",
            Self::Running => "Running",
            Self::Stopping => "Stopping...",
        }
    }
}

impl std::fmt::Display for AssistantSessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Owner of the session state; only the orchestrator holds one
#[derive(Debug, Default)]
pub struct SessionLifecycle {
    state: AssistantSessionState,
}

impl SessionLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AssistantSessionState {
        self.state
    }

    /// User asked to start; only valid from `Idle`
    pub fn request_start(&mut self) -> bool {
        if self.state != AssistantSessionState::Idle {
            debug!("[SESSION] Start rejected in {:?}", self.state);
            return false;
        }
        self.set(AssistantSessionState::Starting);
        true
    }

    /// Backend confirmed the start
    pub fn confirm_started(&mut self) -> bool {
        match self.state {
            AssistantSessionState::Starting | AssistantSessionState::Running => {
                self.set(AssistantSessionState::Running);
                true
            }
            other => {
                warn!("[SESSION] Ignoring assistant_started in {:?}", other);
                false
            }
        }
    }

    /// User asked to stop; returns true when a resolve timer is needed
    pub fn request_stop(&mut self) -> bool {
        if self.state.is_active() {
            self.set(AssistantSessionState::Stopping);
            true
        } else {
            false
        }
    }

    /// Backend confirmed the stop, the stop timer fired, or the link dropped
    pub fn reset(&mut self) {
        self.set(AssistantSessionState::Idle);
    }

    /// A backend error aborts a pending start
    pub fn on_error(&mut self) {
        if self.state == AssistantSessionState::Starting {
            self.set(AssistantSessionState::Idle);
        }
    }

    fn set(&mut self, next: AssistantSessionState) {
        if self.state != next {
            debug!("[SESSION] {:?} -> {:?}", self.state, next);
        }
        self.state = next;
    }
}
