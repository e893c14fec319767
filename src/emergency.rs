//! Emergency alert mediation
//!
//! An alert is shown when the backend pushes `show_emergency_alert` or the
//! classifier spots an emergency phrase. Only one alert is ever visible; a
//! new trigger replaces the payload and restarts the auto-dismiss timer.

use crate::profile::PersonalInfo;
use crate::timers::{TimerId, TimerQueue};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// How long an alert stays up without user action
pub const ALERT_AUTO_DISMISS: Duration = Duration::from_secs(30);

/// Pause before an emergency with missing info opens the profile form
pub const EMERGENCY_REDIRECT_DELAY: Duration = Duration::from_secs(1);

/// Shown in place of any missing field
pub const FIELD_PLACEHOLDER: &str = "—";

/// Details shown on the emergency alert
///
/// Accepts both the camelCase and snake_case spellings the backend uses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertPayload {
    pub name: String,
    pub blood: String,
    pub address: String,
    #[serde(alias = "emergency_name")]
    pub emergency_name: String,
    #[serde(alias = "emergency_number")]
    pub emergency_number: String,
}

fn or_placeholder(value: &str) -> &str {
    if value.trim().is_empty() {
        FIELD_PLACEHOLDER
    } else {
        value
    }
}

impl AlertPayload {
    pub fn from_personal_info(info: &PersonalInfo) -> Self {
        Self {
            name: info.name.clone(),
            blood: info.blood_type.clone(),
            address: info.address.clone(),
            emergency_name: info.emergency_contact_name.clone(),
            emergency_number: info.emergency_contact_number.clone(),
        }
    }

    pub fn display_name(&self) -> &str {
        or_placeholder(&self.name)
    }

    pub fn display_blood(&self) -> &str {
        or_placeholder(&self.blood)
    }

    pub fn display_address(&self) -> &str {
        or_placeholder(&self.address)
    }

    /// `"Name (number)"`
    pub fn display_contact(&self) -> String {
        format!(
            "{} ({})",
            or_placeholder(&self.emergency_name),
            or_placeholder(&self.emergency_number)
        )
    }
}

/// Visibility and auto-dismiss bookkeeping for the single alert
#[derive(Debug, Default)]
pub struct EmergencyAlertMediator {
    visible: bool,
    payload: AlertPayload,
    timer: Option<TimerId>,
}

impl EmergencyAlertMediator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn payload(&self) -> Option<&AlertPayload> {
        self.visible.then_some(&self.payload)
    }

    /// Timer currently guarding the alert, if any
    pub fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    /// Show `payload` and restart the auto-dismiss countdown
    pub fn trigger<T>(
        &mut self,
        payload: AlertPayload,
        now: Instant,
        timers: &mut TimerQueue<T>,
        on_expiry: T,
    ) -> TimerId {
        if let Some(previous) = self.timer.take() {
            timers.cancel(previous);
            debug!("[EMERGENCY] Replacing visible alert");
        }
        self.visible = true;
        self.payload = payload;
        let id = timers.schedule(now, ALERT_AUTO_DISMISS, on_expiry);
        self.timer = Some(id);
        info!("[EMERGENCY] Alert shown for {}", self.payload.display_name());
        id
    }

    /// Hide the alert and cancel its timer
    pub fn dismiss<T>(&mut self, timers: &mut TimerQueue<T>) {
        if let Some(id) = self.timer.take() {
            timers.cancel(id);
        }
        if self.visible {
            info!("[EMERGENCY] Alert dismissed");
        }
        self.visible = false;
    }

    /// Auto-dismiss fired; stale timers are ignored
    pub fn on_timer(&mut self, id: TimerId) -> bool {
        if self.timer != Some(id) {
            return false;
        }
        self.timer = None;
        self.visible = false;
        info!("[EMERGENCY] Alert auto-dismissed");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str) -> AlertPayload {
        AlertPayload {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn fire(
        mediator: &mut EmergencyAlertMediator,
        timers: &mut TimerQueue<()>,
        at: Instant,
    ) {
        for (id, ()) in timers.pop_due(at) {
            mediator.on_timer(id);
        }
    }

    #[test]
    fn test_last_trigger_wins() {
        let start = Instant::now();
        let mut timers = TimerQueue::new();
        let mut mediator = EmergencyAlertMediator::new();

        mediator.trigger(payload("first"), start, &mut timers, ());
        let second_at = start + Duration::from_secs(10);
        mediator.trigger(payload("second"), second_at, &mut timers, ());
        assert_eq!(timers.len(), 1);

        // The first deadline has passed but the alert is still up
        fire(&mut mediator, &mut timers, start + Duration::from_secs(31));
        assert!(mediator.is_visible());
        assert_eq!(mediator.payload().unwrap().name, "second");

        fire(&mut mediator, &mut timers, second_at + ALERT_AUTO_DISMISS);
        assert!(!mediator.is_visible());
        assert!(mediator.payload().is_none());
    }

    #[test]
    fn test_dismiss_cancels_timer() {
        let now = Instant::now();
        let mut timers = TimerQueue::new();
        let mut mediator = EmergencyAlertMediator::new();

        let id = mediator.trigger(payload("x"), now, &mut timers, ());
        mediator.dismiss(&mut timers);
        assert!(!mediator.is_visible());
        assert!(!timers.is_pending(id));
        assert!(!mediator.on_timer(id));
    }

    #[test]
    fn test_placeholders() {
        let alert = AlertPayload {
            name: "Ravi".to_string(),
            emergency_number: "112".to_string(),
            ..Default::default()
        };
        assert_eq!(alert.display_name(), "Ravi");
        assert_eq!(alert.display_blood(), "—");
        assert_eq!(alert.display_address(), "—");
        assert_eq!(alert.display_contact(), "— (112)");
    }

    #[test]
    fn test_payload_accepts_snake_case() {
        let alert: AlertPayload = serde_json::from_str(
            r#"{"name":"A","blood":"B+","emergency_name":"Dad","emergency_number":"99"}"#,
        )
        .unwrap();
        assert_eq!(alert.emergency_name, "Dad");
        assert_eq!(alert.emergency_number, "99");
        assert_eq!(alert.address, "");
    }

    #[test]
    fn test_from_personal_info() {
        let info = PersonalInfo {
            name: "Lena".to_string(),
            blood_type: "A-".to_string(),
            emergency_contact_name: "Sam".to_string(),
            ..Default::default()
        };
        let alert = AlertPayload::from_personal_info(&info);
        assert_eq!(alert.blood, "A-");
        assert_eq!(alert.display_contact(), "Sam (—)");
    }
}
