//! Dashboard API port and its HTTP and in-memory implementations

use super::types::{
    DeleteReminderRequest, Note, NotesResponse, Reminder, RemindersResponse, SaveProfileRequest,
    SuccessResponse,
};
use crate::profile::Config;
use crate::{BraillError, Result};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Backend endpoints the dashboard talks to
///
/// `Ok(false)` means the server answered but refused; `Err` means it could
/// not be reached or answered garbage.
pub trait DashboardApi: Send + Sync {
    fn get_reminders(&self) -> Result<Vec<Reminder>>;
    fn get_notes(&self) -> Result<Vec<Note>>;
    fn save_config(&self, config: &Config) -> Result<bool>;
    fn save_profile(&self, profile: &SaveProfileRequest) -> Result<bool>;
    fn delete_reminder(&self, time: &str, medicine: &str) -> Result<bool>;
}

pub struct HttpApi {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            agent,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!("[API] GET {}", path);
        let body = match self.agent.get(&self.url(path)).call() {
            Ok(resp) => resp
                .into_string()
                .map_err(|e| BraillError::Network(e.to_string()))?,
            Err(ureq::Error::Status(code, _)) => {
                return Err(BraillError::Network(format!("{} returned {}", path, code)))
            }
            Err(ureq::Error::Transport(e)) => return Err(BraillError::Network(e.to_string())),
        };
        serde_json::from_str(&body).map_err(|e| BraillError::Network(e.to_string()))
    }

    fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<bool> {
        debug!("[API] POST {}", path);
        let payload = serde_json::to_string(body)?;
        let text = match self
            .agent
            .post(&self.url(path))
            .set("Content-Type", "application/json")
            .send_string(&payload)
        {
            Ok(resp) => resp
                .into_string()
                .map_err(|e| BraillError::Network(e.to_string()))?,
            // Error responses still carry `{success: false, error}`
            Err(ureq::Error::Status(code, resp)) => {
                let text = resp.into_string().unwrap_or_default();
                warn!("[API] {} returned {}: {}", path, code, text);
                text
            }
            Err(ureq::Error::Transport(e)) => return Err(BraillError::Network(e.to_string())),
        };
        let reply: SuccessResponse =
            serde_json::from_str(&text).map_err(|e| BraillError::Network(e.to_string()))?;
        if let Some(error) = &reply.error {
            warn!("[API] {} refused: {}", path, error);
        }
        Ok(reply.success)
    }
}

impl DashboardApi for HttpApi {
    fn get_reminders(&self) -> Result<Vec<Reminder>> {
        self.get::<RemindersResponse>("/api/get-reminders")
            .map(|r| r.reminders)
    }

    fn get_notes(&self) -> Result<Vec<Note>> {
        self.get::<NotesResponse>("/api/get-notes").map(|r| r.notes)
    }

    fn save_config(&self, config: &Config) -> Result<bool> {
        self.post("/api/save-config", config)
    }

    fn save_profile(&self, profile: &SaveProfileRequest) -> Result<bool> {
        self.post("/api/save-profile", profile)
    }

    fn delete_reminder(&self, time: &str, medicine: &str) -> Result<bool> {
        self.post(
            "/api/delete-reminder",
            &DeleteReminderRequest {
                time: time.to_string(),
                medicine: medicine.to_string(),
            },
        )
    }
}

#[derive(Debug, Default)]
struct MemoryData {
    reminders: Vec<Reminder>,
    notes: Vec<Note>,
    config: Option<Config>,
    profile: Option<SaveProfileRequest>,
    offline: bool,
}

/// Backend stand-in holding everything in memory
#[derive(Clone, Default)]
pub struct MemoryApi {
    data: Arc<RwLock<MemoryData>>,
}

impl MemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reminders(self, reminders: Vec<Reminder>) -> Self {
        self.data.write().reminders = reminders;
        self
    }

    pub fn with_notes(self, notes: Vec<Note>) -> Self {
        self.data.write().notes = notes;
        self
    }

    /// Make every call fail as if the server were unreachable
    pub fn set_offline(&self, offline: bool) {
        self.data.write().offline = offline;
    }

    pub fn reminders(&self) -> Vec<Reminder> {
        self.data.read().reminders.clone()
    }

    pub fn saved_config(&self) -> Option<Config> {
        self.data.read().config.clone()
    }

    pub fn saved_profile(&self) -> Option<SaveProfileRequest> {
        self.data.read().profile.clone()
    }

    fn online(&self) -> Result<()> {
        if self.data.read().offline {
            Err(BraillError::Network("offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl DashboardApi for MemoryApi {
    fn get_reminders(&self) -> Result<Vec<Reminder>> {
        self.online()?;
        Ok(self.reminders())
    }

    fn get_notes(&self) -> Result<Vec<Note>> {
        self.online()?;
        Ok(self.data.read().notes.clone())
    }

    fn save_config(&self, config: &Config) -> Result<bool> {
        self.online()?;
        self.data.write().config = Some(config.clone());
        Ok(true)
    }

    fn save_profile(&self, profile: &SaveProfileRequest) -> Result<bool> {
        self.online()?;
        self.data.write().profile = Some(profile.clone());
        Ok(true)
    }

    /// Removes every exact `(time, medicine)` match
    fn delete_reminder(&self, time: &str, medicine: &str) -> Result<bool> {
        self.online()?;
        let mut data = self.data.write();
        let before = data.reminders.len();
        data.reminders.retain(|r| !r.matches(time, medicine));
        Ok(data.reminders.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_requires_exact_pair() {
        let api = MemoryApi::new().with_reminders(vec![
            Reminder::new("08:00", "A"),
            Reminder::new("09:00", "A"),
        ]);

        assert!(api.delete_reminder("08:00", "A").unwrap());
        assert_eq!(api.reminders(), vec![Reminder::new("09:00", "A")]);

        assert!(!api.delete_reminder("08:00", "B").unwrap());
        assert!(!api.delete_reminder("09:00", "a").unwrap());
        assert_eq!(api.reminders().len(), 1);
    }

    #[test]
    fn test_delete_removes_all_duplicates() {
        let api = MemoryApi::new().with_reminders(vec![
            Reminder::new("08:00", "A"),
            Reminder::new("08:00", "A"),
            Reminder::new("08:00", "B"),
        ]);
        assert!(api.delete_reminder("08:00", "A").unwrap());
        assert_eq!(api.reminders(), vec![Reminder::new("08:00", "B")]);
    }

    #[test]
    fn test_offline_is_network_error() {
        let api = MemoryApi::new();
        api.set_offline(true);
        assert!(matches!(api.get_notes(), Err(BraillError::Network(_))));
        api.set_offline(false);
        assert!(api.get_notes().unwrap().is_empty());
    }

    #[test]
    fn test_saves_are_recorded() {
        let api = MemoryApi::new();
        assert!(api.save_config(&Config::new("g", "r", "d")).unwrap());
        assert_eq!(api.saved_config().unwrap().device_id, "d");
    }

    #[test]
    fn test_http_unreachable_is_network_error() {
        let api = HttpApi::new("http://127.0.0.1:1/", Duration::from_millis(200));
        assert!(matches!(
            api.get_reminders(),
            Err(BraillError::Network(_))
        ));
        assert!(matches!(
            api.delete_reminder("08:00", "A"),
            Err(BraillError::Network(_))
        ));
    }
}
