//! Background thread running blocking HTTP calls
//!
//! The orchestrator never blocks on the network: it posts an [`ApiRequest`]
//! and picks up the matching [`ApiResponse`] in its select loop.

use super::client::DashboardApi;
use super::types::{Note, Reminder, SaveProfileRequest};
use crate::profile::{Config, PersonalInfo};
use crate::Result;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    /// Reminders and notes for the dashboard summary and list
    Refresh,
    /// Saves carry the id of the profile they were made for
    SaveConfig {
        profile_id: String,
        config: Config,
    },
    SavePersonalInfo {
        profile_id: String,
        personal_info: PersonalInfo,
    },
    DeleteReminder { time: String, medicine: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse {
    Refreshed {
        reminders: Result<Vec<Reminder>>,
        notes: Result<Vec<Note>>,
    },
    ConfigSaved {
        profile_id: String,
        config: Config,
        result: Result<bool>,
    },
    PersonalInfoSaved {
        profile_id: String,
        personal_info: PersonalInfo,
        result: Result<bool>,
    },
    ReminderDeleted {
        time: String,
        medicine: String,
        result: Result<bool>,
    },
}

/// Run one request to completion
pub fn respond(api: &dyn DashboardApi, request: ApiRequest) -> ApiResponse {
    match request {
        ApiRequest::Refresh => ApiResponse::Refreshed {
            reminders: api.get_reminders(),
            notes: api.get_notes(),
        },
        ApiRequest::SaveConfig { profile_id, config } => {
            let result = api.save_config(&config);
            ApiResponse::ConfigSaved {
                profile_id,
                config,
                result,
            }
        }
        ApiRequest::SavePersonalInfo {
            profile_id,
            personal_info,
        } => {
            let result = api.save_profile(&SaveProfileRequest::from(&personal_info));
            ApiResponse::PersonalInfoSaved {
                profile_id,
                personal_info,
                result,
            }
        }
        ApiRequest::DeleteReminder { time, medicine } => {
            let result = api.delete_reminder(&time, &medicine);
            ApiResponse::ReminderDeleted {
                time,
                medicine,
                result,
            }
        }
    }
}

pub struct ApiWorker {
    pub requests: Sender<ApiRequest>,
    pub responses: Receiver<ApiResponse>,
    pub thread: JoinHandle<()>,
}

impl ApiWorker {
    /// Start the worker; it exits once every request sender is dropped
    pub fn spawn(api: Arc<dyn DashboardApi>) -> Result<Self> {
        let (requests, request_rx) = unbounded::<ApiRequest>();
        let (response_tx, responses) = unbounded();

        let thread = thread::Builder::new()
            .name("braillai-api".to_string())
            .spawn(move || {
                info!("[API] Worker started");
                for request in request_rx.iter() {
                    debug!("[API] Handling {:?}", request);
                    if response_tx.send(respond(api.as_ref(), request)).is_err() {
                        break;
                    }
                }
                info!("[API] Worker stopped");
            })?;

        Ok(Self {
            requests,
            responses,
            thread,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryApi;
    use std::time::Duration;

    #[test]
    fn test_respond_refresh() {
        let api = MemoryApi::new().with_reminders(vec![Reminder::new("07:30", "Iron")]);
        let ApiResponse::Refreshed { reminders, notes } = respond(&api, ApiRequest::Refresh)
        else {
            panic!("wrong response");
        };
        assert_eq!(reminders.unwrap().len(), 1);
        assert!(notes.unwrap().is_empty());
    }

    #[test]
    fn test_worker_round_trip() {
        let api = MemoryApi::new();
        let worker = ApiWorker::spawn(Arc::new(api.clone())).unwrap();

        worker
            .requests
            .send(ApiRequest::SaveConfig {
                profile_id: "profile_a".to_string(),
                config: Config::new("g", "", ""),
            })
            .unwrap();
        let response = worker
            .responses
            .recv_timeout(Duration::from_secs(2))
            .unwrap();
        assert!(matches!(
            response,
            ApiResponse::ConfigSaved { ref profile_id, result: Ok(true), .. }
                if profile_id == "profile_a"
        ));
        assert_eq!(api.saved_config().unwrap().gemini_key, "g");

        drop(worker.requests);
        worker.thread.join().unwrap();
    }
}
