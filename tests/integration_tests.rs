//! End-to-end flows through the session reducer and the orchestrator thread
//!
//! The reducer tests run on a fake clock with every HTTP request answered
//! synchronously by an in-memory backend.

use braillai::api::{respond, ApiRequest, ApiWorker, MemoryApi, Reminder};
use braillai::classifier::{ASSISTANT_MARKER, USER_MARKER};
use braillai::emergency::ALERT_AUTO_DISMISS;
use braillai::feed::FeedKind;
use braillai::orchestrator::{
    AppCommand, AppEvent, Backends, Orchestrator, Session, SessionPorts, Stamped,
    PROFILE_SAVED_DELAY,
};
use braillai::profile::{Config, PersonalInfo};
use braillai::protocol::{ChannelMessage, MemoryChannel, OutboundEvent};
use braillai::screen::Screen;
use braillai::session::AssistantSessionState;
use braillai::speech::{LogSpeech, UnsupportedCapture};
use braillai::storage::{JsonFileStore, LocalStore, MemoryStore};
use braillai::view::{DashboardView, ReminderList};
use crossbeam_channel::{unbounded, Receiver};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

struct Client {
    session: Session,
    channel: MemoryChannel,
    api: MemoryApi,
    api_rx: Receiver<ApiRequest>,
    _ui_rx: Receiver<AppEvent>,
    seq: u64,
    now: Instant,
}

impl Client {
    fn new() -> Self {
        Self::with(Arc::new(MemoryStore::new()), MemoryApi::new())
    }

    fn with(store: Arc<dyn LocalStore>, api: MemoryApi) -> Self {
        let channel = MemoryChannel::new();
        let (api_tx, api_rx) = unbounded();
        let (ui_tx, ui_rx) = unbounded();
        let (capture_tx, _) = unbounded();
        let session = Session::new(SessionPorts {
            store,
            channel: Box::new(channel.clone()),
            speech: Box::new(LogSpeech),
            capture: Box::new(UnsupportedCapture),
            capture_events: capture_tx,
            api: api_tx,
            ui_events: ui_tx,
        });
        Self {
            session,
            channel,
            api,
            api_rx,
            _ui_rx: ui_rx,
            seq: 0,
            now: Instant::now(),
        }
    }

    /// Apply a command, then answer whatever it asked the backend
    fn send(&mut self, command: AppCommand) {
        self.seq += 1;
        let stamped = Stamped {
            seq: self.seq,
            command,
        };
        self.session.handle_command(stamped, self.now);
        self.pump_api();
    }

    /// Apply a command but keep its backend requests unanswered
    fn send_held(&mut self, command: AppCommand) -> Vec<ApiRequest> {
        self.seq += 1;
        let stamped = Stamped {
            seq: self.seq,
            command,
        };
        self.session.handle_command(stamped, self.now);
        self.api_rx.try_iter().collect()
    }

    fn answer(&mut self, requests: Vec<ApiRequest>) {
        for request in requests {
            let response = respond(&self.api, request);
            self.session.handle_api(response, self.now);
        }
        self.pump_api();
    }

    fn pump_api(&mut self) {
        while let Ok(request) = self.api_rx.try_recv() {
            let response = respond(&self.api, request);
            self.session.handle_api(response, self.now);
        }
    }

    fn pump_channel(&mut self) {
        let inbound = self.channel.inbound();
        while let Ok(message) = inbound.try_recv() {
            self.session.handle_channel(message, self.now);
        }
        self.pump_api();
    }

    fn advance(&mut self, by: Duration) {
        self.now += by;
        self.session.fire_due_timers(self.now);
        self.pump_api();
    }

    fn notice_texts(&self) -> Vec<String> {
        self.session
            .notices()
            .iter()
            .map(|n| n.text.clone())
            .collect()
    }

    /// Create a profile and fill both forms; returns its id
    fn onboard(&mut self, key: &str, name: &str) -> String {
        self.send(AppCommand::CreateProfile);
        let id = self
            .session
            .profiles()
            .active_id()
            .map(str::to_string)
            .unwrap_or_default();
        self.send(AppCommand::SaveConfig(Config::new(key, "runner", "device-1")));
        assert_eq!(self.session.screen(), Screen::Profile);
        self.send(AppCommand::SavePersonalInfo(PersonalInfo {
            name: name.to_string(),
            blood_type: "A-".to_string(),
            emergency_contact_name: "Sam".to_string(),
            emergency_contact_number: "555-0199".to_string(),
            ..Default::default()
        }));
        self.advance(PROFILE_SAVED_DELAY);
        assert_eq!(self.session.screen(), Screen::Dashboard);
        id
    }
}

#[test]
fn test_first_run_onboarding() {
    let mut client = Client::new();
    client.session.start(client.now);
    assert_eq!(client.session.screen(), Screen::Welcome);

    client.send(AppCommand::GetStarted);
    assert_eq!(client.session.screen(), Screen::ProfileSelector);

    client.onboard("g-key", "Maya Patel");

    assert_eq!(client.api.saved_config(), Some(Config::new("g-key", "runner", "device-1")));
    assert_eq!(
        client.api.saved_profile().map(|p| p.name),
        Some("Maya Patel".to_string())
    );
    let view = client.session.view_at(9, chrono::NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
    assert_eq!(view.greeting, "Good Morning, Maya");
}

#[test]
fn test_each_profile_restores_its_own_data() {
    let mut client = Client::new();
    let people = [("key-a", "Ana Ruiz"), ("key-b", "Ben Okafor"), ("key-c", "Chen Wu")];
    let ids: Vec<String> = people
        .iter()
        .map(|(key, name)| client.onboard(key, name))
        .collect();

    assert_eq!(client.session.profiles().list().len(), 3);

    for ((key, name), id) in people.iter().zip(&ids).rev() {
        client.send(AppCommand::SwitchProfile);
        client.send(AppCommand::SelectProfile { id: id.clone() });

        assert_eq!(client.session.screen(), Screen::Dashboard);
        assert_eq!(client.session.profiles().active_id(), Some(id.as_str()));
        assert_eq!(client.session.profiles().config().gemini_key, *key);
        assert_eq!(client.session.profiles().personal_info().name, *name);
    }
}

#[test]
fn test_missing_gemini_key_routes_to_setup() {
    let mut client = Client::new();
    client.send(AppCommand::CreateProfile);
    let id = client
        .session
        .profiles()
        .active_id()
        .map(str::to_string)
        .unwrap();

    client.send(AppCommand::SwitchProfile);
    assert_eq!(client.session.screen(), Screen::ProfileSelector);
    client.send(AppCommand::SelectProfile { id });
    assert_eq!(client.session.screen(), Screen::Setup);
}

#[test]
fn test_blank_key_is_never_sent() {
    let mut client = Client::new();
    client.send(AppCommand::CreateProfile);
    client.send(AppCommand::SaveConfig(Config::new("   ", "", "")));

    assert_eq!(client.session.screen(), Screen::Setup);
    assert!(client.api.saved_config().is_none());
    assert!(client
        .notice_texts()
        .contains(&"Please enter your Gemini API key".to_string()));
}

#[test]
fn test_deleting_active_profile_returns_to_selector() {
    let mut client = Client::new();
    let first = client.onboard("key-a", "Ana Ruiz");
    let second = client.onboard("key-b", "Ben Okafor");

    client.send(AppCommand::DeleteProfile { id: second });

    assert_eq!(client.session.screen(), Screen::ProfileSelector);
    assert!(client.session.profiles().active_id().is_none());
    let remaining: Vec<&str> = client
        .session
        .profiles()
        .list()
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(remaining, vec![first.as_str()]);
}

#[test]
fn test_contact_names_are_case_insensitive() {
    let mut client = Client::new();
    client.onboard("key", "Maya Patel");
    client.channel.take_sent();

    client.send(AppCommand::AddContact {
        name: "Mom".to_string(),
        number: "555-0100".to_string(),
    });
    client.send(AppCommand::AddContact {
        name: "mom".to_string(),
        number: "555-0111".to_string(),
    });

    assert_eq!(client.session.contacts().len(), 1);
    let syncs: Vec<OutboundEvent> = client
        .channel
        .take_sent()
        .into_iter()
        .filter(|e| matches!(e, OutboundEvent::UpdateContacts { .. }))
        .collect();
    assert_eq!(syncs.len(), 1);

    client.send(AppCommand::DeleteContact {
        name: "MOM".to_string(),
    });
    assert!(client.session.contacts().is_empty());
}

#[test]
fn test_contacts_sync_on_connect() {
    let mut client = Client::new();
    client.onboard("key", "Maya Patel");
    client.send(AppCommand::AddContact {
        name: "Mom".to_string(),
        number: "555-0100".to_string(),
    });
    client.channel.take_sent();

    client.channel.push(ChannelMessage::Connected);
    client.pump_channel();

    let sent = client.channel.take_sent();
    assert!(matches!(
        sent.as_slice(),
        [OutboundEvent::UpdateContacts { contacts }] if contacts.len() == 1
    ));
}

#[test]
fn test_reminder_delete_removes_exact_pair() {
    let api = MemoryApi::new().with_reminders(vec![
        Reminder::new("08:00", "Aspirin"),
        Reminder::new("08:00", "Vitamin D"),
        Reminder::new("20:00", "Aspirin"),
    ]);
    let mut client = Client::with(Arc::new(MemoryStore::new()), api);
    client.onboard("key", "Maya Patel");

    client.send(AppCommand::DeleteReminder {
        time: "08:00".to_string(),
        medicine: "Aspirin".to_string(),
    });

    let expected = vec![
        Reminder::new("08:00", "Vitamin D"),
        Reminder::new("20:00", "Aspirin"),
    ];
    assert_eq!(client.api.reminders(), expected);
    assert_eq!(client.session.view().reminders, ReminderList::Loaded(expected));

    client.send(AppCommand::DeleteReminder {
        time: "08:00".to_string(),
        medicine: "Aspirin".to_string(),
    });
    assert_eq!(client.api.reminders().len(), 2);
}

#[test]
fn test_unreachable_backend_keeps_config_unsaved() {
    let api = MemoryApi::new();
    api.set_offline(true);
    let mut client = Client::with(Arc::new(MemoryStore::new()), api);
    client.send(AppCommand::CreateProfile);
    client.send(AppCommand::SaveConfig(Config::new("key", "", "")));

    assert_eq!(client.session.screen(), Screen::Setup);
    assert!(client
        .notice_texts()
        .contains(&"Error saving configuration".to_string()));
    assert_eq!(client.session.profiles().config(), &Config::default());
}

#[test]
fn test_terminal_frames_drive_feed_and_listening() {
    let mut client = Client::new();
    client.onboard("key", "Maya Patel");

    client
        .channel
        .push_frame(r#"{"event":"terminal_output","data":{"text":"Listening..."}}"#)
        .unwrap();
    client.pump_channel();
    assert!(client.session.view().listening);

    let frame = format!(
        r#"{{"event":"terminal_output","data":{{"text":"{} remind me at eight\n{} Reminder saved"}}}}"#,
        USER_MARKER, ASSISTANT_MARKER
    );
    client.channel.push_frame(&frame).unwrap();
    client.pump_channel();

    let view = client.session.view();
    assert!(!view.listening);
    let lines: Vec<(FeedKind, String)> = view
        .feed
        .iter()
        .map(|e| (e.kind, e.text.clone()))
        .collect();
    assert!(lines.contains(&(FeedKind::User, "remind me at eight".to_string())));
    assert!(lines.contains(&(FeedKind::Assistant, "Reminder saved".to_string())));
}

#[test]
fn test_detected_emergency_uses_profile_details() {
    let mut client = Client::new();
    client.onboard("key", "Maya Patel");

    client
        .channel
        .push_frame(
            r#"{"event":"terminal_output","data":{"text":"[COMMAND] Executing: emergency"}}"#,
        )
        .unwrap();
    client.pump_channel();

    let alert = client.session.view().alert.unwrap();
    assert_eq!(alert.name, "Maya Patel");
    assert_eq!(alert.blood, "A-");
    assert_eq!(alert.emergency_number, "555-0199");
    assert!(client
        .session
        .feed()
        .entries()
        .all(|e| e.kind != FeedKind::User));
}

#[test]
fn test_alert_last_trigger_wins() {
    let mut client = Client::new();
    client.onboard("key", "Maya Patel");

    client
        .channel
        .push_frame(r#"{"event":"show_emergency_alert","data":{"name":"First"}}"#)
        .unwrap();
    client.pump_channel();
    client.advance(ALERT_AUTO_DISMISS / 2);

    client
        .channel
        .push_frame(r#"{"event":"show_emergency_alert","data":{"name":"Second","emergency_name":"Sam"}}"#)
        .unwrap();
    client.pump_channel();

    let alert = client.session.view().alert.unwrap();
    assert_eq!(alert.name, "Second");
    assert_eq!(alert.emergency_name, "Sam");

    // The first trigger's timer no longer dismisses the second alert
    client.advance(ALERT_AUTO_DISMISS / 2 + Duration::from_millis(10));
    assert!(client.session.view().alert.is_some());

    client.advance(ALERT_AUTO_DISMISS / 2);
    assert!(client.session.view().alert.is_none());
}

#[test]
fn test_disconnect_forces_idle() {
    let mut client = Client::new();
    client.onboard("key", "Maya Patel");
    client.channel.push(ChannelMessage::Connected);
    client.pump_channel();

    client.send(AppCommand::StartAssistant);
    client
        .channel
        .push_frame(r#"{"event":"assistant_started"}"#)
        .unwrap();
    client.pump_channel();
    assert_eq!(client.session.assistant_state(), AssistantSessionState::Running);

    client.channel.push(ChannelMessage::Disconnected);
    client.pump_channel();
    assert_eq!(client.session.assistant_state(), AssistantSessionState::Idle);
    assert!(!client.session.view().connected);
}

#[test]
fn test_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = Arc::new(JsonFileStore::open(dir.path()).unwrap());
        let mut client = Client::with(store, MemoryApi::new());
        client.onboard("g-key", "Maya Patel");
        client.send(AppCommand::AddContact {
            name: "Mom".to_string(),
            number: "555-0100".to_string(),
        });
        client.send(AppCommand::ToggleLargeFont);
    }

    let store = Arc::new(JsonFileStore::open(dir.path()).unwrap());
    let client = Client::with(store, MemoryApi::new());

    let profiles = client.session.profiles();
    assert_eq!(profiles.list().len(), 1);
    assert_eq!(profiles.list()[0].name, "Maya Patel");
    assert_eq!(profiles.list()[0].config.gemini_key, "g-key");
    assert_eq!(profiles.config().gemini_key, "g-key");
    assert_eq!(profiles.personal_info().name, "Maya Patel");
    assert_eq!(client.session.contacts().len(), 1);
    assert!(client.session.view().large_font);
    assert_eq!(client.session.screen(), Screen::Welcome);
}

fn wait_for(view: impl Fn() -> DashboardView, check: impl Fn(&DashboardView) -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if check(&view()) {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    false
}

#[test]
fn test_orchestrator_onboarding_over_threads() {
    let channel = MemoryChannel::new();
    let api = MemoryApi::new().with_reminders(vec![Reminder::new("08:00", "Aspirin")]);
    let worker = ApiWorker::spawn(Arc::new(api.clone())).unwrap();
    let (orchestrator, handle) = Orchestrator::new(Backends {
        store: Arc::new(MemoryStore::new()),
        channel: Box::new(channel.clone()),
        inbound: channel.inbound(),
        api_requests: worker.requests,
        api_responses: worker.responses,
        speech: Box::new(LogSpeech),
        capture: Box::new(UnsupportedCapture),
    });
    let thread = orchestrator.start().unwrap();

    handle.send_command(AppCommand::GetStarted).unwrap();
    handle.send_command(AppCommand::CreateProfile).unwrap();
    handle
        .send_command(AppCommand::SaveConfig(Config::new("g-key", "", "")))
        .unwrap();
    assert!(wait_for(|| handle.view(), |v| v.screen == Screen::Profile));

    handle
        .send_command(AppCommand::SavePersonalInfo(PersonalInfo {
            name: "Maya Patel".to_string(),
            ..Default::default()
        }))
        .unwrap();
    assert!(wait_for(|| handle.view(), |v| v.screen == Screen::Dashboard));
    assert!(wait_for(
        || handle.view(),
        |v| matches!(&v.reminders, ReminderList::Loaded(list) if list.len() == 1)
    ));

    channel.push(ChannelMessage::Connected);
    assert!(wait_for(|| handle.view(), |v| v.connected));

    handle.send_command(AppCommand::StartAssistant).unwrap();
    assert!(wait_for(|| handle.view(), |v| v.session == AssistantSessionState::Starting));
    assert!(channel
        .sent()
        .iter()
        .any(|e| matches!(e, OutboundEvent::StartAssistant(config) if config.gemini_key == "g-key")));

    handle.send_command(AppCommand::Shutdown).unwrap();
    thread.join().unwrap();
    assert!(std::iter::from_fn(|| handle.try_recv_event()).any(|e| e == AppEvent::Shutdown));
}

#[test]
fn test_held_saves_land_in_their_own_profile() {
    let mut client = Client::new();
    let first = client.onboard("key-A", "Alice");

    client.send(AppCommand::EditPersonalInfo);
    let held = client.send_held(AppCommand::SavePersonalInfo(PersonalInfo {
        name: "Alice Moore".to_string(),
        ..Default::default()
    }));
    client.send(AppCommand::SwitchProfile);
    client.send(AppCommand::CreateProfile);
    let second = client
        .session
        .profiles()
        .active_id()
        .map(str::to_string)
        .unwrap_or_default();
    let held_config = client.send_held(AppCommand::SaveConfig(Config::new("key-B", "", "")));
    client.send(AppCommand::SwitchProfile);
    client.send(AppCommand::SelectProfile { id: first.clone() });

    client.answer(held);
    client.answer(held_config);
    client.advance(PROFILE_SAVED_DELAY);

    let profiles = client.session.profiles();
    assert_eq!(profiles.active_id(), Some(first.as_str()));
    assert_eq!(profiles.config().gemini_key, "key-A");
    assert_eq!(profiles.personal_info().name, "Alice Moore");
    assert_eq!(profiles.get(&second).map(|p| p.config.gemini_key.as_str()), Some("key-B"));
    assert!(profiles
        .get(&second)
        .is_some_and(|p| p.personal_info.name.is_empty()));
    assert_eq!(client.session.screen(), Screen::Dashboard);
}
