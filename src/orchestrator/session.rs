//! Session reducer
//!
//! Holds every piece of mutable client state and applies one message at a
//! time. Nothing in here blocks or spawns: outbound traffic goes through the
//! channel sink and the API request sender, delays go through the timer
//! queue. The orchestrator thread drives it; tests drive it directly with a
//! fake clock.

use super::commands::{AppCommand, AppEvent, Stamped};
use crate::api::{ApiRequest, ApiResponse, Note};
use crate::classifier::{classify_text, StatusEvent};
use crate::contacts::ContactBook;
use crate::emergency::{AlertPayload, EmergencyAlertMediator, EMERGENCY_REDIRECT_DELAY};
use crate::feed::{Feed, FeedKind, Notice, NoticeLevel, NOTICE_TTL};
use crate::profile::{Config, PersonalInfo, ProfileStore};
use crate::protocol::{
    AssistantCommand, ChannelMessage, ChannelSink, InboundEvent, OutboundEvent, QuickActionKind,
};
use crate::screen::{
    Entry, Navigation, Screen, ScreenStateMachine, ANNOUNCE_DELAY, PROFILE_SAVED_DELAY,
};
use crate::session::{AssistantSessionState, SessionLifecycle, STOP_RESOLVE_DELAY};
use crate::speech::{
    CaptureEvent, CaptureManager, CaptureOutcome, FormField, SpeechFeedback, VoiceCapture,
};
use crate::storage::{LocalStore, LocalStoreExt, KEY_LARGE_FONT};
use crate::timers::{TimerId, TimerQueue};
use crate::view::{self, DashboardView, ReminderList, Summary};
use crate::BraillError;
use chrono::NaiveDate;
use crossbeam_channel::Sender;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Spoken by the floating SOS button
pub const SOS_MESSAGE: &str = "Emergency SOS activated. Contacting your emergency contact now.";

const NOT_CONNECTED: &str = "Not connected to the assistant server";
const TRANSCRIPT_PREVIEW_CHARS: usize = 50;

/// Deferred work scheduled on the session's timer queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Announce(Screen),
    ResolveStop,
    AlertDismiss,
    NoticeExpire(Uuid),
    RouteToDashboard,
    RouteToProfile,
}

/// Everything the session talks to
pub struct SessionPorts {
    pub store: Arc<dyn LocalStore>,
    pub channel: Box<dyn ChannelSink>,
    pub speech: Box<dyn SpeechFeedback>,
    pub capture: Box<dyn VoiceCapture>,
    /// Where the capture backend reports results
    pub capture_events: Sender<CaptureEvent>,
    pub api: Sender<ApiRequest>,
    pub ui_events: Sender<AppEvent>,
}

pub struct Session {
    store: Arc<dyn LocalStore>,
    profiles: ProfileStore,
    contacts: ContactBook,
    screens: ScreenStateMachine,
    lifecycle: SessionLifecycle,
    alert: EmergencyAlertMediator,
    timers: TimerQueue<TimerKind>,

    channel: Box<dyn ChannelSink>,
    speech: Box<dyn SpeechFeedback>,
    capture: CaptureManager,
    api: Sender<ApiRequest>,
    ui_events: Sender<AppEvent>,

    feed: Feed,
    notices: Vec<Notice>,
    connected: bool,
    has_run: bool,
    listening: bool,
    picker: Option<QuickActionKind>,
    reminders: ReminderList,
    notes: Option<Vec<Note>>,
    large_font: bool,
    voice_input_enabled: bool,
    saving: bool,

    announce_timer: Option<TimerId>,
    stop_timer: Option<TimerId>,
    route_timer: Option<TimerId>,
    last_selection_seq: u64,
}

impl Session {
    pub fn new(ports: SessionPorts) -> Self {
        let SessionPorts {
            store,
            channel,
            speech,
            capture,
            capture_events,
            api,
            ui_events,
        } = ports;

        let large_font = store.load::<bool>(KEY_LARGE_FONT).unwrap_or(false);

        Self {
            profiles: ProfileStore::load(Arc::clone(&store)),
            contacts: ContactBook::load(Arc::clone(&store)),
            store,
            screens: ScreenStateMachine::new(),
            lifecycle: SessionLifecycle::new(),
            alert: EmergencyAlertMediator::new(),
            timers: TimerQueue::new(),
            channel,
            speech,
            capture: CaptureManager::new(capture, capture_events),
            api,
            ui_events,
            feed: Feed::default(),
            notices: Vec::new(),
            connected: false,
            has_run: false,
            listening: false,
            picker: None,
            reminders: ReminderList::default(),
            notes: None,
            large_font,
            voice_input_enabled: false,
            saving: false,
            announce_timer: None,
            stop_timer: None,
            route_timer: None,
            last_selection_seq: 0,
        }
    }

    /// Announce the initial screen
    pub fn start(&mut self, now: Instant) {
        info!("[SESSION] Started on {}", self.screens.current());
        self.schedule_announcement(self.screens.current(), now);
    }

    pub fn screen(&self) -> Screen {
        self.screens.current()
    }

    pub fn assistant_state(&self) -> AssistantSessionState {
        self.lifecycle.state()
    }

    pub fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    pub fn contacts(&self) -> &ContactBook {
        &self.contacts
    }

    pub fn alert(&self) -> &EmergencyAlertMediator {
        &self.alert
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Stop capture and any speech in progress
    pub fn shutdown(&mut self) {
        self.capture.stop();
        self.speech.cancel();
        info!("[SESSION] Shut down");
    }

    // ------------------------------------------------------------------
    // UI commands
    // ------------------------------------------------------------------

    pub fn handle_command(&mut self, stamped: Stamped, now: Instant) {
        let Stamped { seq, command } = stamped;
        debug!("[SESSION] Command #{}: {:?}", seq, command);

        match command {
            AppCommand::GetStarted => self.navigate_simple(Navigation::GetStarted, now),
            AppCommand::Back => self.navigate_simple(Navigation::Back, now),
            AppCommand::SwitchProfile => self.navigate_simple(Navigation::SwitchProfile, now),
            AppCommand::EditPersonalInfo => {
                self.navigate_simple(Navigation::EditPersonalInfo, now)
            }
            AppCommand::CreateProfile => {
                self.profiles.create_profile();
                self.navigate_simple(Navigation::ProfileCreated, now);
            }
            AppCommand::SelectProfile { id } => self.select_profile(seq, &id, now),
            AppCommand::DeleteProfile { id } => self.delete_profile(&id, now),
            AppCommand::SaveConfig(config) => self.save_config(config, now),
            AppCommand::SavePersonalInfo(info) => self.save_personal_info(info, now),

            AppCommand::StartAssistant => self.start_assistant(now),
            AppCommand::StopAssistant => self.stop_assistant(now),
            AppCommand::SendCommand(command) => self.send_command(command, now),
            AppCommand::TriggerSos => {
                self.speech.speak(SOS_MESSAGE);
                self.notify(NoticeLevel::Error, "🚨 Emergency SOS Activated!", now);
                self.send_command(AssistantCommand::Emergency, now);
            }
            AppCommand::PickContact { name } => self.pick_contact(&name, now),
            AppCommand::CancelPicker => self.picker = None,
            AppCommand::QuickAction { action, contact } => {
                self.quick_action(action, &contact, now)
            }
            AppCommand::DismissAlert => self.alert.dismiss(&mut self.timers),

            AppCommand::AddContact { name, number } => self.add_contact(&name, &number, now),
            AppCommand::DeleteContact { name } => self.delete_contact(&name, now),

            AppCommand::RefreshDashboard => self.refresh_dashboard(),
            AppCommand::DeleteReminder { time, medicine } => {
                self.request(ApiRequest::DeleteReminder { time, medicine });
            }
            AppCommand::ToggleLargeFont => self.toggle_large_font(now),
            AppCommand::ToggleVoiceInput => self.toggle_voice_input(now),
            AppCommand::StartCapture(field) => self.start_capture(field, now),
            AppCommand::StopCapture => self.capture.stop(),
            AppCommand::DismissNotice(id) => self.notices.retain(|n| n.id != id),

            AppCommand::Shutdown => self.shutdown(),
        }
    }

    fn navigate_simple(&mut self, nav: Navigation<'_>, now: Instant) {
        let has_active = self.profiles.active().is_some();
        let entry = self.screens.navigate(nav, has_active);
        self.on_entry(entry, now);
    }

    fn on_entry(&mut self, entry: Option<Entry>, now: Instant) {
        let Some(entry) = entry else {
            return;
        };
        if let Some(route) = self.route_timer.take() {
            self.timers.cancel(route);
        }
        if entry.from != entry.to {
            self.capture.stop();
            self.picker = None;
        }
        self.schedule_announcement(entry.to, now);
        if entry.to == Screen::Dashboard {
            self.refresh_dashboard();
        }
    }

    /// One pending delayed route at a time, dropped by any screen entry
    fn schedule_route(&mut self, now: Instant, delay: Duration, kind: TimerKind) {
        if let Some(previous) = self.route_timer.take() {
            self.timers.cancel(previous);
        }
        self.route_timer = Some(self.timers.schedule(now, delay, kind));
    }

    /// One pending announcement at a time; a newer entry replaces it
    fn schedule_announcement(&mut self, screen: Screen, now: Instant) {
        if let Some(previous) = self.announce_timer.take() {
            self.timers.cancel(previous);
        }
        let id = self
            .timers
            .schedule(now, ANNOUNCE_DELAY, TimerKind::Announce(screen));
        self.announce_timer = Some(id);
    }

    fn select_profile(&mut self, seq: u64, id: &str, now: Instant) {
        if seq < self.last_selection_seq {
            debug!(
                "[SESSION] Dropping selection #{} older than #{}",
                seq, self.last_selection_seq
            );
            return;
        }
        self.last_selection_seq = seq;

        let switching = self.screens.current() != Screen::ProfileSelector;
        if switching && self.profiles.active_id() == Some(id) {
            debug!("[SESSION] Profile {} already active", id);
            return;
        }

        if self.profiles.select_profile(id).is_none() {
            self.notify_error(&BraillError::NotFound("Profile".to_string()), now);
            return;
        }

        let entry = self.screens.navigate(
            Navigation::ProfileSelected {
                config: self.profiles.config(),
                personal_info: self.profiles.personal_info(),
            },
            true,
        );
        self.on_entry(entry, now);

        if switching {
            self.notify(NoticeLevel::Success, "Profile switched!", now);
        }
    }

    fn delete_profile(&mut self, id: &str, now: Instant) {
        let was_active = self.profiles.active_id() == Some(id);
        let Some(removed) = self.profiles.delete_profile(id) else {
            self.notify_error(&BraillError::NotFound("Profile".to_string()), now);
            return;
        };
        self.notify(
            NoticeLevel::Info,
            format!("Profile \"{}\" deleted", removed.display_name()),
            now,
        );
        if was_active {
            let entry = self.screens.on_active_profile_removed();
            self.on_entry(entry, now);
        }
    }

    fn save_config(&mut self, config: Config, now: Instant) {
        if !config.has_required_keys() {
            self.notify(NoticeLevel::Error, "Please enter your Gemini API key", now);
            return;
        }
        let Some(profile_id) = self.active_profile_id(now) else {
            return;
        };
        self.saving = true;
        self.request(ApiRequest::SaveConfig { profile_id, config });
    }

    fn save_personal_info(&mut self, personal_info: PersonalInfo, now: Instant) {
        if !personal_info.is_complete() {
            self.notify(NoticeLevel::Error, "Please enter your name", now);
            return;
        }
        let Some(profile_id) = self.active_profile_id(now) else {
            return;
        };
        self.saving = true;
        self.request(ApiRequest::SavePersonalInfo {
            profile_id,
            personal_info,
        });
    }

    /// Id of the profile a save is made for
    fn active_profile_id(&mut self, now: Instant) -> Option<String> {
        let id = self.profiles.active_id().map(str::to_string);
        if id.is_none() {
            self.notify_error(&BraillError::NotFound("Profile".to_string()), now);
        }
        id
    }

    fn start_assistant(&mut self, now: Instant) {
        if !self.lifecycle.request_start() {
            self.notify(NoticeLevel::Info, "Assistant is already running", now);
            return;
        }
        let config = self.profiles.config().clone();
        if !self.emit(OutboundEvent::StartAssistant(config), now) {
            self.lifecycle.on_error();
            return;
        }
        self.feed.clear();
        self.feed.system("🎙️ Starting BraillAI...");
    }

    fn stop_assistant(&mut self, now: Instant) {
        if self.lifecycle.request_stop() {
            if let Some(previous) = self.stop_timer.take() {
                self.timers.cancel(previous);
            }
            let id = self
                .timers
                .schedule(now, STOP_RESOLVE_DELAY, TimerKind::ResolveStop);
            self.stop_timer = Some(id);
            self.feed.system("⏹️ Stopping assistant...");
            self.notify(NoticeLevel::Info, "Stopping assistant...", now);
        }
        self.emit(OutboundEvent::StopAssistant, now);
    }

    fn send_command(&mut self, command: AssistantCommand, now: Instant) {
        if let Some(kind) = command.quick_action() {
            if self.contacts.is_empty() {
                self.notify(
                    NoticeLevel::Error,
                    "No contacts available. Add contacts first!",
                    now,
                );
            } else {
                self.picker = Some(kind);
            }
            return;
        }

        if command == AssistantCommand::Emergency {
            if !self.profiles.personal_info().is_complete() {
                self.notify(
                    NoticeLevel::Error,
                    "Please complete your profile first",
                    now,
                );
                self.schedule_route(now, EMERGENCY_REDIRECT_DELAY, TimerKind::RouteToProfile);
                return;
            }
            if self.emit(OutboundEvent::SendCommand { command }, now) {
                self.feed.system("▶ Emergency: Calling emergency contact...");
                self.notify(NoticeLevel::Error, "🚨 EMERGENCY ACTIVATED", now);
            }
            return;
        }

        if self.lifecycle.state() != AssistantSessionState::Running {
            self.notify(NoticeLevel::Error, "Please start the assistant first", now);
            return;
        }
        if self.emit(OutboundEvent::SendCommand { command }, now) {
            self.feed
                .system(format!("▶ Quick Action: {}", command.title()));
            self.notify(
                NoticeLevel::Info,
                format!("Executing: {}", command.title()),
                now,
            );
        }
    }

    fn pick_contact(&mut self, name: &str, now: Instant) {
        let Some(action) = self.picker.take() else {
            debug!("[SESSION] Contact picked without an open picker");
            return;
        };
        let Some(contact) = self.contacts.get(name).cloned() else {
            self.notify_error(&BraillError::NotFound(format!("Contact \"{}\"", name)), now);
            return;
        };
        let sent = self.emit(
            OutboundEvent::QuickAction {
                action,
                contact: contact.name.clone(),
            },
            now,
        );
        if sent {
            self.notify(
                NoticeLevel::Info,
                format!("{} {}...", action.verb(), contact.name),
                now,
            );
            self.feed.system(match action {
                QuickActionKind::Call => format!("📞 Calling: {}", contact.name),
                QuickActionKind::Message => format!("💬 Messaging: {}", contact.name),
            });
        }
    }

    fn quick_action(&mut self, action: QuickActionKind, name: &str, now: Instant) {
        let Some(contact) = self.contacts.get(name).cloned() else {
            self.notify_error(&BraillError::NotFound(format!("Contact \"{}\"", name)), now);
            return;
        };
        let sent = self.emit(
            OutboundEvent::QuickAction {
                action,
                contact: contact.name.clone(),
            },
            now,
        );
        if sent {
            let text = match action {
                QuickActionKind::Call => format!("Calling {}...", contact.name),
                QuickActionKind::Message => format!("Opening message to {}...", contact.name),
            };
            self.notify(NoticeLevel::Info, text, now);
        }
    }

    fn add_contact(&mut self, name: &str, number: &str, now: Instant) {
        match self.contacts.add(name, number) {
            Ok(contact) => {
                self.notify(
                    NoticeLevel::Success,
                    format!("Contact \"{}\" added successfully!", contact.name),
                    now,
                );
                self.sync_contacts();
            }
            Err(e) => self.notify_error(&e, now),
        }
    }

    fn delete_contact(&mut self, name: &str, now: Instant) {
        match self.contacts.remove(name) {
            Ok(contact) => {
                self.notify(
                    NoticeLevel::Info,
                    format!("Contact \"{}\" deleted", contact.name),
                    now,
                );
                self.sync_contacts();
            }
            Err(e) => self.notify_error(&e, now),
        }
    }

    /// Push the full contact list; a failure is retried on the next connect
    fn sync_contacts(&mut self) {
        let event = OutboundEvent::UpdateContacts {
            contacts: self.contacts.list().to_vec(),
        };
        if let Err(e) = self.channel.emit(event) {
            debug!("[SESSION] Contact sync deferred: {}", e);
        }
    }

    fn refresh_dashboard(&mut self) {
        self.request(ApiRequest::Refresh);
    }

    fn toggle_large_font(&mut self, now: Instant) {
        self.large_font = !self.large_font;
        self.store.save(KEY_LARGE_FONT, &self.large_font);
        if self.large_font {
            self.speech.speak("Large font enabled");
            self.notify(NoticeLevel::Info, "🔤 Large Font Enabled", now);
        } else {
            self.speech.speak("Large font disabled");
            self.notify(NoticeLevel::Info, "Large Font Disabled", now);
        }
    }

    fn toggle_voice_input(&mut self, now: Instant) {
        if !self.capture.is_available() {
            self.voice_input_enabled = false;
            self.notify_error(
                &BraillError::CapabilityUnavailable("speech recognition".to_string()),
                now,
            );
            return;
        }
        self.voice_input_enabled = !self.voice_input_enabled;
        if self.voice_input_enabled {
            self.notify(
                NoticeLevel::Success,
                "Voice input enabled! Click microphone buttons to speak",
                now,
            );
        } else {
            self.capture.stop();
            self.notify(NoticeLevel::Info, "Voice input disabled", now);
        }
    }

    fn start_capture(&mut self, field: FormField, now: Instant) {
        if !self.voice_input_enabled {
            debug!("[SESSION] Capture for {:?} ignored, voice input off", field);
            return;
        }
        match self.capture.start(field) {
            Ok(()) => self.notify(NoticeLevel::Info, "🎤 Listening... Speak now!", now),
            Err(e @ BraillError::CapabilityUnavailable(_)) => self.notify_error(&e, now),
            Err(e) => {
                warn!("[SESSION] Capture failed to start: {}", e);
                self.notify(
                    NoticeLevel::Error,
                    "Could not start voice input. Try again!",
                    now,
                );
            }
        }
    }

    // ------------------------------------------------------------------
    // Realtime channel
    // ------------------------------------------------------------------

    pub fn handle_channel(&mut self, message: ChannelMessage, now: Instant) {
        match message {
            ChannelMessage::Connected => {
                info!("[SESSION] Channel connected");
                self.connected = true;
                self.has_run = false;
                if !self.contacts.is_empty() {
                    self.sync_contacts();
                }
            }
            ChannelMessage::Disconnected => {
                warn!("[SESSION] Channel disconnected");
                let was_connected = self.connected;
                self.connected = false;
                self.force_idle();
                if was_connected {
                    self.notify(NoticeLevel::Error, "Disconnected from the assistant", now);
                }
            }
            ChannelMessage::Event(event) => self.handle_inbound(event, now),
        }
    }

    fn handle_inbound(&mut self, event: InboundEvent, now: Instant) {
        match event {
            InboundEvent::AssistantStarted => {
                if self.lifecycle.confirm_started() {
                    self.has_run = true;
                    self.feed.system("BraillAI is now listening...");
                    self.notify(NoticeLevel::Success, "BraillAI started successfully!", now);
                }
            }
            InboundEvent::AssistantStopped => {
                self.has_run = true;
                self.force_idle();
            }
            InboundEvent::TerminalOutput { text } => {
                for status in classify_text(&text) {
                    self.apply_status(status, now);
                }
            }
            InboundEvent::CommandSent { command } => {
                debug!("[SESSION] Backend acknowledged '{}'", command);
            }
            InboundEvent::CommandExecuted { command } => {
                self.notify(
                    NoticeLevel::Success,
                    format!("Command completed: {}", command),
                    now,
                );
            }
            InboundEvent::ShowEmergencyAlert(payload) => self.show_alert(payload, now),
            InboundEvent::RequestInput { message } => {
                self.feed.system(message.clone());
                self.notify(NoticeLevel::Info, message, now);
            }
            InboundEvent::Error { message } => {
                warn!("[SESSION] Backend error: {}", message);
                self.lifecycle.on_error();
                self.notify_error(&BraillError::Channel(message), now);
            }
            InboundEvent::Status { message } => self.feed.system(message),
            InboundEvent::ContactsUpdated { success } => {
                if success {
                    debug!("[SESSION] Backend contacts updated");
                } else {
                    warn!("[SESSION] Backend rejected contact update");
                }
            }
            InboundEvent::ActionCompleted { action, contact } => {
                info!("[SESSION] {} completed for {}", action, contact);
            }
        }
    }

    fn apply_status(&mut self, status: StatusEvent, now: Instant) {
        match status {
            StatusEvent::EmergencyDetected => {
                let payload = AlertPayload::from_personal_info(self.profiles.personal_info());
                self.show_alert(payload, now);
            }
            StatusEvent::ListeningStateChanged(listening) => self.listening = listening,
            StatusEvent::UserUtterance(text) => {
                self.listening = false;
                self.feed.push(FeedKind::User, text);
            }
            StatusEvent::AssistantUtterance(text) => self.feed.push(FeedKind::Assistant, text),
            StatusEvent::SystemNotice(text) => self.feed.system(text),
            StatusEvent::RawOutput(text) => self.feed.push(FeedKind::Terminal, text),
        }
    }

    fn show_alert(&mut self, payload: AlertPayload, now: Instant) {
        self.alert
            .trigger(payload, now, &mut self.timers, TimerKind::AlertDismiss);
    }

    fn force_idle(&mut self) {
        if let Some(timer) = self.stop_timer.take() {
            self.timers.cancel(timer);
        }
        self.lifecycle.reset();
        self.listening = false;
    }

    // ------------------------------------------------------------------
    // HTTP results
    // ------------------------------------------------------------------

    pub fn handle_api(&mut self, response: ApiResponse, now: Instant) {
        match response {
            ApiResponse::Refreshed { reminders, notes } => {
                self.reminders = match reminders {
                    Ok(list) => ReminderList::Loaded(list),
                    Err(e) => {
                        warn!("[SESSION] Reminders unavailable: {}", e);
                        ReminderList::Failed
                    }
                };
                self.notes = match notes {
                    Ok(list) => Some(list),
                    Err(e) => {
                        warn!("[SESSION] Notes unavailable: {}", e);
                        None
                    }
                };
            }
            ApiResponse::ConfigSaved {
                profile_id,
                config,
                result,
            } => {
                self.saving = false;
                match result {
                    Ok(true) => {
                        let active = self.profiles.active_id() == Some(profile_id.as_str());
                        self.profiles.save_config(&profile_id, config);
                        if active {
                            self.notify(NoticeLevel::Success, "Configuration saved!", now);
                            self.navigate_simple(Navigation::ConfigSaved, now);
                        } else {
                            debug!("[SESSION] Config saved for inactive profile {}", profile_id);
                        }
                    }
                    Ok(false) | Err(_) => {
                        self.notify(NoticeLevel::Error, "Error saving configuration", now);
                    }
                }
            }
            ApiResponse::PersonalInfoSaved {
                profile_id,
                personal_info,
                result,
            } => {
                self.saving = false;
                match result {
                    Ok(true) => {
                        let active = self.profiles.active_id() == Some(profile_id.as_str());
                        self.profiles.save_personal_info(&profile_id, personal_info);
                        if active {
                            self.notify(NoticeLevel::Success, "Profile saved successfully!", now);
                            self.schedule_route(
                                now,
                                PROFILE_SAVED_DELAY,
                                TimerKind::RouteToDashboard,
                            );
                        } else {
                            debug!(
                                "[SESSION] Personal info saved for inactive profile {}",
                                profile_id
                            );
                        }
                    }
                    Ok(false) => self.notify(NoticeLevel::Error, "Failed to save profile", now),
                    Err(e) => {
                        warn!("[SESSION] Profile save failed: {}", e);
                        self.notify(NoticeLevel::Error, "Error saving profile", now);
                    }
                }
            }
            ApiResponse::ReminderDeleted {
                time,
                medicine,
                result,
            } => match result {
                Ok(true) => {
                    self.notify(
                        NoticeLevel::Success,
                        format!("Reminder for {} deleted", medicine),
                        now,
                    );
                    self.refresh_dashboard();
                }
                Ok(false) => {
                    self.notify_error(
                        &BraillError::NotFound(format!("Reminder {} at {}", medicine, time)),
                        now,
                    );
                }
                Err(e) => {
                    warn!("[SESSION] Reminder delete failed: {}", e);
                    self.notify(NoticeLevel::Error, "Error deleting reminder", now);
                }
            },
        }
    }

    // ------------------------------------------------------------------
    // Voice capture
    // ------------------------------------------------------------------

    pub fn handle_capture(&mut self, event: CaptureEvent, now: Instant) {
        let Some(CaptureEvent { field, outcome }) = self.capture.accept(event) else {
            return;
        };
        match outcome {
            CaptureOutcome::Transcript(text) => {
                let preview: String = text.chars().take(TRANSCRIPT_PREVIEW_CHARS).collect();
                let ellipsis = if text.chars().count() > TRANSCRIPT_PREVIEW_CHARS {
                    "..."
                } else {
                    ""
                };
                self.notify(
                    NoticeLevel::Success,
                    format!("Got it: \"{}{}\"", preview, ellipsis),
                    now,
                );
                if self.ui_events.send(AppEvent::Transcript { field, text }).is_err() {
                    debug!("[SESSION] UI gone, transcript dropped");
                }
            }
            CaptureOutcome::Failed(kind) => self.notify(NoticeLevel::Error, kind.notice(), now),
            CaptureOutcome::Ended => debug!("[SESSION] Capture for {:?} ended", field),
        }
    }

    // ------------------------------------------------------------------
    // Timers
    // ------------------------------------------------------------------

    pub fn fire_due_timers(&mut self, now: Instant) {
        for (id, kind) in self.timers.pop_due(now) {
            match kind {
                TimerKind::Announce(screen) => {
                    if self.announce_timer == Some(id) {
                        self.announce_timer = None;
                        self.speech.speak(screen.announcement());
                    }
                }
                TimerKind::ResolveStop => {
                    if self.stop_timer == Some(id) {
                        self.stop_timer = None;
                        if self.lifecycle.state() == AssistantSessionState::Stopping {
                            self.lifecycle.reset();
                            self.listening = false;
                            self.notify(NoticeLevel::Info, "Assistant stopped", now);
                        }
                    }
                }
                TimerKind::AlertDismiss => {
                    self.alert.on_timer(id);
                }
                TimerKind::NoticeExpire(notice) => self.notices.retain(|n| n.id != notice),
                TimerKind::RouteToDashboard => {
                    if self.route_timer == Some(id) {
                        self.route_timer = None;
                        if self.profiles.personal_info().is_complete() {
                            self.navigate_simple(Navigation::PersonalInfoSaved, now);
                        }
                    }
                }
                TimerKind::RouteToProfile => {
                    if self.route_timer == Some(id) {
                        self.route_timer = None;
                        self.navigate_simple(Navigation::EditPersonalInfo, now);
                    }
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn emit(&mut self, event: OutboundEvent, now: Instant) -> bool {
        let name = event.name();
        match self.channel.emit(event) {
            Ok(()) => {
                debug!("[SESSION] Sent {}", name);
                true
            }
            Err(e) => {
                warn!("[SESSION] Could not send {}: {}", name, e);
                self.notify(NoticeLevel::Error, NOT_CONNECTED, now);
                false
            }
        }
    }

    fn request(&mut self, request: ApiRequest) {
        if self.api.send(request).is_err() {
            warn!("[SESSION] API worker is gone");
            self.saving = false;
        }
    }

    fn notify(&mut self, level: NoticeLevel, text: impl Into<String>, now: Instant) {
        let notice = Notice::new(level, text);
        debug!("[SESSION] Notice {:?}: {}", notice.level, notice.text);
        self.timers
            .schedule(now, NOTICE_TTL, TimerKind::NoticeExpire(notice.id));
        self.notices.push(notice);
    }

    fn notify_error(&mut self, error: &BraillError, now: Instant) {
        self.notify(NoticeLevel::Error, error.user_message(), now);
    }

    // ------------------------------------------------------------------
    // View
    // ------------------------------------------------------------------

    pub fn view(&self) -> DashboardView {
        self.view_at(view::local_hour(), view::local_today())
    }

    /// Snapshot for a given local hour and date
    pub fn view_at(&self, hour: u32, today: NaiveDate) -> DashboardView {
        let reminders = match &self.reminders {
            ReminderList::Loaded(list) => Some(list.as_slice()),
            _ => None,
        };
        let personal_info = self.profiles.personal_info();

        DashboardView {
            screen: self.screens.current(),
            screen_entry: self.screens.entries(),
            profiles: self.profiles.list().to_vec(),
            active_profile_id: self.profiles.active_id().map(str::to_string),
            config: self.profiles.config().clone(),
            personal_info: personal_info.clone(),
            contacts: self.contacts.list().to_vec(),
            connected: self.connected,
            session: self.lifecycle.state(),
            listening: self.listening,
            status_label: view::status_label(self.connected, self.lifecycle.state(), self.has_run)
                .to_string(),
            feed: self.feed.entries().cloned().collect(),
            notices: self.notices.clone(),
            alert: self.alert.payload().cloned(),
            picker: self.picker,
            greeting: view::greeting(hour, personal_info),
            summary: Summary::build(today, reminders, self.notes.as_deref()),
            reminders: self.reminders.clone(),
            large_font: self.large_font,
            voice_input_enabled: self.voice_input_enabled,
            voice_available: self.capture.is_available(),
            capturing: self.capture.active(),
            saving: self.saving,
        }
    }
}
