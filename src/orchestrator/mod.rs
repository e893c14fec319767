//! Orchestrator thread and its UI handle
//!
//! The orchestrator owns the [`Session`] and is the only thing that mutates
//! it. It waits on UI commands, channel traffic, HTTP results, capture
//! results and the next timer deadline, handles one message to completion,
//! then republishes the [`DashboardView`] for the UI.

pub mod commands;
pub mod session;

pub use commands::{AppCommand, AppEvent, Stamped};
pub use crate::emergency::EMERGENCY_REDIRECT_DELAY;
pub use crate::screen::{ANNOUNCE_DELAY, PROFILE_SAVED_DELAY};
pub use session::{Session, SessionPorts, TimerKind, SOS_MESSAGE};

use crate::api::{ApiRequest, ApiResponse};
use crate::protocol::{ChannelMessage, ChannelSink};
use crate::speech::{CaptureEvent, SpeechFeedback, VoiceCapture};
use crate::storage::LocalStore;
use crate::view::DashboardView;
use crate::{BraillError, Result};
use crossbeam_channel::{bounded, never, select, unbounded, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Latest snapshot published by the orchestrator
pub type SharedView = Arc<RwLock<DashboardView>>;

type RepaintFn = Arc<dyn Fn() + Send + Sync>;

/// Longest wait when no timer is pending
const IDLE_WAIT: Duration = Duration::from_secs(1);

/// External collaborators wired in by the binary or by tests
pub struct Backends {
    pub store: Arc<dyn LocalStore>,
    pub channel: Box<dyn ChannelSink>,
    pub inbound: Receiver<ChannelMessage>,
    pub api_requests: Sender<ApiRequest>,
    pub api_responses: Receiver<ApiResponse>,
    pub speech: Box<dyn SpeechFeedback>,
    pub capture: Box<dyn VoiceCapture>,
}

/// Handle for driving the orchestrator from the UI
#[derive(Clone)]
pub struct OrchestratorHandle {
    command_tx: Sender<Stamped>,
    event_rx: Receiver<AppEvent>,
    view: SharedView,
    seq: Arc<AtomicU64>,
    repaint: Arc<Mutex<Option<RepaintFn>>>,
}

impl OrchestratorHandle {
    /// Send a command, stamped with its call order
    pub fn send_command(&self, command: AppCommand) -> Result<()> {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.command_tx
            .send(Stamped { seq, command })
            .map_err(|e| BraillError::Channel(format!("Failed to send command: {}", e)))
    }

    pub fn try_recv_event(&self) -> Option<AppEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Copy of the latest snapshot
    pub fn view(&self) -> DashboardView {
        self.view.read().clone()
    }

    pub fn shared_view(&self) -> SharedView {
        Arc::clone(&self.view)
    }

    /// Called after every published snapshot, e.g. to wake the UI
    pub fn set_repaint_callback(&self, callback: impl Fn() + Send + Sync + 'static) {
        *self.repaint.lock() = Some(Arc::new(callback));
    }
}

pub struct Orchestrator {
    session: Session,
    command_rx: Receiver<Stamped>,
    event_tx: Sender<AppEvent>,
    channel_rx: Receiver<ChannelMessage>,
    api_rx: Receiver<ApiResponse>,
    capture_rx: Receiver<CaptureEvent>,
    view: SharedView,
    repaint: Arc<Mutex<Option<RepaintFn>>>,
}

enum Step {
    Command(Option<Stamped>),
    Channel(Option<ChannelMessage>),
    Api(Option<ApiResponse>),
    Capture(Option<CaptureEvent>),
    Tick,
}

impl Orchestrator {
    pub fn new(backends: Backends) -> (Self, OrchestratorHandle) {
        let Backends {
            store,
            channel,
            inbound,
            api_requests,
            api_responses,
            speech,
            capture,
        } = backends;

        let (command_tx, command_rx) = bounded(100);
        let (event_tx, event_rx) = unbounded();
        let (capture_tx, capture_rx) = unbounded();

        let session = Session::new(SessionPorts {
            store,
            channel,
            speech,
            capture,
            capture_events: capture_tx,
            api: api_requests,
            ui_events: event_tx.clone(),
        });

        let view: SharedView = Arc::new(RwLock::new(session.view()));
        let repaint = Arc::new(Mutex::new(None));

        let handle = OrchestratorHandle {
            command_tx,
            event_rx,
            view: Arc::clone(&view),
            seq: Arc::new(AtomicU64::new(0)),
            repaint: Arc::clone(&repaint),
        };

        let orchestrator = Self {
            session,
            command_rx,
            event_tx,
            channel_rx: inbound,
            api_rx: api_responses,
            capture_rx,
            view,
            repaint,
        };

        (orchestrator, handle)
    }

    /// Run the event loop on its own thread
    pub fn start(self) -> Result<JoinHandle<()>> {
        let handle = thread::Builder::new()
            .name("braillai-orchestrator".to_string())
            .spawn(move || self.run())?;
        Ok(handle)
    }

    fn run(mut self) {
        info!("[ORCHESTRATOR] Started");
        self.session.start(Instant::now());
        self.publish();

        loop {
            let timeout = self
                .session
                .next_deadline()
                .map(|deadline| deadline.saturating_duration_since(Instant::now()))
                .unwrap_or(IDLE_WAIT)
                .min(IDLE_WAIT);

            let step = select! {
                recv(self.command_rx) -> msg => Step::Command(msg.ok()),
                recv(self.channel_rx) -> msg => Step::Channel(msg.ok()),
                recv(self.api_rx) -> msg => Step::Api(msg.ok()),
                recv(self.capture_rx) -> msg => Step::Capture(msg.ok()),
                default(timeout) => Step::Tick,
            };

            let now = Instant::now();
            match step {
                Step::Command(Some(stamped)) => {
                    let shutdown = stamped.command == AppCommand::Shutdown;
                    self.session.handle_command(stamped, now);
                    if shutdown {
                        info!("[ORCHESTRATOR] Shutdown requested");
                        let _ = self.event_tx.send(AppEvent::Shutdown);
                        self.publish();
                        break;
                    }
                }
                Step::Command(None) => {
                    warn!("[ORCHESTRATOR] Command channel disconnected");
                    self.session.shutdown();
                    break;
                }
                Step::Channel(Some(message)) => self.session.handle_channel(message, now),
                Step::Channel(None) => {
                    debug!("[ORCHESTRATOR] Transport closed");
                    self.session.handle_channel(ChannelMessage::Disconnected, now);
                    self.channel_rx = never();
                }
                Step::Api(Some(response)) => self.session.handle_api(response, now),
                Step::Api(None) => {
                    debug!("[ORCHESTRATOR] API worker closed");
                    self.api_rx = never();
                }
                Step::Capture(Some(event)) => self.session.handle_capture(event, now),
                Step::Capture(None) => self.capture_rx = never(),
                Step::Tick => {}
            }

            self.session.fire_due_timers(Instant::now());
            self.publish();
        }

        info!("[ORCHESTRATOR] Stopped");
    }

    fn publish(&self) {
        *self.view.write() = self.session.view();
        let repaint = self.repaint.lock().clone();
        if let Some(repaint) = repaint {
            repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiWorker, MemoryApi};
    use crate::protocol::{InboundEvent, MemoryChannel};
    use crate::screen::Screen;
    use crate::session::AssistantSessionState;
    use crate::speech::{LogSpeech, UnsupportedCapture};
    use crate::storage::MemoryStore;

    fn wait_for(handle: &OrchestratorHandle, check: impl Fn(&DashboardView) -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(3);
        while Instant::now() < deadline {
            if check(&handle.view()) {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        false
    }

    fn spawn() -> (MemoryChannel, OrchestratorHandle, JoinHandle<()>) {
        let channel = MemoryChannel::new();
        let worker = ApiWorker::spawn(Arc::new(MemoryApi::new())).unwrap();
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
        (channel, handle, thread)
    }

    #[test]
    fn test_commands_update_shared_view() {
        let (_channel, handle, thread) = spawn();
        handle.send_command(AppCommand::GetStarted).unwrap();
        assert!(wait_for(&handle, |v| v.screen == Screen::ProfileSelector));

        handle.send_command(AppCommand::Shutdown).unwrap();
        thread.join().unwrap();
        assert_eq!(handle.try_recv_event(), Some(AppEvent::Shutdown));
    }

    #[test]
    fn test_inbound_events_reach_session() {
        let (channel, handle, thread) = spawn();
        channel.push(ChannelMessage::Connected);
        handle.send_command(AppCommand::StartAssistant).unwrap();
        assert!(wait_for(&handle, |v| v.session
            == AssistantSessionState::Starting));
        channel.push_event(InboundEvent::AssistantStarted);
        assert!(wait_for(&handle, |v| v.session
            == AssistantSessionState::Running));

        handle.send_command(AppCommand::Shutdown).unwrap();
        thread.join().unwrap();
    }

    #[test]
    fn test_repaint_callback_runs() {
        let (_channel, handle, thread) = spawn();
        let hits = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&hits);
        handle.set_repaint_callback(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        handle.send_command(AppCommand::ToggleLargeFont).unwrap();
        assert!(wait_for(&handle, |v| v.large_font));
        assert!(wait_for(&handle, |_| hits.load(Ordering::SeqCst) > 0));

        handle.send_command(AppCommand::Shutdown).unwrap();
        thread.join().unwrap();
    }
}
