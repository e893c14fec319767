//! Wire events exchanged with the assistant backend
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`.

use crate::contacts::Contact;
use crate::emergency::AlertPayload;
use crate::profile::Config;
use crate::{BraillError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Commands the assistant understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistantCommand {
    Emergency,
    Reminder,
    Note,
    ReadNotes,
    Call,
    Message,
}

impl AssistantCommand {
    pub const ALL: [AssistantCommand; 6] = [
        AssistantCommand::Emergency,
        AssistantCommand::Reminder,
        AssistantCommand::Note,
        AssistantCommand::ReadNotes,
        AssistantCommand::Call,
        AssistantCommand::Message,
    ];

    /// Name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            AssistantCommand::Emergency => "emergency",
            AssistantCommand::Reminder => "reminder",
            AssistantCommand::Note => "note",
            AssistantCommand::ReadNotes => "read_notes",
            AssistantCommand::Call => "call",
            AssistantCommand::Message => "message",
        }
    }

    /// Button and feed label
    pub fn title(&self) -> &'static str {
        match self {
            AssistantCommand::Emergency => "🚨 Emergency Call",
            AssistantCommand::Reminder => "⏰ Set Reminder",
            AssistantCommand::Note => "📝 Save Note",
            AssistantCommand::ReadNotes => "📖 Read Notes",
            AssistantCommand::Call => "📞 Make Call",
            AssistantCommand::Message => "💬 Send Message",
        }
    }

    /// Call and message go through the contact picker instead of the wire
    pub fn quick_action(&self) -> Option<QuickActionKind> {
        match self {
            AssistantCommand::Call => Some(QuickActionKind::Call),
            AssistantCommand::Message => Some(QuickActionKind::Message),
            _ => None,
        }
    }
}

impl std::fmt::Display for AssistantCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickActionKind {
    Call,
    Message,
}

impl QuickActionKind {
    pub fn picker_title(&self) -> &'static str {
        match self {
            QuickActionKind::Call => "📞 Select Contact to Call",
            QuickActionKind::Message => "💬 Select Contact to Message",
        }
    }

    /// Present participle for feed lines ("Calling", "Messaging")
    pub fn verb(&self) -> &'static str {
        match self {
            QuickActionKind::Call => "Calling",
            QuickActionKind::Message => "Messaging",
        }
    }
}

/// Client to backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum OutboundEvent {
    StartAssistant(Config),
    StopAssistant,
    SendCommand {
        command: AssistantCommand,
    },
    QuickAction {
        action: QuickActionKind,
        contact: String,
    },
    UpdateContacts {
        contacts: Vec<Contact>,
    },
}

impl OutboundEvent {
    pub fn name(&self) -> &'static str {
        match self {
            OutboundEvent::StartAssistant(_) => "start_assistant",
            OutboundEvent::StopAssistant => "stop_assistant",
            OutboundEvent::SendCommand { .. } => "send_command",
            OutboundEvent::QuickAction { .. } => "quick_action",
            OutboundEvent::UpdateContacts { .. } => "update_contacts",
        }
    }

    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| BraillError::Channel(e.to_string()))
    }
}

/// Backend to client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    AssistantStarted,
    AssistantStopped,
    TerminalOutput { text: String },
    CommandSent { command: String },
    CommandExecuted { command: String },
    ShowEmergencyAlert(AlertPayload),
    RequestInput { message: String },
    Error { message: String },
    /// Greeting sent by the backend on connect
    Status { message: String },
    ContactsUpdated { success: bool },
    ActionCompleted { action: String, contact: String },
}

#[derive(Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: Value,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TextData {
    text: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct CommandData {
    command: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct MessageData {
    message: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct SuccessData {
    success: bool,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ActionData {
    action: String,
    contact: String,
}

/// Null or missing payloads decode as the payload's default
fn payload<T: serde::de::DeserializeOwned + Default>(data: Value) -> Result<T> {
    if data.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(data).map_err(|e| BraillError::Channel(e.to_string()))
}

impl InboundEvent {
    /// Decode one text frame
    ///
    /// Unknown event names decode to `Ok(None)`; malformed frames are errors.
    pub fn decode(frame: &str) -> Result<Option<InboundEvent>> {
        let envelope: Envelope =
            serde_json::from_str(frame).map_err(|e| BraillError::Channel(e.to_string()))?;
        let data = envelope.data;

        let event = match envelope.event.as_str() {
            "assistant_started" => InboundEvent::AssistantStarted,
            "assistant_stopped" => InboundEvent::AssistantStopped,
            "terminal_output" => {
                let TextData { text } = payload(data)?;
                InboundEvent::TerminalOutput { text }
            }
            "command_sent" => {
                let CommandData { command } = payload(data)?;
                InboundEvent::CommandSent { command }
            }
            "command_executed" => {
                let CommandData { command } = payload(data)?;
                InboundEvent::CommandExecuted { command }
            }
            "show_emergency_alert" => InboundEvent::ShowEmergencyAlert(payload(data)?),
            "request_input" => {
                let MessageData { message } = payload(data)?;
                InboundEvent::RequestInput { message }
            }
            "error" => {
                let MessageData { message } = payload(data)?;
                InboundEvent::Error { message }
            }
            "status" => {
                let MessageData { message } = payload(data)?;
                InboundEvent::Status { message }
            }
            "contacts_updated" => {
                let SuccessData { success } = payload(data)?;
                InboundEvent::ContactsUpdated { success }
            }
            "action_completed" => {
                let ActionData { action, contact } = payload(data)?;
                InboundEvent::ActionCompleted { action, contact }
            }
            other => {
                debug!("[CHANNEL] Ignoring unknown event '{}'", other);
                return Ok(None);
            }
        };
        Ok(Some(event))
    }
}

/// Everything the transport hands to the orchestrator, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelMessage {
    Connected,
    Disconnected,
    Event(InboundEvent),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encoded(event: &OutboundEvent) -> Value {
        serde_json::from_str(&event.encode().unwrap()).unwrap()
    }

    #[test]
    fn test_outbound_shapes() {
        let start = OutboundEvent::StartAssistant(Config::new("g", "r", "d"));
        assert_eq!(
            encoded(&start),
            json!({"event": "start_assistant", "data": {"geminiKey": "g", "deviceRunnerKey": "r", "deviceId": "d"}})
        );
        assert_eq!(
            encoded(&OutboundEvent::StopAssistant),
            json!({"event": "stop_assistant"})
        );
        assert_eq!(
            encoded(&OutboundEvent::SendCommand {
                command: AssistantCommand::ReadNotes
            }),
            json!({"event": "send_command", "data": {"command": "read_notes"}})
        );
        assert_eq!(
            encoded(&OutboundEvent::QuickAction {
                action: QuickActionKind::Call,
                contact: "mom".to_string()
            }),
            json!({"event": "quick_action", "data": {"action": "call", "contact": "mom"}})
        );
    }

    #[test]
    fn test_update_contacts_is_full_snapshot() {
        let event = OutboundEvent::UpdateContacts {
            contacts: vec![
                Contact {
                    name: "mom".into(),
                    number: "1".into(),
                },
                Contact {
                    name: "dad".into(),
                    number: "2".into(),
                },
            ],
        };
        assert_eq!(
            encoded(&event)["data"]["contacts"],
            json!([{"name": "mom", "number": "1"}, {"name": "dad", "number": "2"}])
        );
    }

    #[test]
    fn test_decode_known_events() {
        assert_eq!(
            InboundEvent::decode(r#"{"event":"assistant_started","data":{"message":"ok"}}"#)
                .unwrap(),
            Some(InboundEvent::AssistantStarted)
        );
        assert_eq!(
            InboundEvent::decode(r#"{"event":"assistant_stopped"}"#).unwrap(),
            Some(InboundEvent::AssistantStopped)
        );
        assert_eq!(
            InboundEvent::decode(
                r#"{"event":"terminal_output","data":{"text":"You said: hi","timestamp":1.5}}"#
            )
            .unwrap(),
            Some(InboundEvent::TerminalOutput {
                text: "You said: hi".to_string()
            })
        );
        assert_eq!(
            InboundEvent::decode(r#"{"event":"error","data":{"message":"boom"}}"#).unwrap(),
            Some(InboundEvent::Error {
                message: "boom".to_string()
            })
        );
    }

    #[test]
    fn test_decode_emergency_alert() {
        let event = InboundEvent::decode(
            r#"{"event":"show_emergency_alert","data":{"name":"Ana","blood":"O-","address":"1 Main","emergency_name":"Bo","emergency_number":"7"}}"#,
        )
        .unwrap()
        .unwrap();
        let InboundEvent::ShowEmergencyAlert(alert) = event else {
            panic!("expected alert, got {:?}", event);
        };
        assert_eq!(alert.display_contact(), "Bo (7)");
    }

    #[test]
    fn test_unknown_event_ignored() {
        assert_eq!(
            InboundEvent::decode(r#"{"event":"pong","data":{}}"#).unwrap(),
            None
        );
    }

    #[test]
    fn test_malformed_frame_is_channel_error() {
        assert!(matches!(
            InboundEvent::decode("not json"),
            Err(BraillError::Channel(_))
        ));
        assert!(InboundEvent::decode(r#"{"event":"error","data":"oops"}"#).is_err());
    }

    #[test]
    fn test_command_helpers() {
        assert_eq!(AssistantCommand::ReadNotes.as_str(), "read_notes");
        assert_eq!(
            AssistantCommand::Message.quick_action(),
            Some(QuickActionKind::Message)
        );
        assert!(AssistantCommand::Emergency.quick_action().is_none());
    }
}
