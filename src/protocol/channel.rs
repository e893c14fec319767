//! Outbound port of the realtime channel

use super::events::{ChannelMessage, InboundEvent, OutboundEvent};
use crate::{BraillError, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::Arc;

/// Fire-and-forget sender of outbound events
pub trait ChannelSink: Send {
    fn emit(&self, event: OutboundEvent) -> Result<()>;
}

/// In-process channel: records what was emitted and lets callers inject
/// inbound traffic
#[derive(Clone)]
pub struct MemoryChannel {
    sent: Arc<Mutex<Vec<OutboundEvent>>>,
    inbound_tx: Sender<ChannelMessage>,
    inbound_rx: Receiver<ChannelMessage>,
}

impl Default for MemoryChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryChannel {
    pub fn new() -> Self {
        let (inbound_tx, inbound_rx) = unbounded();
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            inbound_tx,
            inbound_rx,
        }
    }

    /// Receiver the orchestrator listens on
    pub fn inbound(&self) -> Receiver<ChannelMessage> {
        self.inbound_rx.clone()
    }

    pub fn push(&self, message: ChannelMessage) {
        // The receiver lives as long as self
        let _ = self.inbound_tx.send(message);
    }

    pub fn push_event(&self, event: InboundEvent) {
        self.push(ChannelMessage::Event(event));
    }

    /// Decode a raw frame the way the network transport would
    pub fn push_frame(&self, frame: &str) -> Result<()> {
        if let Some(event) = InboundEvent::decode(frame)? {
            self.push_event(event);
        }
        Ok(())
    }

    /// Everything emitted so far
    pub fn sent(&self) -> Vec<OutboundEvent> {
        self.sent.lock().clone()
    }

    /// Drain the emitted events
    pub fn take_sent(&self) -> Vec<OutboundEvent> {
        std::mem::take(&mut *self.sent.lock())
    }
}

impl ChannelSink for MemoryChannel {
    fn emit(&self, event: OutboundEvent) -> Result<()> {
        // Encoding is part of the contract even in memory
        event.encode()?;
        self.sent.lock().push(event);
        Ok(())
    }
}

/// Sink that refuses everything; used when no backend is configured
pub struct DisconnectedSink;

impl ChannelSink for DisconnectedSink {
    fn emit(&self, event: OutboundEvent) -> Result<()> {
        Err(BraillError::Channel(format!(
            "Not connected, dropped {}",
            event.name()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::AssistantCommand;

    #[test]
    fn test_memory_channel_records_and_drains() {
        let channel = MemoryChannel::new();
        channel.emit(OutboundEvent::StopAssistant).unwrap();
        channel
            .emit(OutboundEvent::SendCommand {
                command: AssistantCommand::Note,
            })
            .unwrap();

        assert_eq!(channel.sent().len(), 2);
        assert_eq!(channel.take_sent()[0], OutboundEvent::StopAssistant);
        assert!(channel.sent().is_empty());
    }

    #[test]
    fn test_push_frame_preserves_order() {
        let channel = MemoryChannel::new();
        channel.push(ChannelMessage::Connected);
        channel
            .push_frame(r#"{"event":"assistant_started","data":{}}"#)
            .unwrap();
        channel.push_frame(r#"{"event":"mystery"}"#).unwrap();
        channel.push(ChannelMessage::Disconnected);

        let received: Vec<ChannelMessage> = channel.inbound().try_iter().collect();
        assert_eq!(
            received,
            vec![
                ChannelMessage::Connected,
                ChannelMessage::Event(InboundEvent::AssistantStarted),
                ChannelMessage::Disconnected,
            ]
        );
    }

    #[test]
    fn test_disconnected_sink_errors() {
        let err = DisconnectedSink.emit(OutboundEvent::StopAssistant).unwrap_err();
        assert!(matches!(err, BraillError::Channel(_)));
    }
}
