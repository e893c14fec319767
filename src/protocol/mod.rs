//! Realtime event protocol with the assistant backend

pub mod channel;
pub mod events;
pub mod ws;

pub use channel::{ChannelSink, DisconnectedSink, MemoryChannel};
pub use events::{AssistantCommand, ChannelMessage, InboundEvent, OutboundEvent, QuickActionKind};
pub use ws::{ReconnectPolicy, WsSink, WsTransport};
