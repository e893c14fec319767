//! WebSocket transport
//!
//! Runs a current-thread tokio runtime on a dedicated thread. Outbound frames
//! arrive over an unbounded tokio channel; inbound frames are decoded and
//! forwarded, together with connect/disconnect markers, over a crossbeam
//! channel so the orchestrator sees one ordered stream.
//!
//! The server must speak plain WebSocket text frames, each a JSON object
//! `{"event": <name>, "data": <payload>}`. Socket.IO framing is not
//! understood, so a Socket.IO backend needs a raw WebSocket endpoint.

use super::channel::ChannelSink;
use super::events::{ChannelMessage, InboundEvent, OutboundEvent};
use crate::{BraillError, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use futures::{SinkExt, StreamExt};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

/// Capped exponential backoff between connection attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub base: Duration,
    pub max: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(500),
            max: Duration::from_secs(30),
        }
    }
}

impl ReconnectPolicy {
    /// Delay before attempt number `attempt` (1-based)
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1).min(16)))
            .min(self.max)
    }
}

/// Outbound half handed to the orchestrator
pub struct WsSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSink for WsSink {
    fn emit(&self, event: OutboundEvent) -> Result<()> {
        let frame = event.encode()?;
        debug!("[CHANNEL] -> {}", event.name());
        self.tx
            .send(frame)
            .map_err(|_| BraillError::Channel("Transport has shut down".to_string()))
    }
}

/// Running transport; dropping the sink closes the connection
pub struct WsTransport {
    pub sink: WsSink,
    pub inbound: Receiver<ChannelMessage>,
    pub thread: JoinHandle<()>,
}

impl WsTransport {
    pub fn spawn(url: impl Into<String>, policy: ReconnectPolicy) -> Result<Self> {
        let url = url.into();
        let (tx, rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound) = unbounded();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let thread = thread::Builder::new()
            .name("braillai-ws".to_string())
            .spawn(move || {
                runtime.block_on(connection_loop(url, policy, rx, inbound_tx));
                info!("[CHANNEL] Transport stopped");
            })?;

        Ok(Self {
            sink: WsSink { tx },
            inbound,
            thread,
        })
    }
}

enum Exit {
    /// Sink dropped or orchestrator gone
    Shutdown,
    Lost(String),
}

async fn connection_loop(
    url: String,
    policy: ReconnectPolicy,
    mut outbound: mpsc::UnboundedReceiver<String>,
    inbound: Sender<ChannelMessage>,
) {
    let mut attempt: u32 = 0;

    loop {
        match run_connection(&url, &mut outbound, &inbound).await {
            Exit::Shutdown => return,
            Exit::Lost(reason) => {
                attempt += 1;
                let delay = policy.delay(attempt);
                warn!(
                    "[CHANNEL] Connection lost ({}), retry {} in {:?}",
                    reason, attempt, delay
                );
                if !drain_while_waiting(delay, &mut outbound).await {
                    return;
                }
            }
        }
    }
}

/// Sleep for `delay`, dropping anything emitted meanwhile
///
/// Returns false when the sink was dropped.
async fn drain_while_waiting(
    delay: Duration,
    outbound: &mut mpsc::UnboundedReceiver<String>,
) -> bool {
    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);
    loop {
        tokio::select! {
            _ = &mut sleep => return true,
            frame = outbound.recv() => match frame {
                Some(_) => warn!("[CHANNEL] Dropping outbound frame while disconnected"),
                None => return false,
            },
        }
    }
}

async fn run_connection(
    url: &str,
    outbound: &mut mpsc::UnboundedReceiver<String>,
    inbound: &Sender<ChannelMessage>,
) -> Exit {
    let (stream, _) = match connect_async(url).await {
        Ok(connected) => connected,
        Err(e) => return Exit::Lost(format!("connect: {}", e)),
    };
    info!("[CHANNEL] Connected to {}", url);
    if inbound.send(ChannelMessage::Connected).is_err() {
        return Exit::Shutdown;
    }

    let (mut write, mut read) = stream.split();

    let exit = loop {
        tokio::select! {
            msg = read.next() => match msg {
                Some(Ok(Message::Text(text))) => match InboundEvent::decode(&text) {
                    Ok(Some(event)) => {
                        if inbound.send(ChannelMessage::Event(event)).is_err() {
                            break Exit::Shutdown;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => error!("[CHANNEL] Bad frame: {}", e),
                },
                Some(Ok(Message::Close(_))) | None => break Exit::Lost("closed by server".to_string()),
                Some(Err(e)) => break Exit::Lost(format!("read: {}", e)),
                // Ping/pong handled by tungstenite
                Some(Ok(_)) => {}
            },
            frame = outbound.recv() => match frame {
                Some(frame) => {
                    if let Err(e) = write.send(Message::Text(frame)).await {
                        break Exit::Lost(format!("send: {}", e));
                    }
                }
                None => {
                    let _ = write.send(Message::Close(None)).await;
                    break Exit::Shutdown;
                }
            },
        }
    };

    let _ = inbound.send(ChannelMessage::Disconnected);
    exit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = ReconnectPolicy {
            base: Duration::from_millis(100),
            max: Duration::from_secs(1),
        };
        assert_eq!(policy.delay(1), Duration::from_millis(100));
        assert_eq!(policy.delay(2), Duration::from_millis(200));
        assert_eq!(policy.delay(4), Duration::from_millis(800));
        assert_eq!(policy.delay(5), Duration::from_secs(1));
        assert_eq!(policy.delay(500), Duration::from_secs(1));
    }

    #[test]
    fn test_unreachable_server_reports_nothing_and_shuts_down() {
        let transport = WsTransport::spawn(
            "ws://127.0.0.1:1/ws",
            ReconnectPolicy {
                base: Duration::from_millis(10),
                max: Duration::from_millis(20),
            },
        )
        .unwrap();

        std::thread::sleep(Duration::from_millis(50));
        assert!(transport.inbound.try_recv().is_err());

        drop(transport.sink);
        transport.thread.join().unwrap();
    }
}
