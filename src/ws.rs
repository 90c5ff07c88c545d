//! WebSocket-backed implementation of the message-bus capability.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{oneshot, Mutex, OnceCell};
use tokio_tungstenite::tungstenite::Message as WsFrame;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::bus::{BusProvider, Message, MessageBus, ReplyEnvelope};
use crate::error::{ProjectError, Result};

type AgentStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type PendingReplies = Arc<Mutex<HashMap<Uuid, oneshot::Sender<ReplyEnvelope>>>>;

/// Bus provider backed by a single lazily-connected WebSocket channel.
///
/// The first acquisition connects; later acquisitions reuse the channel. A
/// failed connection surfaces as [`ProjectError::BusUnavailable`] with the
/// underlying cause.
pub struct WsAgentBus {
    url: String,
    channel: OnceCell<Arc<WsChannel>>,
}

impl WsAgentBus {
    /// Create a provider for the agent bus endpoint.
    ///
    /// # Arguments
    /// * `url` - WebSocket URL of the agent bus (e.g., "ws://localhost:8080/wsagent")
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            channel: OnceCell::new(),
        }
    }
}

#[async_trait]
impl BusProvider for WsAgentBus {
    async fn message_bus(&self) -> Result<Arc<dyn MessageBus>> {
        let channel = self
            .channel
            .get_or_try_init(|| async {
                WsChannel::connect(&self.url)
                    .await
                    .map(Arc::new)
                    .map_err(|e| ProjectError::BusUnavailable(e.to_string()))
            })
            .await?;

        Ok(Arc::clone(channel) as Arc<dyn MessageBus>)
    }
}

/// A connected bus channel with uuid-correlated replies.
struct WsChannel {
    sink: Mutex<SplitSink<AgentStream, WsFrame>>,
    pending: PendingReplies,
}

impl WsChannel {
    async fn connect(url: &str) -> Result<Self> {
        let (stream, _) = connect_async(url).await?;
        info!(%url, "connected to agent message bus");

        let (sink, source) = stream.split();
        let pending: PendingReplies = Arc::new(Mutex::new(HashMap::new()));
        tokio::spawn(read_replies(source, Arc::clone(&pending)));

        Ok(Self {
            sink: Mutex::new(sink),
            pending,
        })
    }
}

#[async_trait]
impl MessageBus for WsChannel {
    async fn send(&self, message: Message) -> Result<()> {
        let frame = serde_json::to_string(&message)?;

        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(message.uuid, tx);

        debug!(uuid = %message.uuid, path = %message.path, "sending bus message");
        if let Err(e) = self.sink.lock().await.send(WsFrame::Text(frame)).await {
            self.pending.lock().await.remove(&message.uuid);
            return Err(e.into());
        }

        // The sender is dropped when the reader task ends, which fails every
        // send still waiting on a closed socket.
        let reply = rx.await.map_err(|_| ProjectError::ChannelClosed)?;

        if reply.is_success() {
            Ok(())
        } else {
            Err(ProjectError::Api {
                status: reply.code,
                message: reply.body.unwrap_or_default(),
            })
        }
    }
}

/// Reader task: routes incoming replies to their pending waiters.
async fn read_replies(mut source: SplitStream<AgentStream>, pending: PendingReplies) {
    while let Some(frame) = source.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                warn!("bus read error: {}", e);
                break;
            }
        };

        let text = match frame {
            WsFrame::Text(text) => text,
            WsFrame::Close(_) => break,
            _ => continue,
        };

        match serde_json::from_str::<ReplyEnvelope>(&text) {
            Ok(reply) => match pending.lock().await.remove(&reply.uuid) {
                // A waiter that gave up is fine; drop the reply.
                Some(waiter) => {
                    let _ = waiter.send(reply);
                }
                None => warn!(uuid = %reply.uuid, "dropping uncorrelated bus reply"),
            },
            Err(e) => warn!("unparseable bus frame: {}", e),
        }
    }

    pending.lock().await.clear();
}
