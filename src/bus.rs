//! Message-bus capability used by the import operation.
//!
//! The import operation travels over a persistent WebSocket channel shared
//! with other agent traffic rather than plain HTTP. The bus is modeled as an
//! injected capability: [`BusProvider`] hands out the shared [`MessageBus`]
//! (acquisition itself is asynchronous and may fail), and the bus delivers
//! one correlated reply per sent message.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// HTTP-style method tag carried by a bus message envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BusMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// Message envelope dispatched over the agent message bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Correlation id; the reply carries the same uuid.
    pub uuid: Uuid,
    pub method: BusMethod,
    /// Request path relative to the agent root (e.g., "/project/{id}/import/x").
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Builder for bus message envelopes.
#[derive(Debug)]
pub struct MessageBuilder {
    method: BusMethod,
    path: String,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl MessageBuilder {
    /// Start a message for the given method and agent-relative path.
    pub fn new(method: BusMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Attach a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a body.
    pub fn data(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Finish the envelope, assigning a fresh correlation uuid.
    pub fn build(self) -> Message {
        Message {
            uuid: Uuid::new_v4(),
            method: self.method,
            path: self.path,
            headers: self.headers,
            body: self.body,
        }
    }
}

/// Reply correlated to a sent message by uuid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyEnvelope {
    pub uuid: Uuid,
    /// HTTP-style status code of the backend outcome.
    pub code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl ReplyEnvelope {
    /// Whether the reply denotes a successful outcome.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

/// A live channel to the agent message bus.
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Send a message and wait for its correlated reply.
    ///
    /// A non-success reply or a transport failure is returned as an error;
    /// the caller sees the same error surface as for HTTP operations.
    async fn send(&self, message: Message) -> Result<()>;
}

/// Capability for obtaining the shared message bus.
#[async_trait]
pub trait BusProvider: Send + Sync {
    /// Obtain the shared bus. Acquisition may fail, in which case the
    /// underlying cause propagates to the caller.
    async fn message_bus(&self) -> Result<Arc<dyn MessageBus>>;
}
