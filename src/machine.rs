//! Dev machine descriptor.

/// The backend execution environment bound to an IDE session.
///
/// Identified by a session id and the base URL of its workspace agent; every
/// request URL is built relative to these two values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevMachine {
    id: String,
    ws_agent_base_url: String,
}

impl DevMachine {
    /// Create a new dev machine descriptor.
    ///
    /// # Arguments
    /// * `id` - Session identifier
    /// * `ws_agent_base_url` - Base URL of the workspace agent, without a
    ///   trailing slash (e.g., "http://localhost:8080/api")
    pub fn new(id: impl Into<String>, ws_agent_base_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ws_agent_base_url: ws_agent_base_url.into(),
        }
    }

    /// Session identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Base URL of the workspace agent.
    pub fn ws_agent_base_url(&self) -> &str {
        &self.ws_agent_base_url
    }
}
