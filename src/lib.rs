//! # projectlib
//!
//! Rust client library for the project and filesystem API of a per-session
//! workspace agent ("dev machine").
//!
//! ## Features
//!
//! - **Project management**: list, get, create, update and delete projects,
//!   including modules (`create_module`, `get_modules`, `delete_module`) and
//!   project-type detection (`estimate_project`, `resolve_sources`).
//! - **Filesystem operations**:
//!   - Create, read and write files (raw string content on the wire).
//!   - Create folders, copy, move, rename and delete items.
//!   - Browse children and read nested item trees with a depth limit.
//! - **Search**: name/text filters with paging (`maxItems`, `skipCount`).
//! - **Source import**: `import_project` dispatches over the shared agent
//!   message bus (WebSocket) instead of HTTP; the bus is an injected
//!   capability with a `tokio-tungstenite` implementation included.
//! - **Legacy callbacks**: [`callback::deliver`] adapts any operation to a
//!   completion-callback convention.
//!
//! Paths passed to operations are virtual filesystem paths; they are
//! normalized before hitting the wire (leading slash, `+` percent-encoded).
//!
//! ## Example: Basic Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use projectlib::{DevMachine, ProjectServiceClient, QueryExpression, WsAgentBus};
//!
//! # async fn example() -> projectlib::Result<()> {
//! let bus = Arc::new(WsAgentBus::new("ws://localhost:8080/wsagent"));
//! let client = ProjectServiceClient::new(bus);
//! let machine = DevMachine::new("workspace0", "http://localhost:8080/api");
//!
//! // List projects on the dev machine
//! for project in client.get_projects(&machine).await? {
//!     println!("{} ({})", project.name, project.path);
//! }
//!
//! // Read and update a file
//! let content = client.read_file(&machine, "/demo/src/main.rs").await?;
//! client.write_file(&machine, "/demo/src/main.rs", content).await?;
//!
//! // Search by name under a subtree
//! let expression = QueryExpression::new().with_path("/demo").with_name("*.rs");
//! let hits = client.search(&machine, &expression).await?;
//! println!("{} items", hits.len());
//! # Ok(())
//! # }
//! ```

pub mod bus;
pub mod callback;
pub mod client;
pub mod dto;
pub mod error;
pub mod http;
pub mod machine;
pub mod path;
pub mod query;
pub mod ws;

// Re-export commonly used types
pub use bus::{BusMethod, BusProvider, Message, MessageBuilder, MessageBus, ReplyEnvelope};
pub use client::ProjectServiceClient;
pub use dto::{
    CopyOptions, ItemReference, MoveOptions, ProjectConfig, SourceEstimation, SourceStorage,
    TreeElement,
};
pub use error::{ProjectError, Result};
pub use machine::DevMachine;
pub use path::normalize_path;
pub use query::QueryExpression;
pub use ws::WsAgentBus;
