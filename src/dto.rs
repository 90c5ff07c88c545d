//! Data records exchanged verbatim with the workspace agent.
//!
//! The client neither validates nor interprets these beyond serialization;
//! unknown optional fields are skipped on the wire and defaulted on read so
//! records survive agents that omit them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Project configuration descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mixins: Vec<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceStorage>,
}

/// Location of external project sources (for import).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceStorage {
    #[serde(rename = "type")]
    pub storage_type: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub parameters: HashMap<String, String>,
}

/// Result of estimating a folder against a project type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceEstimation {
    #[serde(rename = "type")]
    pub project_type: String,
    #[serde(default)]
    pub matched: bool,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, Vec<String>>,
}

/// Metadata for a single filesystem entry (file or folder).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemReference {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(rename = "mimeType", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
}

/// A node in a recursively nested project file-tree response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeElement {
    pub node: ItemReference,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeElement>,
}

/// Options record sent as the body of a copy request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CopyOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub overwrite: bool,
}

/// Options record sent as the body of a move request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub overwrite: bool,
}
