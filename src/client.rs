//! Project service client: the public operation surface.

use std::sync::Arc;

use reqwest::Method;
use tracing::debug;

use crate::bus::{BusMethod, BusProvider, MessageBuilder};
use crate::dto::{
    CopyOptions, ItemReference, MoveOptions, ProjectConfig, SourceEstimation, SourceStorage,
    TreeElement,
};
use crate::error::Result;
use crate::http::{HttpClient, RequestBody, APPLICATION_JSON};
use crate::machine::DevMachine;
use crate::path::normalize_path;
use crate::query::QueryExpression;

/// Client for the project and filesystem API of a workspace agent.
///
/// Every operation issues exactly one outbound call against the dev machine
/// passed in, builds fresh request state, and propagates failures unchanged.
/// The import operation travels over the injected message bus instead of
/// HTTP; everything else is plain request/response.
#[derive(Clone)]
pub struct ProjectServiceClient {
    http: HttpClient,
    bus: Arc<dyn BusProvider>,
}

impl ProjectServiceClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `bus` - Provider of the shared agent message bus, used by
    ///   [`import_project`](Self::import_project)
    pub fn new(bus: Arc<dyn BusProvider>) -> Self {
        Self {
            http: HttpClient::new(),
            bus,
        }
    }

    /// Create a new client routing HTTP traffic through a proxy.
    pub fn with_proxy(proxy: &str, bus: Arc<dyn BusProvider>) -> Result<Self> {
        Ok(Self {
            http: HttpClient::with_proxy(proxy)?,
            bus,
        })
    }

    /// List all projects of the dev machine.
    pub async fn get_projects(&self, machine: &DevMachine) -> Result<Vec<ProjectConfig>> {
        let body = self.http.get_json(&project_base(machine)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get the configuration of one project.
    pub async fn get_project(&self, machine: &DevMachine, path: &str) -> Result<ProjectConfig> {
        let body = self.http.get_json(&project_url(machine, path)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get metadata for a single filesystem entry.
    pub async fn get_item(&self, machine: &DevMachine, path: &str) -> Result<ItemReference> {
        let body = self.http.get_json(&item_url(machine, path)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Create a new project from the given configuration.
    pub async fn create_project(
        &self,
        machine: &DevMachine,
        config: &ProjectConfig,
    ) -> Result<ProjectConfig> {
        let body = self
            .http
            .request(
                Method::POST,
                &project_base(machine),
                RequestBody::Json(serde_json::to_string(config)?),
                true,
            )
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Create a module inside the project at `parent_path`.
    pub async fn create_module(
        &self,
        machine: &DevMachine,
        parent_path: &str,
        config: &ProjectConfig,
    ) -> Result<ProjectConfig> {
        let body = self
            .http
            .request(
                Method::POST,
                &project_url(machine, parent_path),
                RequestBody::Json(serde_json::to_string(config)?),
                true,
            )
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Estimate whether the folder at `path` matches a project type.
    pub async fn estimate_project(
        &self,
        machine: &DevMachine,
        path: &str,
        project_type: &str,
    ) -> Result<SourceEstimation> {
        let body = self
            .http
            .get_json(&estimate_url(machine, path, project_type))
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Resolve every project type matching the sources at `path`.
    pub async fn resolve_sources(
        &self,
        machine: &DevMachine,
        path: &str,
    ) -> Result<Vec<SourceEstimation>> {
        let body = self.http.get_json(&resolve_url(machine, path)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// List the modules of the project at `path`.
    pub async fn get_modules(
        &self,
        machine: &DevMachine,
        path: &str,
    ) -> Result<Vec<ProjectConfig>> {
        let body = self.http.get_json(&modules_url(machine, path)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Update the configuration of the project at `path`.
    pub async fn update_project(
        &self,
        machine: &DevMachine,
        path: &str,
        config: &ProjectConfig,
    ) -> Result<ProjectConfig> {
        let body = self
            .http
            .request(
                Method::PUT,
                &project_url(machine, path),
                RequestBody::Json(serde_json::to_string(config)?),
                true,
            )
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Create a file named `name` under `parent_path` with the given content.
    pub async fn create_file(
        &self,
        machine: &DevMachine,
        parent_path: &str,
        name: &str,
        content: impl Into<String>,
    ) -> Result<ItemReference> {
        let body = self
            .http
            .request(
                Method::POST,
                &create_file_url(machine, parent_path, name),
                RequestBody::Raw(content.into()),
                true,
            )
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Read the raw content of the file at `path`.
    pub async fn read_file(&self, machine: &DevMachine, path: &str) -> Result<String> {
        self.http.get_raw(&file_url(machine, path)).await
    }

    /// Overwrite the content of the file at `path`. Empty response.
    pub async fn write_file(
        &self,
        machine: &DevMachine,
        path: &str,
        content: impl Into<String>,
    ) -> Result<()> {
        self.http
            .request(
                Method::PUT,
                &file_url(machine, path),
                RequestBody::Raw(content.into()),
                false,
            )
            .await?;
        Ok(())
    }

    /// Create a folder at `path` (missing parents included).
    pub async fn create_folder(&self, machine: &DevMachine, path: &str) -> Result<ItemReference> {
        let body = self
            .http
            .request(
                Method::POST,
                &folder_url(machine, path),
                RequestBody::Empty,
                true,
            )
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Delete the item at `path`.
    pub async fn delete(&self, machine: &DevMachine, path: &str) -> Result<()> {
        self.http
            .request(
                Method::DELETE,
                &project_url(machine, path),
                RequestBody::Empty,
                false,
            )
            .await?;
        Ok(())
    }

    /// Detach the module `module_path` from the project at `parent_path`.
    pub async fn delete_module(
        &self,
        machine: &DevMachine,
        parent_path: &str,
        module_path: &str,
    ) -> Result<()> {
        self.http
            .request(
                Method::DELETE,
                &delete_module_url(machine, parent_path, module_path),
                RequestBody::Empty,
                false,
            )
            .await?;
        Ok(())
    }

    /// Copy the item at `path` into the folder `target`.
    ///
    /// # Arguments
    /// * `name` - New name for the copy, or `None` to keep the source name
    /// * `overwrite` - Replace an existing item of the same name
    pub async fn copy(
        &self,
        machine: &DevMachine,
        path: &str,
        target: &str,
        name: Option<&str>,
        overwrite: bool,
    ) -> Result<()> {
        let options = CopyOptions {
            name: name.map(str::to_string),
            overwrite,
        };
        self.http
            .request(
                Method::POST,
                &copy_url(machine, path, target),
                RequestBody::Json(serde_json::to_string(&options)?),
                false,
            )
            .await?;
        Ok(())
    }

    /// Move the item at `path` into the folder `target`.
    ///
    /// # Arguments
    /// * `name` - New name at the destination, or `None` to keep the source name
    /// * `overwrite` - Replace an existing item of the same name
    pub async fn move_item(
        &self,
        machine: &DevMachine,
        path: &str,
        target: &str,
        name: Option<&str>,
        overwrite: bool,
    ) -> Result<()> {
        let options = MoveOptions {
            name: name.map(str::to_string),
            overwrite,
        };
        self.http
            .request(
                Method::POST,
                &move_url(machine, path, target),
                RequestBody::Json(serde_json::to_string(&options)?),
                false,
            )
            .await?;
        Ok(())
    }

    /// Rename the item at `path` in place.
    ///
    /// Derived from a move into the item's own parent with a new name.
    pub async fn rename(&self, machine: &DevMachine, path: &str, new_name: &str) -> Result<()> {
        let source = normalize_path(path);
        let parent = match source.rfind('/') {
            Some(0) => "/".to_string(),
            Some(idx) => source[..idx].to_string(),
            // normalize_path output always carries a leading slash.
            None => "/".to_string(),
        };
        self.move_item(machine, &source, &parent, Some(new_name), false)
            .await
    }

    /// List the direct children of the folder at `path`.
    pub async fn get_children(
        &self,
        machine: &DevMachine,
        path: &str,
    ) -> Result<Vec<ItemReference>> {
        let body = self.http.get_json(&children_url(machine, path)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Read the item tree rooted at `path`.
    ///
    /// # Arguments
    /// * `depth` - Maximum nesting depth to descend
    /// * `include_files` - When given, whether files appear alongside folders
    pub async fn get_tree(
        &self,
        machine: &DevMachine,
        path: &str,
        depth: u32,
        include_files: Option<bool>,
    ) -> Result<TreeElement> {
        let body = self
            .http
            .get_json(&tree_url(machine, path, depth, include_files))
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Search for items matching the query expression.
    pub async fn search(
        &self,
        machine: &DevMachine,
        expression: &QueryExpression,
    ) -> Result<Vec<ItemReference>> {
        let body = self.http.get_json(&search_url(machine, expression)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Import external sources into the project at `path`.
    ///
    /// Unlike every other operation this one travels over the shared message
    /// bus. Resolves only if both bus acquisition and the send succeed; a
    /// failure at either step propagates its original cause.
    pub async fn import_project(
        &self,
        machine: &DevMachine,
        path: &str,
        source_storage: &SourceStorage,
    ) -> Result<()> {
        let data = serde_json::to_string(source_storage)?;
        let message = MessageBuilder::new(BusMethod::Post, import_path(machine.id(), path))
            .header("content-type", APPLICATION_JSON)
            .data(data)
            .build();

        debug!(path = %message.path, "importing project over message bus");
        let bus = self.bus.message_bus().await?;
        bus.send(message).await
    }
}

fn project_base(machine: &DevMachine) -> String {
    format!(
        "{}/project/{}",
        machine.ws_agent_base_url(),
        machine.id()
    )
}

fn project_url(machine: &DevMachine, path: &str) -> String {
    format!("{}{}", project_base(machine), normalize_path(path))
}

fn item_url(machine: &DevMachine, path: &str) -> String {
    format!("{}/item{}", project_base(machine), normalize_path(path))
}

fn estimate_url(machine: &DevMachine, path: &str, project_type: &str) -> String {
    format!(
        "{}/estimate{}?type={}",
        project_base(machine),
        normalize_path(path),
        project_type
    )
}

fn resolve_url(machine: &DevMachine, path: &str) -> String {
    format!("{}/resolve{}", project_base(machine), normalize_path(path))
}

fn modules_url(machine: &DevMachine, path: &str) -> String {
    format!("{}/modules{}", project_base(machine), normalize_path(path))
}

fn file_url(machine: &DevMachine, path: &str) -> String {
    format!("{}/file{}", project_base(machine), normalize_path(path))
}

fn create_file_url(machine: &DevMachine, parent_path: &str, name: &str) -> String {
    format!(
        "{}/file{}?name={}",
        project_base(machine),
        normalize_path(parent_path),
        name
    )
}

fn folder_url(machine: &DevMachine, path: &str) -> String {
    format!("{}/folder{}", project_base(machine), normalize_path(path))
}

fn delete_module_url(machine: &DevMachine, parent_path: &str, module_path: &str) -> String {
    format!(
        "{}/module{}?module={}",
        project_base(machine),
        normalize_path(parent_path),
        module_path
    )
}

fn copy_url(machine: &DevMachine, path: &str, target: &str) -> String {
    format!(
        "{}/copy{}?to={}",
        project_base(machine),
        normalize_path(path),
        target
    )
}

fn move_url(machine: &DevMachine, path: &str, target: &str) -> String {
    format!(
        "{}/move{}?to={}",
        project_base(machine),
        normalize_path(path),
        target
    )
}

fn children_url(machine: &DevMachine, path: &str) -> String {
    format!("{}/children{}", project_base(machine), normalize_path(path))
}

fn tree_url(machine: &DevMachine, path: &str, depth: u32, include_files: Option<bool>) -> String {
    let mut url = format!(
        "{}/tree{}?depth={}",
        project_base(machine),
        normalize_path(path),
        depth
    );
    if let Some(include_files) = include_files {
        url.push_str(&format!("&includeFiles={}", include_files));
    }
    url
}

fn search_url(machine: &DevMachine, expression: &QueryExpression) -> String {
    let mut url = format!("{}/search", project_base(machine));
    match expression.path() {
        Some(path) => url.push_str(&normalize_path(path)),
        None => url.push('/'),
    }
    url.push_str(&expression.to_query_string());
    url
}

fn import_path(machine_id: &str, path: &str) -> String {
    format!("/project/{}/import{}", machine_id, normalize_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{Message, MessageBus};
    use crate::error::ProjectError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    fn machine() -> DevMachine {
        DevMachine::new("ws42", "http://localhost:8080/api")
    }

    #[test]
    fn test_project_urls() {
        let m = machine();
        assert_eq!(project_base(&m), "http://localhost:8080/api/project/ws42");
        assert_eq!(
            project_url(&m, "demo"),
            "http://localhost:8080/api/project/ws42/demo"
        );
        assert_eq!(
            item_url(&m, "/demo/src"),
            "http://localhost:8080/api/project/ws42/item/demo/src"
        );
    }

    #[test]
    fn test_estimate_and_resolve_urls() {
        let m = machine();
        assert_eq!(
            estimate_url(&m, "/demo", "rust"),
            "http://localhost:8080/api/project/ws42/estimate/demo?type=rust"
        );
        assert_eq!(
            resolve_url(&m, "/demo"),
            "http://localhost:8080/api/project/ws42/resolve/demo"
        );
        assert_eq!(
            modules_url(&m, "/demo"),
            "http://localhost:8080/api/project/ws42/modules/demo"
        );
    }

    #[test]
    fn test_file_urls() {
        let m = machine();
        assert_eq!(
            file_url(&m, "/demo/a.txt"),
            "http://localhost:8080/api/project/ws42/file/demo/a.txt"
        );
        assert_eq!(
            create_file_url(&m, "/demo", "a.txt"),
            "http://localhost:8080/api/project/ws42/file/demo?name=a.txt"
        );
        assert_eq!(
            folder_url(&m, "demo/sub"),
            "http://localhost:8080/api/project/ws42/folder/demo/sub"
        );
    }

    #[test]
    fn test_copy_move_urls() {
        let m = machine();
        assert_eq!(
            copy_url(&m, "/a", "/b"),
            "http://localhost:8080/api/project/ws42/copy/a?to=/b"
        );
        assert_eq!(
            move_url(&m, "a", "/b"),
            "http://localhost:8080/api/project/ws42/move/a?to=/b"
        );
    }

    #[test]
    fn test_delete_module_url() {
        let m = machine();
        assert_eq!(
            delete_module_url(&m, "/parent", "/parent/mod"),
            "http://localhost:8080/api/project/ws42/module/parent?module=/parent/mod"
        );
    }

    #[test]
    fn test_tree_url_optional_include_files() {
        let m = machine();
        assert_eq!(
            tree_url(&m, "/demo", 2, None),
            "http://localhost:8080/api/project/ws42/tree/demo?depth=2"
        );
        assert_eq!(
            tree_url(&m, "/demo", 1, Some(true)),
            "http://localhost:8080/api/project/ws42/tree/demo?depth=1&includeFiles=true"
        );
    }

    #[test]
    fn test_search_url_with_path_and_params() {
        let m = machine();
        let expr = QueryExpression::new().with_path("/demo").with_name("foo");
        assert_eq!(
            search_url(&m, &expr),
            "http://localhost:8080/api/project/ws42/search/demo?name=foo"
        );
    }

    #[test]
    fn test_search_url_without_path_ends_in_slash() {
        let m = machine();
        let expr = QueryExpression::new();
        assert_eq!(
            search_url(&m, &expr),
            "http://localhost:8080/api/project/ws42/search/"
        );
    }

    #[test]
    fn test_plus_in_path_is_encoded() {
        let m = machine();
        assert_eq!(
            project_url(&m, "/c++"),
            "http://localhost:8080/api/project/ws42/c%2B%2B"
        );
    }

    #[test]
    fn test_import_path() {
        assert_eq!(import_path("ws42", "demo"), "/project/ws42/import/demo");
    }

    struct RecordingBus {
        fail_send: bool,
        sent: Mutex<Vec<Message>>,
    }

    #[async_trait]
    impl MessageBus for RecordingBus {
        async fn send(&self, message: Message) -> crate::error::Result<()> {
            self.sent.lock().await.push(message);
            if self.fail_send {
                Err(ProjectError::Api {
                    status: 500,
                    message: "import failed".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    struct StaticProvider {
        bus: Option<Arc<RecordingBus>>,
    }

    #[async_trait]
    impl BusProvider for StaticProvider {
        async fn message_bus(&self) -> crate::error::Result<Arc<dyn MessageBus>> {
            match &self.bus {
                Some(bus) => Ok(Arc::clone(bus) as Arc<dyn MessageBus>),
                None => Err(ProjectError::BusUnavailable("agent not started".to_string())),
            }
        }
    }

    fn source_storage() -> SourceStorage {
        SourceStorage {
            storage_type: "git".to_string(),
            location: "https://example.com/repo.git".to_string(),
            parameters: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn test_import_sends_envelope_over_bus() {
        let bus = Arc::new(RecordingBus {
            fail_send: false,
            sent: Mutex::new(Vec::new()),
        });
        let client = ProjectServiceClient::new(Arc::new(StaticProvider {
            bus: Some(Arc::clone(&bus)),
        }));

        client
            .import_project(&machine(), "demo", &source_storage())
            .await
            .unwrap();

        let sent = bus.sent.lock().await;
        assert_eq!(sent.len(), 1);
        let message = &sent[0];
        assert_eq!(message.method, BusMethod::Post);
        assert_eq!(message.path, "/project/ws42/import/demo");
        assert_eq!(
            message.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: SourceStorage = serde_json::from_str(message.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, source_storage());
    }

    #[tokio::test]
    async fn test_import_rejects_when_bus_unavailable() {
        let client = ProjectServiceClient::new(Arc::new(StaticProvider { bus: None }));

        let err = client
            .import_project(&machine(), "demo", &source_storage())
            .await
            .unwrap_err();
        assert!(matches!(err, ProjectError::BusUnavailable(_)));
    }

    #[tokio::test]
    async fn test_import_rejects_when_send_fails() {
        let bus = Arc::new(RecordingBus {
            fail_send: true,
            sent: Mutex::new(Vec::new()),
        });
        let client = ProjectServiceClient::new(Arc::new(StaticProvider {
            bus: Some(Arc::clone(&bus)),
        }));

        let err = client
            .import_project(&machine(), "demo", &source_storage())
            .await
            .unwrap_err();
        assert!(matches!(err, ProjectError::Api { status: 500, .. }));
        assert_eq!(bus.sent.lock().await.len(), 1);
    }
}
