//! HTTP client wrapper for workspace agent requests.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use tracing::debug;

use crate::error::{ProjectError, Result};

/// The JSON mime type, attached as `Accept` when a JSON response is decoded
/// and as `Content-Type` when a JSON body is sent.
pub const APPLICATION_JSON: &str = "application/json";

/// Request body variants understood by the agent.
#[derive(Debug)]
pub(crate) enum RequestBody {
    /// No body.
    Empty,
    /// Pre-serialized JSON, sent with `Content-Type: application/json`.
    Json(String),
    /// Raw file content, sent without a content type.
    Raw(String),
}

/// HTTP client for making requests to a workspace agent.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Create a new HTTP client with a proxy.
    ///
    /// # Arguments
    /// * `proxy` - Proxy URL (e.g., "http://proxy:8080" or "socks5://proxy:1080")
    pub fn with_proxy(proxy: &str) -> Result<Self> {
        let proxy = reqwest::Proxy::all(proxy)?;
        let client = Client::builder().proxy(proxy).build()?;

        Ok(Self { client })
    }

    /// Issue a single request and return the response body as text.
    ///
    /// Non-2xx statuses become [`ProjectError::Api`] carrying the status and
    /// the response body unchanged. No retries, no status-specific handling.
    pub(crate) async fn request(
        &self,
        method: Method,
        url: &str,
        body: RequestBody,
        accept_json: bool,
    ) -> Result<String> {
        let mut request = self.client.request(method.clone(), url);
        if accept_json {
            request = request.header(ACCEPT, APPLICATION_JSON);
        }
        request = match body {
            RequestBody::Empty => request,
            RequestBody::Json(json) => request.header(CONTENT_TYPE, APPLICATION_JSON).body(json),
            RequestBody::Raw(data) => request.body(data),
        };

        debug!(%method, %url, "sending request");
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(%method, %url, status = status.as_u16(), bytes = text.len(), "received response");

        if !status.is_success() {
            return Err(ProjectError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        Ok(text)
    }

    /// GET expecting a JSON response.
    pub(crate) async fn get_json(&self, url: &str) -> Result<String> {
        self.request(Method::GET, url, RequestBody::Empty, true).await
    }

    /// GET expecting a raw string response.
    pub(crate) async fn get_raw(&self, url: &str) -> Result<String> {
        self.request(Method::GET, url, RequestBody::Empty, false).await
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
