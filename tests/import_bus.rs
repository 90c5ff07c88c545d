//! Import bridge over a loopback WebSocket agent bus.

use std::sync::Arc;

use axum::extract::ws::{Message as WsFrame, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use projectlib::{
    BusProvider, DevMachine, ProjectError, ProjectServiceClient, SourceStorage, WsAgentBus,
};

async fn ws_route(ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(agent_bus)
}

/// Replies 200 for import paths, 500 for paths ending in "/fail".
async fn agent_bus(mut socket: WebSocket) {
    while let Some(Ok(frame)) = socket.recv().await {
        let WsFrame::Text(text) = frame else { continue };
        let message: serde_json::Value = serde_json::from_str(&text).unwrap();
        let path = message["path"].as_str().unwrap_or_default();

        let code = if path.ends_with("/fail") {
            500
        } else if path.contains("/import/") {
            200
        } else {
            404
        };
        let reply = serde_json::json!({ "uuid": message["uuid"], "code": code });
        if socket.send(WsFrame::Text(reply.to_string())).await.is_err() {
            break;
        }
    }
}

async fn spawn_bus() -> String {
    let app = Router::new().route("/wsagent", get(ws_route));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("ws://{}/wsagent", addr)
}

fn machine() -> DevMachine {
    DevMachine::new("ws42", "http://localhost:8080/api")
}

fn git_source() -> SourceStorage {
    SourceStorage {
        storage_type: "git".to_string(),
        location: "https://example.com/repo.git".to_string(),
        parameters: Default::default(),
    }
}

#[tokio::test]
async fn test_import_resolves_over_ws_bus() {
    let url = spawn_bus().await;
    let client = ProjectServiceClient::new(Arc::new(WsAgentBus::new(url)));

    client
        .import_project(&machine(), "demo", &git_source())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_import_rejects_on_error_reply() {
    let url = spawn_bus().await;
    let client = ProjectServiceClient::new(Arc::new(WsAgentBus::new(url)));

    let err = client
        .import_project(&machine(), "fail", &git_source())
        .await
        .unwrap_err();
    assert!(matches!(err, ProjectError::Api { status: 500, .. }));
}

#[tokio::test]
async fn test_import_rejects_when_connect_fails() {
    // Nothing listens on this port.
    let client = ProjectServiceClient::new(Arc::new(WsAgentBus::new("ws://127.0.0.1:1/wsagent")));

    let err = client
        .import_project(&machine(), "demo", &git_source())
        .await
        .unwrap_err();
    assert!(matches!(err, ProjectError::BusUnavailable(_)));
}

#[tokio::test]
async fn test_channel_is_reused_across_imports() {
    let url = spawn_bus().await;
    let bus = Arc::new(WsAgentBus::new(url));
    let client = ProjectServiceClient::new(Arc::clone(&bus) as Arc<dyn BusProvider>);

    for name in ["one", "two", "three"] {
        client
            .import_project(&machine(), name, &git_source())
            .await
            .unwrap();
    }
}
