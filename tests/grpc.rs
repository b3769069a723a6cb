use std::net::SocketAddr;

use dokploy_provider::generated::diagnostic::Severity;
use dokploy_provider::generated::provider_client::ProviderClient;
use dokploy_provider::generated::{
    ConfigureRequest, GetMetadataRequest, ReadRequest, ValidateResourceConfigRequest,
};
use dokploy_provider::{serve_until, DokployProvider, ServeOptions};
use httpmock::prelude::*;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tonic::transport::Channel;

async fn start() -> (SocketAddr, oneshot::Sender<()>, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        serve_until(DokployProvider::new(), listener, ServeOptions::default(), async {
            let _ = rx.await;
        })
        .await
        .unwrap();
    });
    (addr, tx, handle)
}

async fn connect(addr: SocketAddr) -> ProviderClient<Channel> {
    ProviderClient::connect(format!("http://{}", addr)).await.unwrap()
}

#[tokio::test]
async fn test_metadata_over_grpc() {
    let (addr, shutdown, handle) = start().await;
    let mut client = connect(addr).await;

    let metadata = client
        .get_metadata(GetMetadataRequest {})
        .await
        .unwrap()
        .into_inner();
    assert!(metadata.resources.iter().any(|r| r == "dokploy_application"));
    assert!(metadata.data_sources.iter().any(|d| d == "dokploy_projects"));
    assert!(metadata.server_capabilities.unwrap().plan_destroy);

    shutdown.send(()).unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_invalid_config_comes_back_as_diagnostics() {
    let (addr, shutdown, handle) = start().await;
    let mut client = connect(addr).await;

    let response = client
        .validate_resource_config(ValidateResourceConfigRequest {
            resource_type: "dokploy_port".to_string(),
            config: serde_json::to_vec(&json!({"application_id": "a-1", "protocol": "sctp"}))
                .unwrap(),
        })
        .await
        .unwrap()
        .into_inner();
    assert!(!response.diagnostics.is_empty());
    assert!(response
        .diagnostics
        .iter()
        .all(|d| d.severity == Severity::Error as i32));

    shutdown.send(()).unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_configure_then_read_over_grpc() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/project.one")
                .query_param("projectId", "p-1")
                .header("x-api-key", "grpc-key");
            then.status(200).json_body(json!({
                "projectId": "p-1",
                "name": "web",
                "environments": [{"environmentId": "e-1", "isDefault": true}]
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/project.one")
                .query_param("projectId", "p-2");
            then.status(404)
                .json_body(json!({"message": "Project not found"}));
        })
        .await;

    let (addr, shutdown, handle) = start().await;
    let mut client = connect(addr).await;

    let configured = client
        .configure(ConfigureRequest {
            config: serde_json::to_vec(&json!({"host": server.base_url(), "api_key": "grpc-key"}))
                .unwrap(),
        })
        .await
        .unwrap()
        .into_inner();
    assert!(configured.diagnostics.is_empty());

    let read = client
        .read(ReadRequest {
            resource_type: "dokploy_project".to_string(),
            current_state: serde_json::to_vec(&json!({"id": "p-1", "name": "old"})).unwrap(),
        })
        .await
        .unwrap()
        .into_inner();
    assert!(read.diagnostics.is_empty());
    let state: serde_json::Value = serde_json::from_slice(&read.state).unwrap();
    assert_eq!(state["name"], "web");
    assert_eq!(state["default_environment_id"], "e-1");

    let gone = client
        .read(ReadRequest {
            resource_type: "dokploy_project".to_string(),
            current_state: serde_json::to_vec(&json!({"id": "p-2"})).unwrap(),
        })
        .await
        .unwrap()
        .into_inner();
    assert!(gone.state.is_empty());

    shutdown.send(()).unwrap();
    handle.await.unwrap();
}
