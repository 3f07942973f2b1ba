//! HTTP health probe tests against a loopback provider

use axum::{http::StatusCode, routing::get, Router};
use ringout::domain::integration_status::{
    CapabilityLevel, HealthProbe, ProbeError, StatusReporter,
};
use ringout::domain::shared::IntegrationCredentials;
use ringout::infrastructure::provider::HttpHealthProbe;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Start a fake provider and return its address
async fn spawn_provider() -> SocketAddr {
    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/down", get(|| async { StatusCode::SERVICE_UNAVAILABLE }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

/// An address nothing is listening on
async fn closed_port() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

fn credentials() -> IntegrationCredentials {
    IntegrationCredentials::new(
        Some("api-key".to_string()),
        Some("shared-secret".to_string()),
        Some("acct-42".to_string()),
    )
}

#[tokio::test]
async fn test_probe_success() {
    let addr = spawn_provider().await;
    let probe = HttpHealthProbe::new(format!("http://{}/health", addr)).unwrap();

    assert_eq!(probe.probe().await, Ok(200));
}

#[tokio::test]
async fn test_probe_non_success_status() {
    let addr = spawn_provider().await;
    let probe = HttpHealthProbe::new(format!("http://{}/down", addr)).unwrap();

    assert_eq!(probe.probe().await, Err(ProbeError::HttpStatus(503)));
}

#[tokio::test]
async fn test_probe_timeout() {
    let addr = spawn_provider().await;
    let probe =
        HttpHealthProbe::with_timeout(format!("http://{}/slow", addr), Duration::from_millis(100))
            .unwrap();

    assert_eq!(
        probe.probe().await,
        Err(ProbeError::Timeout(Duration::from_millis(100)))
    );
}

#[tokio::test]
async fn test_probe_connection_refused() {
    let addr = closed_port().await;
    let probe = HttpHealthProbe::new(format!("http://{}/health", addr)).unwrap();

    match probe.probe().await {
        Err(ProbeError::Request(message)) => assert!(!message.is_empty()),
        other => panic!("expected request error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_status_reporter_against_live_provider() {
    let addr = spawn_provider().await;
    let probe = HttpHealthProbe::new(format!("http://{}/health", addr)).unwrap();
    let reporter = StatusReporter::new(credentials(), Some(Arc::new(probe)));

    let status = reporter.get_status().await;
    assert!(status.connected);
    assert_eq!(status.capability_level, CapabilityLevel::Full);
}

#[tokio::test]
async fn test_status_reporter_bounds_hung_provider() {
    let addr = spawn_provider().await;
    let probe = HttpHealthProbe::new(format!("http://{}/slow", addr)).unwrap();
    let reporter = StatusReporter::new(credentials(), Some(Arc::new(probe)))
        .with_timeout(Duration::from_millis(100));

    let status = reporter.get_status().await;
    assert!(!status.connected);
    assert_eq!(status.capability_level, CapabilityLevel::Offline);
    assert_eq!(status.message, "Health check timed out after 100ms");
}

#[tokio::test]
async fn test_status_reporter_unreachable_provider() {
    let addr = closed_port().await;
    let probe = HttpHealthProbe::new(format!("http://{}/health", addr)).unwrap();
    let reporter = StatusReporter::new(credentials(), Some(Arc::new(probe)));

    let status = reporter.get_status().await;
    assert!(!status.connected);
    assert_eq!(status.capability_level, CapabilityLevel::Offline);
    assert!(!status.message.is_empty());
}
