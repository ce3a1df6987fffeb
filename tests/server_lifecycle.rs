//! Lifecycle behavior against a live listener: typed listen failure,
//! graceful stop, and dispatch over real connections.
use std::time::Duration;

use plinth::server::{RoutingServer, ServerError};

#[tokio::test]
async fn start_serves_and_stops_within_deadline() {
    let mut server = RoutingServer::new("127.0.0.1:0");
    server.register("/health", || async { "ok" }).unwrap();
    server
        .register_with_method("POST", "/orders", || async { "created" })
        .unwrap();

    let handle = server.start().await.unwrap();
    let addr = handle.local_addr();

    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");

    let response = client
        .post(format!("http://{addr}/orders"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client
        .get(format!("http://{addr}/orders"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 405);

    handle.stop(Duration::from_secs(5)).await.unwrap();

    // The listener is gone after stop.
    assert!(
        client
            .get(format!("http://{addr}/health"))
            .send()
            .await
            .is_err()
    );
}

#[tokio::test]
async fn bind_conflict_is_a_typed_listen_error() {
    let mut first = RoutingServer::new("127.0.0.1:0");
    first.register("/health", || async { "ok" }).unwrap();
    let handle = first.start().await.unwrap();
    let addr = handle.local_addr();

    let mut second = RoutingServer::new(addr.to_string());
    second.register("/health", || async { "ok" }).unwrap();
    let err = second.start().await.unwrap_err();
    assert!(matches!(err, ServerError::Listen { .. }));

    handle.stop(Duration::from_secs(5)).await.unwrap();
}

#[tokio::test]
async fn start_with_no_bindings_still_serves_not_found() {
    let server = RoutingServer::new("127.0.0.1:0");
    let handle = server.start().await.unwrap();
    let addr = handle.local_addr();

    let response = reqwest::get(format!("http://{addr}/anything"))
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    handle.stop(Duration::from_secs(5)).await.unwrap();
}
