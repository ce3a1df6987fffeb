//! Dispatch behavior of the materialized route table, exercised without a
//! listener via `tower::ServiceExt::oneshot`.
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use plinth::server::RoutingServer;
use tower::ServiceExt;

async fn send(router: &Router, method: &str, path: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&bytes).to_string())
}

#[tokio::test]
async fn path_only_binding_matches_every_method() {
    let mut server = RoutingServer::new(":0");
    server.register("/health", || async { "h1" }).unwrap();
    let router = server.into_router();

    for method in ["GET", "POST", "PUT", "DELETE", "PATCH"] {
        let (status, body) = send(&router, method, "/health").await;
        assert_eq!(status, StatusCode::OK, "method {method}");
        assert_eq!(body, "h1", "method {method}");
    }
}

#[tokio::test]
async fn method_scoped_binding_matches_only_its_method() {
    let mut server = RoutingServer::new(":0");
    server
        .register_with_method("POST", "/orders", || async { "h2" })
        .unwrap();
    let router = server.into_router();

    let (status, body) = send(&router, "POST", "/orders").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "h2");

    // No any-method binding exists for the path, so other verbs get the
    // method router's default rejection.
    let (status, _) = send(&router, "GET", "/orders").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn unregistered_path_is_not_found() {
    let mut server = RoutingServer::new(":0");
    server.register("/health", || async { "h1" }).unwrap();
    let router = server.into_router();

    let (status, _) = send(&router, "GET", "/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bootstrap_scenario_dispatches_as_registered() {
    let mut server = RoutingServer::new(":8000");
    server.register("/health", || async { "h1" }).unwrap();
    server
        .register_with_method("POST", "/orders", || async { "h2" })
        .unwrap();
    let router = server.into_router();

    let (status, body) = send(&router, "GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "h1");

    let (status, body) = send(&router, "POST", "/orders").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "h2");

    let (status, _) = send(&router, "GET", "/orders").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn method_scoped_binding_wins_over_any_method_for_its_verb() {
    // Documented precedence: the scoped binding claims its verb, the bare
    // binding serves everything else on the path.
    let mut server = RoutingServer::new(":0");
    server
        .register_with_method("GET", "/a", || async { "scoped" })
        .unwrap();
    server.register("/a", || async { "any" }).unwrap();
    assert_eq!(server.binding_count(), 2);
    let router = server.into_router();

    let (status, body) = send(&router, "GET", "/a").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "scoped");

    for method in ["POST", "PUT", "DELETE"] {
        let (status, body) = send(&router, method, "/a").await;
        assert_eq!(status, StatusCode::OK, "method {method}");
        assert_eq!(body, "any", "method {method}");
    }
}

#[tokio::test]
async fn registration_order_does_not_change_precedence() {
    let mut server = RoutingServer::new(":0");
    server.register("/a", || async { "any" }).unwrap();
    server
        .register_with_method("GET", "/a", || async { "scoped" })
        .unwrap();
    let router = server.into_router();

    let (_, body) = send(&router, "GET", "/a").await;
    assert_eq!(body, "scoped");
    let (_, body) = send(&router, "POST", "/a").await;
    assert_eq!(body, "any");
}

#[tokio::test]
async fn reregistered_key_serves_the_latest_handler() {
    let mut server = RoutingServer::new(":0");
    server.register("/health", || async { "old" }).unwrap();
    server.register("/health", || async { "new" }).unwrap();
    server
        .register_with_method("GET", "/v", || async { "old" })
        .unwrap();
    server
        .register_with_method("get", "/v", || async { "new" })
        .unwrap();
    let router = server.into_router();

    let (_, body) = send(&router, "GET", "/health").await;
    assert_eq!(body, "new");
    let (_, body) = send(&router, "GET", "/v").await;
    assert_eq!(body, "new");
}

#[tokio::test]
async fn distinct_scoped_methods_coexist_on_one_path() {
    let mut server = RoutingServer::new(":0");
    server
        .register_with_method("GET", "/orders", || async { "list" })
        .unwrap();
    server
        .register_with_method("POST", "/orders", || async { "create" })
        .unwrap();
    let router = server.into_router();

    let (_, body) = send(&router, "GET", "/orders").await;
    assert_eq!(body, "list");
    let (_, body) = send(&router, "POST", "/orders").await;
    assert_eq!(body, "create");
}
