//! Probe endpoint and cross-cutting HTTP behaviour: request IDs, CORS, 404s.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get};
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// /health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_ok_with_store_status() {
    let app = common::build_test_app();
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["store_healthy"], true);
}

#[tokio::test]
async fn unknown_path_is_404() {
    let app = common::build_test_app();
    let response = get(app, "/no/such/path").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Request-ID middleware
// ---------------------------------------------------------------------------

#[tokio::test]
async fn every_response_carries_a_fresh_request_id() {
    let first = get(common::build_test_app(), "/health").await;
    let second = get(common::build_test_app(), "/health").await;

    let id_of = |response: &axum::response::Response| -> String {
        let value = response
            .headers()
            .get("x-request-id")
            .expect("x-request-id header missing")
            .to_str()
            .unwrap()
            .to_string();
        // MakeRequestUuid produces hyphenated UUIDs.
        assert_eq!(value.len(), 36);
        value
    };

    assert_ne!(id_of(&first), id_of(&second));
}

// ---------------------------------------------------------------------------
// CORS preflight
// ---------------------------------------------------------------------------

#[tokio::test]
async fn preflight_admits_configured_origin() {
    let app = common::build_test_app();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/projects")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let header = |name: &str| -> String {
        response
            .headers()
            .get(name)
            .unwrap_or_else(|| panic!("missing {name} header"))
            .to_str()
            .unwrap()
            .to_string()
    };

    assert_eq!(header("access-control-allow-origin"), "http://localhost:5173");
    assert_eq!(header("access-control-allow-credentials"), "true");
    assert!(
        header("access-control-allow-methods").contains("POST"),
        "POST must be an allowed method"
    );
}
