//! Assembles the HTTP surface: the route tree plus every middleware layer.
//!
//! Both `main.rs` and the integration-test harness call [`build_app_router`],
//! so a request in a test traverses the same request-id, tracing, timeout and
//! panic-recovery layers it would in production.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

/// Header carrying the per-request UUID, set on ingress and echoed on the
/// response so a client-reported failure can be matched to server logs.
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the complete application [`Router`].
///
/// Health probes live at the root (`/health` is hit by infrastructure that
/// knows nothing about API versions); everything else is nested under
/// `/api/v1`. Layer registration order matters: axum wraps bottom-up, so the
/// first `.layer()` call below ends up innermost. Reading outermost-in, a
/// request passes CORS, gets a request ID, is traced, then runs under the
/// timeout with panic recovery closest to the handler.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        // Innermost: a panicking handler becomes a 500 instead of a dropped
        // connection, and the trace layer above still sees the response.
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        // Echo the request ID back on the response. Set (below, outer) must
        // have assigned it before the trace span opens.
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(cors_layer(config))
        .with_state(state)
}

/// CORS policy from the configured origin allowlist.
///
/// An unparseable origin panics here, during startup, rather than silently
/// admitting or refusing traffic later.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
