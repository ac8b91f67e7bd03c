#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use docforge_api::auth::Claims;
use docforge_api::config::{AuthConfig, GenAiConfig, ImageSearchConfig, ServerConfig};
use docforge_api::router::build_app_router;
use docforge_api::state::AppState;
use docforge_core::chart::{ChartData, ChartSeries};
use docforge_core::project::DocumentKind;
use docforge_export::fetch::ImageFetcher;
use docforge_genai::{GenAiError, Generator, ImageSearch};
use docforge_store::MemoryStore;

/// Secret used to sign test tokens.
pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Image URL returned by the stub search. Points at a local port with no
/// listener so export tests exercise the placeholder path without network
/// access.
pub const STUB_IMAGE_URL: &str = "http://127.0.0.1:9/stock-photo.jpg";

// ---------------------------------------------------------------------------
// Generation stubs
// ---------------------------------------------------------------------------

/// Deterministic generator so tests can assert on persisted values.
pub struct StubGenerator;

#[async_trait]
impl Generator for StubGenerator {
    async fn generate_outline(
        &self,
        _topic: &str,
        _kind: DocumentKind,
    ) -> Result<Vec<String>, GenAiError> {
        Ok(vec!["Alpha".to_string(), "Beta".to_string()])
    }

    async fn generate_content(
        &self,
        _topic: &str,
        item_title: &str,
        _kind: DocumentKind,
    ) -> Result<String, GenAiError> {
        Ok(format!(
            "Generated **{item_title}** body.\n- first point\n- second point"
        ))
    }

    async fn refine_content(
        &self,
        text: &str,
        instruction: &str,
    ) -> Result<String, GenAiError> {
        Ok(format!("{text} ({instruction})"))
    }

    async fn generate_chart(
        &self,
        _topic: &str,
        _item_title: &str,
    ) -> Result<ChartData, GenAiError> {
        Ok(ChartData {
            kind: "bar".to_string(),
            title: "Stub Chart".to_string(),
            categories: vec!["A".to_string(), "B".to_string()],
            series: vec![ChartSeries {
                name: "S1".to_string(),
                values: vec![1.0, 2.0],
            }],
        })
    }

    async fn generate_image_query(
        &self,
        _topic: &str,
        item_title: &str,
    ) -> Result<String, GenAiError> {
        Ok(format!("stock photo {item_title}"))
    }
}

/// Generator whose every call fails, for exercising fallbacks.
pub struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    async fn generate_outline(
        &self,
        _topic: &str,
        _kind: DocumentKind,
    ) -> Result<Vec<String>, GenAiError> {
        Err(GenAiError::Malformed("stub outage".to_string()))
    }

    async fn generate_content(
        &self,
        _topic: &str,
        _item_title: &str,
        _kind: DocumentKind,
    ) -> Result<String, GenAiError> {
        Err(GenAiError::Malformed("stub outage".to_string()))
    }

    async fn refine_content(
        &self,
        _text: &str,
        _instruction: &str,
    ) -> Result<String, GenAiError> {
        Err(GenAiError::Malformed("stub outage".to_string()))
    }

    async fn generate_chart(
        &self,
        _topic: &str,
        _item_title: &str,
    ) -> Result<ChartData, GenAiError> {
        Err(GenAiError::Malformed("stub outage".to_string()))
    }

    async fn generate_image_query(
        &self,
        _topic: &str,
        _item_title: &str,
    ) -> Result<String, GenAiError> {
        Err(GenAiError::Malformed("stub outage".to_string()))
    }
}

/// Image search stub returning a fixed result.
pub struct StubImageSearch {
    pub url: Option<String>,
}

#[async_trait]
impl ImageSearch for StubImageSearch {
    async fn search(&self, _query: &str) -> Result<Option<String>, GenAiError> {
        Ok(self.url.clone())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout. `auth_optional` controls whether
/// requests without a token run as the dev user.
pub fn test_config(auth_optional: bool) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        auth: AuthConfig {
            jwt_secret: TEST_JWT_SECRET.to_string(),
            auth_optional,
        },
        genai: GenAiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: String::new(),
            model: "stub".to_string(),
        },
        image_search: ImageSearchConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: String::new(),
        },
        export_image_timeout_secs: 2,
    }
}

/// Build the application router over an in-memory store and the given
/// stubs, using the same middleware stack as production.
pub fn build_app_with(
    auth_optional: bool,
    generator: Arc<dyn Generator>,
    image_search: Arc<dyn ImageSearch>,
) -> Router {
    let config = test_config(auth_optional);
    let state = AppState {
        store: Arc::new(MemoryStore::new()),
        generator,
        image_search,
        image_fetcher: Arc::new(ImageFetcher::new(Duration::from_secs(
            config.export_image_timeout_secs,
        ))),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Default test app: stub generation, stub image search, no auth required.
pub fn build_test_app() -> Router {
    build_app_with(
        true,
        Arc::new(StubGenerator),
        Arc::new(StubImageSearch {
            url: Some(STUB_IMAGE_URL.to_string()),
        }),
    )
}

/// App whose generation calls all fail, for fallback tests.
pub fn build_failing_app() -> Router {
    build_app_with(
        true,
        Arc::new(FailingGenerator),
        Arc::new(StubImageSearch { url: None }),
    )
}

/// App that requires a Bearer token on every request.
pub fn build_jwt_app() -> Router {
    build_app_with(
        false,
        Arc::new(StubGenerator),
        Arc::new(StubImageSearch {
            url: Some(STUB_IMAGE_URL.to_string()),
        }),
    )
}

/// Sign a token for `sub` with the test secret, valid for an hour.
pub fn mint_token(sub: &str) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        email: Some(format!("{sub}@test.com")),
        exp: chrono::Utc::now().timestamp() + 3600,
    };
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("token encoding should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request to the app.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET request with a Bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body and a Bearer token.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a PUT request with a JSON body.
pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a PATCH request with a JSON body.
pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::PATCH)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a DELETE request to the app.
pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect the response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

/// Collect the raw response body bytes.
pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes()
        .to_vec()
}
