//! Router-level and component tests.
//!
//! ## Test Modules
//!
//! - **api_tests**: API root, media types, headers, paging, auth and fallback
//! - **contacts_api_tests**: the contact resource
//! - **installations_api_tests**: production installations and the contact link
//! - **search_api_tests**: derived queries
//! - **error_tests**: error bodies and error mapping
//! - **config_tests**: configuration parsing and validation
//! - **db_tests**: schema and constraints
//! - **health_api_tests**: probes, metrics and version
//!
//! Every suite drives the full router from [`crate::routes::build_router`]
//! against a private in-memory SQLite database.

pub mod contacts_api_tests;
pub mod db_tests;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use crate::{config::AppConfig, routes, state::AppState};

/// One connection that never expires, so the in-memory database lives as long as the pool.
pub(crate) async fn test_pool() -> sqlx::SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    crate::db::init_db(&pool).await.unwrap();
    pool
}

pub(crate) async fn setup_test_app_with(config: AppConfig) -> (Router, AppState) {
    let state = AppState::new(test_pool().await, config);
    (routes::build_router(state.clone()), state)
}

pub(crate) async fn setup_test_app() -> (Router, AppState) {
    setup_test_app_with(AppConfig::default()).await
}

pub(crate) struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn content_type(&self) -> &str {
        self.headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()).unwrap_or_default()
    }
}

pub(crate) async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
    TestResponse { status, headers, body }
}

pub(crate) async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub(crate) async fn send_json(app: &Router, method: Method, uri: &str, body: Value) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub(crate) async fn delete(app: &Router, uri: &str) -> TestResponse {
    send(app, Request::builder().method(Method::DELETE).uri(uri).body(Body::empty()).unwrap()).await
}

/// Creates a contact and returns its self href.
pub(crate) async fn create_contact(app: &Router, name: &str) -> String {
    let res = send_json(
        app,
        Method::POST,
        "/api/contacts",
        serde_json::json!({ "name": name, "zipCode": "0000AA", "city": "Arnhem", "houseNumber": "1" }),
    )
    .await;
    assert_eq!(res.status, StatusCode::CREATED);
    res.body["_links"]["self"]["href"].as_str().unwrap().to_string()
}

/// Creates a production installation and returns its body.
pub(crate) async fn create_installation(app: &Router, body: Value) -> Value {
    let res = send_json(app, Method::POST, "/api/production-installations", body).await;
    assert_eq!(res.status, StatusCode::CREATED, "unexpected body: {}", res.body);
    res.body
}
