#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use presently_api::auth::jwt::{generate_access_token, JwtConfig};
use presently_api::config::ServerConfig;
use presently_api::router::build_app_router;
use presently_api::state::AppState;
use presently_core::availability::AvailabilityLookup;
use presently_core::roles::{ROLE_ADMIN, ROLE_USER};
use presently_core::username::UsernamePolicy;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout and the strict username policy.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        username_policy: UsernamePolicy::STRICT,
        jwt: JwtConfig {
            secret: "test-jwt-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState::new(pool, config.clone());
    build_app_router(state, &config)
}

/// Same as [`build_test_app`] but with a custom availability lookup.
pub fn build_test_app_with_lookup(pool: PgPool, lookup: Arc<dyn AvailabilityLookup>) -> Router {
    let config = test_config();
    let mut state = AppState::new(pool, config.clone());
    state.username_lookup = lookup;
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// A valid access token for a fresh user identity.
pub fn user_token() -> String {
    token_for(Uuid::new_v4(), ROLE_USER)
}

/// A valid access token for a fresh admin identity.
pub fn admin_token() -> String {
    token_for(Uuid::new_v4(), ROLE_ADMIN)
}

pub fn token_for(identity: Uuid, role: &str) -> String {
    let email = format!("{identity}@example.com");
    generate_access_token(identity, Some(&email), role, &test_config().jwt)
        .expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// IDs of the active catalog entries for `category`, in listing order.
pub async fn catalog_ids(app: Router, category: &str) -> Vec<i64> {
    let response = get(app, &format!("/api/v1/catalog/{category}")).await;
    let json = body_json(response).await;
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}

/// Drive a user through the profile step with a simple name.
pub async fn complete_profile(app: Router, token: &str, first_name: &str, last_name: &str) {
    let response = put_json_auth(
        app,
        "/api/v1/me/profile",
        token,
        serde_json::json!({ "first_name": first_name, "last_name": last_name }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
}

/// Claim `username` and assert success.
pub async fn claim(app: Router, token: &str, username: &str) {
    let response = post_json_auth(
        app,
        "/api/v1/usernames/claim",
        token,
        serde_json::json!({ "username": username }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
}
