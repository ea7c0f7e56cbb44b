//! HTTP-level integration tests for the username endpoints: validation,
//! availability and the claim executor.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;
use axum::http::StatusCode;
use common::{
    body_json, build_test_app, build_test_app_with_lookup, delete_auth, get, get_auth,
    post_json, post_json_auth, user_token,
};
use presently_core::availability::AvailabilityLookup;
use presently_api::error::AppError;
use presently_api::handlers::username::write_claim;
use presently_core::error::CoreError;
use presently_db::repositories::UserRepo;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

/// Lookup whose backend is always down.
struct UnreachableLookup;

#[async_trait]
impl AvailabilityLookup for UnreachableLookup {
    async fn is_taken(&self, _normalized: &str) -> Result<bool, CoreError> {
        Err(CoreError::Internal("connection refused by 10.0.0.5".into()))
    }
}

async fn claim_status(app: axum::Router, token: &str, username: &str) -> StatusCode {
    post_json_auth(
        app,
        "/api/v1/usernames/claim",
        token,
        json!({ "username": username }),
    )
    .await
    .status()
}

async fn availability(app: axum::Router, username: &str) -> serde_json::Value {
    let response = get(app, &format!("/api/v1/usernames/availability?username={username}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn validate_reports_reason_code(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app.clone(), "/api/v1/usernames/validate?username=john__doe").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["valid"], false);
    assert_eq!(json["data"]["reason"], "consecutive_separators");
    assert!(json["data"]["message"].is_string());

    let json = body_json(get(app, "/api/v1/usernames/validate?username=john_doe").await).await;
    assert_eq!(json["data"]["valid"], true);
    assert!(json["data"]["reason"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn validate_without_parameter_is_empty(pool: PgPool) {
    let app = build_test_app(pool);
    let json = body_json(get(app, "/api/v1/usernames/validate").await).await;
    assert_eq!(json["data"]["reason"], "empty");
}

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn availability_reflects_claims(pool: PgPool) {
    let app = build_test_app(pool);

    let data = availability(app.clone(), "john_doe").await;
    assert_eq!(data["status"], "available");
    assert_eq!(data["available"], true);

    assert_eq!(claim_status(app.clone(), &user_token(), "john_doe").await, StatusCode::OK);

    // Case differences do not matter.
    let data = availability(app, "John_Doe").await;
    assert_eq!(data["status"], "taken");
    assert_eq!(data["available"], false);
    assert_eq!(data["username"], "john_doe");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn availability_of_invalid_input_reports_reason(pool: PgPool) {
    let app = build_test_app(pool);

    let data = availability(app.clone(), "1234").await;
    assert_eq!(data["status"], "invalid");
    assert_eq!(data["reason"], "must_start_with_letter");
    assert_eq!(data["available"], false);

    let data = availability(app, "ADMIN").await;
    assert_eq!(data["reason"], "reserved");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn availability_failure_hides_backend_details(pool: PgPool) {
    let app = build_test_app_with_lookup(pool, Arc::new(UnreachableLookup));

    let response = get(app, "/api/v1/usernames/availability?username=john_doe").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
    assert!(!json.to_string().contains("10.0.0.5"));
}

// ---------------------------------------------------------------------------
// Claim
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn claim_requires_authentication(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(app.clone(), "/api/v1/usernames/claim", json!({ "username": "john_doe" })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");

    let status = claim_status(app, "not-a-jwt", "john_doe").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn claim_revalidates_format(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/usernames/claim",
        &user_token(),
        json!({ "username": "admin" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["field"], "username");
    assert_eq!(json["reason"], "reserved");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn claim_stores_normalized_and_advances_onboarding(pool: PgPool) {
    let app = build_test_app(pool);
    let token = user_token();

    let response = post_json_auth(
        app.clone(),
        "/api/v1/usernames/claim",
        &token,
        json!({ "username": "Gift_Giver" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "gift_giver");
    // Name is still missing, so the profile step comes first.
    assert_eq!(json["data"]["onboarding"]["next_step"], "profile");
    assert_eq!(json["data"]["onboarding"]["completion_percentage"], 20);

    let me = body_json(get_auth(app, "/api/v1/me", &token).await).await;
    assert_eq!(me["data"]["user"]["username"], "gift_giver");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reclaiming_owned_username_is_a_no_op(pool: PgPool) {
    let app = build_test_app(pool);
    let token = user_token();

    assert_eq!(claim_status(app.clone(), &token, "gift_giver").await, StatusCode::OK);
    assert_eq!(claim_status(app.clone(), &token, "GIFT_GIVER").await, StatusCode::OK);
    assert_eq!(claim_status(app, &token, "gift_giver").await, StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn claim_of_taken_username_conflicts(pool: PgPool) {
    let app = build_test_app(pool);

    assert_eq!(claim_status(app.clone(), &user_token(), "gift_giver").await, StatusCode::OK);

    let response = post_json_auth(
        app,
        "/api/v1/usernames/claim",
        &user_token(),
        json!({ "username": "Gift_Giver" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_claims_have_exactly_one_winner(pool: PgPool) {
    let app = build_test_app(pool);
    let (alice, bob) = (user_token(), user_token());

    let (a, b) = tokio::join!(
        claim_status(app.clone(), &alice, "racer"),
        claim_status(app.clone(), &bob, "racer"),
    );

    let mut statuses = [a, b];
    statuses.sort_by_key(|s| s.as_u16());
    assert_eq!(statuses, [StatusCode::OK, StatusCode::CONFLICT]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn write_collision_on_unique_index_is_a_conflict(pool: PgPool) {
    // The owner check in the handler is bypassed; only the index stands in
    // the way of bob's write.
    let alice = UserRepo::get_or_create(&pool, Uuid::new_v4(), None).await.unwrap();
    let bob = UserRepo::get_or_create(&pool, Uuid::new_v4(), None).await.unwrap();
    UserRepo::set_username(&pool, alice.id, "racer").await.unwrap();

    let result = write_claim(&pool, bob.id, "racer").await;
    assert_matches!(result, Err(AppError::Core(CoreError::Conflict(_))));

    let bob = UserRepo::get_or_create(&pool, bob.auth_id, None).await.unwrap();
    assert!(bob.username.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn write_onto_deleted_account_is_forbidden(pool: PgPool) {
    let user = UserRepo::get_or_create(&pool, Uuid::new_v4(), None).await.unwrap();
    UserRepo::soft_delete(&pool, user.id).await.unwrap();

    let result = write_claim(&pool, user.id, "ghost_user").await;
    assert_matches!(result, Err(AppError::Core(CoreError::Forbidden(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn claim_without_username_field_is_a_json_400(pool: PgPool) {
    let app = build_test_app(pool);

    let response =
        post_json_auth(app, "/api/v1/usernames/claim", &user_token(), json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].as_str().is_some_and(|e| e.contains("username")));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn claiming_a_new_username_releases_the_old_one(pool: PgPool) {
    let app = build_test_app(pool);
    let token = user_token();

    assert_eq!(claim_status(app.clone(), &token, "first_pick").await, StatusCode::OK);
    assert_eq!(claim_status(app.clone(), &token, "second_pick").await, StatusCode::OK);

    assert_eq!(availability(app.clone(), "first_pick").await["status"], "available");
    assert_eq!(availability(app.clone(), "second_pick").await["status"], "taken");

    // Someone else can now take the released name.
    assert_eq!(claim_status(app, &user_token(), "first_pick").await, StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleted_account_keeps_username_reserved(pool: PgPool) {
    let app = build_test_app(pool);
    let token = user_token();

    assert_eq!(claim_status(app.clone(), &token, "leaver").await, StatusCode::OK);

    let response = delete_auth(app.clone(), "/api/v1/me", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(availability(app.clone(), "leaver").await["status"], "taken");
    assert_eq!(claim_status(app.clone(), &user_token(), "leaver").await, StatusCode::CONFLICT);

    let response = get_auth(app, "/api/v1/me", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
