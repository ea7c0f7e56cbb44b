//! Username endpoints: format validation, availability and claim.
//!
//! Validation and availability are public so they can run before sign-up
//! completes. Claiming requires an authenticated identity.

use axum::extract::State;
use presently_core::availability::{check_once, Availability};
use presently_core::error::CoreError;
use presently_core::onboarding::OnboardingProgress;
use presently_core::username::{normalize_username, validate_username, UsernameCheck, UsernameRejection};
use presently_core::types::DbId;
use presently_db::models::user::User;
use presently_db::repositories::UserRepo;
use presently_db::{is_unique_violation, DbPool, UQ_USERS_USERNAME};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::{Json, Query};
use crate::handlers::onboarding::{current_progress, sync_progress};
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// `?username=` query. A missing parameter is treated as empty input.
#[derive(Debug, Deserialize)]
pub struct UsernameQuery {
    #[serde(default)]
    pub username: String,
}

/// Result of the pure format check.
#[derive(Debug, Serialize)]
pub struct UsernameValidation {
    pub username: String,
    pub valid: bool,
    pub reason: Option<UsernameRejection>,
    pub message: Option<String>,
}

/// Result of an availability check.
#[derive(Debug, Serialize)]
pub struct UsernameAvailability {
    pub username: String,
    pub available: bool,
    /// `available`, `taken` or `invalid`.
    pub status: &'static str,
    pub reason: Option<UsernameRejection>,
}

/// Request body for `POST /usernames/claim`.
#[derive(Debug, Deserialize)]
pub struct ClaimUsername {
    pub username: String,
}

/// Successful claim.
#[derive(Debug, Serialize)]
pub struct ClaimedUsername {
    pub username: String,
    pub onboarding: OnboardingProgress,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/usernames/validate?username=
///
/// Pure format validation with the active policy. Never touches the database.
pub async fn validate(
    State(state): State<AppState>,
    Query(query): Query<UsernameQuery>,
) -> Json<DataResponse<UsernameValidation>> {
    let policy = &state.config.username_policy;
    let check = UsernameCheck::evaluate(&query.username, policy);

    Json(DataResponse {
        data: UsernameValidation {
            username: normalize_username(&query.username),
            valid: check.valid,
            reason: check.reason,
            message: check.reason.map(|r| r.message(policy)),
        },
    })
}

/// GET /api/v1/usernames/availability?username=
///
/// Invalid input is answered without a lookup. A failed lookup is reported
/// as a generic internal error; backend details never reach the caller.
pub async fn check_availability(
    State(state): State<AppState>,
    Query(query): Query<UsernameQuery>,
) -> AppResult<Json<DataResponse<UsernameAvailability>>> {
    let policy = &state.config.username_policy;
    let availability = check_once(state.username_lookup.as_ref(), policy, &query.username).await;

    let (status, reason) = match availability {
        Availability::Available => ("available", None),
        Availability::Taken => ("taken", None),
        Availability::Invalid(reason) => ("invalid", Some(reason)),
        Availability::Indeterminate => {
            return Err(AppError::Core(CoreError::Internal(
                "Username availability could not be determined".into(),
            )));
        }
    };

    Ok(Json(DataResponse {
        data: UsernameAvailability {
            username: normalize_username(&query.username),
            available: availability.is_available() == Some(true),
            status,
            reason,
        },
    }))
}

/// POST /api/v1/usernames/claim
///
/// Claim a username for the caller:
///
/// 1. re-validate the format with the active policy
/// 2. normalize
/// 3. succeed without writing if the caller already owns it
/// 4. reject with 409 if someone else owns it
/// 5. write it; losing a concurrent race to the unique index is also a 409
/// 6. re-sync onboarding progress
///
/// A caller who already has a different username gives it up.
pub async fn claim(
    CurrentUser { auth, user }: CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<ClaimUsername>,
) -> AppResult<Json<DataResponse<ClaimedUsername>>> {
    let policy = &state.config.username_policy;
    validate_username(&input.username, policy).map_err(|r| r.into_core_error(policy))?;
    let username = normalize_username(&input.username);

    if user.username.as_deref() == Some(username.as_str()) {
        tracing::debug!(user_id = user.id, username = %username, "Username already owned by caller");
        let onboarding = current_progress(&state.pool, &user, auth.is_admin()).await?;
        return Ok(Json(DataResponse {
            data: ClaimedUsername {
                username,
                onboarding,
            },
        }));
    }

    let owner = UserRepo::find_username_owner(&state.pool, &username).await?;
    if owner.is_some_and(|owner_id| owner_id != user.id) {
        return Err(username_taken());
    }

    let updated = write_claim(&state.pool, user.id, &username).await?;

    let (updated, onboarding) = sync_progress(&state.pool, &updated, auth.is_admin()).await?;

    tracing::info!(
        user_id = updated.id,
        username = %username,
        previous = ?user.username,
        "Username claimed",
    );

    Ok(Json(DataResponse {
        data: ClaimedUsername {
            username,
            onboarding,
        },
    }))
}

/// Write a normalized username onto a live user.
///
/// The unique index on `users.username` is the final arbiter: a write that
/// collides with another owner becomes a 409, even when the earlier owner
/// check passed. A soft-deleted user is refused with 403.
pub async fn write_claim(pool: &DbPool, user_id: DbId, username: &str) -> AppResult<User> {
    match UserRepo::set_username(pool, user_id, username).await {
        Ok(Some(updated)) => Ok(updated),
        Ok(None) => Err(AppError::Core(CoreError::Forbidden(
            "Account has been deleted".into(),
        ))),
        Err(e) if is_unique_violation(&e, UQ_USERS_USERNAME) => {
            tracing::info!(user_id, username, "Lost username claim race");
            Err(username_taken())
        }
        Err(e) => Err(e.into()),
    }
}

fn username_taken() -> AppError {
    AppError::Core(CoreError::Conflict("Username is already taken".into()))
}
