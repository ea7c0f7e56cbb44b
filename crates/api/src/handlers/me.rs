//! Handlers for the caller's own account (`/me`).

use axum::extract::State;
use axum::http::StatusCode;
use presently_core::error::CoreError;
use presently_core::onboarding::OnboardingProgress;
use presently_core::profile::{validate_profile, ProfileInput};
use presently_db::models::user::{UpdateProfile, UserResponse};
use presently_db::repositories::UserRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::Json;
use crate::handlers::onboarding::{current_progress, sync_progress};
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// The caller's record plus where they stand in onboarding.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserResponse,
    pub onboarding: OnboardingProgress,
}

/// GET /api/v1/me
///
/// Returns the caller's record, creating it on first sight.
pub async fn get_me(
    CurrentUser { auth, user }: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MeResponse>>> {
    let onboarding = current_progress(&state.pool, &user, auth.is_admin()).await?;

    Ok(Json(DataResponse {
        data: MeResponse {
            user: UserResponse::from(&user),
            onboarding,
        },
    }))
}

/// PUT /api/v1/me/profile
///
/// Complete or edit the profile step. Omitted optional fields are cleared.
pub async fn update_profile(
    CurrentUser { auth, user }: CurrentUser,
    State(state): State<AppState>,
    Json(input): Json<ProfileInput>,
) -> AppResult<Json<DataResponse<MeResponse>>> {
    let today = chrono::Utc::now().date_naive();
    let profile = validate_profile(input, today)?;

    let update = UpdateProfile {
        first_name: profile.first_name,
        last_name: profile.last_name,
        bio: profile.bio,
        avatar_url: profile.avatar_url,
        birthday: profile.birthday,
        phone: profile.phone,
    };

    let updated = UserRepo::update_profile(&state.pool, user.id, &update)
        .await?
        .ok_or_else(account_deleted)?;
    let (updated, onboarding) = sync_progress(&state.pool, &updated, auth.is_admin()).await?;

    tracing::info!(user_id = updated.id, "Profile updated");

    Ok(Json(DataResponse {
        data: MeResponse {
            user: UserResponse::from(&updated),
            onboarding,
        },
    }))
}

/// DELETE /api/v1/me
///
/// Soft-delete the caller's account. The username stays reserved.
pub async fn delete_me(
    CurrentUser { user, .. }: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<StatusCode> {
    if !UserRepo::soft_delete(&state.pool, user.id).await? {
        return Err(account_deleted());
    }

    tracing::info!(user_id = user.id, username = ?user.username, "Account soft-deleted");

    Ok(StatusCode::NO_CONTENT)
}

fn account_deleted() -> AppError {
    AppError::Core(CoreError::Forbidden("Account has been deleted".into()))
}
