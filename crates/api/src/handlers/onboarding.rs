//! Onboarding state machine endpoint and the progress helpers shared by
//! every mutating onboarding handler.

use axum::extract::State;
use presently_core::error::CoreError;
use presently_core::onboarding::{resolve_redirect, OnboardingFlags, OnboardingProgress, OnboardingStep};
use presently_db::models::user::User;
use presently_db::repositories::{PreferenceRepo, UserRepo};
use presently_db::DbPool;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::{Json, Query};
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /me/onboarding`.
#[derive(Debug, Deserialize)]
pub struct OnboardingQuery {
    /// The step the client is about to show.
    pub step: Option<OnboardingStep>,
}

/// Response payload for `GET /me/onboarding`.
#[derive(Debug, Serialize)]
pub struct OnboardingStatus {
    #[serde(flatten)]
    pub progress: OnboardingProgress,
    /// Route to navigate to instead of the requested step, if it is wrong.
    pub redirect: Option<&'static str>,
}

/// Derive flags from the user row and its preference links.
pub(crate) async fn onboarding_flags(
    pool: &DbPool,
    user: &User,
    is_admin: bool,
) -> AppResult<OnboardingFlags> {
    let preferences = PreferenceRepo::flags_for_user(pool, user.id).await?;
    Ok(user.onboarding_flags(&preferences, is_admin))
}

/// Current progress, computed without writing anything.
pub(crate) async fn current_progress(
    pool: &DbPool,
    user: &User,
    is_admin: bool,
) -> AppResult<OnboardingProgress> {
    let flags = onboarding_flags(pool, user, is_admin).await?;
    Ok(OnboardingProgress::from_flags(&flags))
}

/// Recompute progress and persist it on the user row.
pub(crate) async fn sync_progress(
    pool: &DbPool,
    user: &User,
    is_admin: bool,
) -> AppResult<(User, OnboardingProgress)> {
    let progress = current_progress(pool, user, is_admin).await?;

    let updated = UserRepo::sync_onboarding(pool, user.id, &progress)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "User",
                key: user.id.to_string(),
            })
        })?;

    if updated.is_onboarded && !user.is_onboarded {
        tracing::info!(user_id = updated.id, "Onboarding completed");
    }

    Ok((updated, progress))
}

/// GET /api/v1/me/onboarding?step=<step>
///
/// Where the caller stands in onboarding. When `step` is given and is not
/// the step the caller should be on, `redirect` carries the correct route.
pub async fn get_onboarding(
    CurrentUser { auth, user }: CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<OnboardingQuery>,
) -> AppResult<Json<DataResponse<OnboardingStatus>>> {
    let flags = onboarding_flags(&state.pool, &user, auth.is_admin()).await?;
    let progress = OnboardingProgress::from_flags(&flags);
    let redirect = query.step.and_then(|step| resolve_redirect(&flags, step));

    if let Some(route) = redirect {
        tracing::debug!(
            user_id = user.id,
            requested = ?query.step,
            redirect = route,
            "Onboarding step redirect",
        );
    }

    Ok(Json(DataResponse {
        data: OnboardingStatus { progress, redirect },
    }))
}
