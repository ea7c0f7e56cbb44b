//! Public profile lookup.

use axum::extract::State;
use presently_core::error::CoreError;
use presently_core::preferences::PreferenceCategory;
use presently_core::profile::display_name;
use presently_core::types::DbId;
use presently_core::username::normalize_username;
use presently_db::models::user::PublicProfile;
use presently_db::repositories::{PreferenceRepo, UserRepo};
use presently_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path};
use crate::response::DataResponse;
use crate::state::AppState;

async fn selected_names(
    pool: &DbPool,
    category: PreferenceCategory,
    user_id: DbId,
) -> AppResult<Vec<String>> {
    let items = PreferenceRepo::list_for_user(pool, category, user_id).await?;
    Ok(items.into_iter().map(|item| item.name).collect())
}

/// GET /api/v1/profiles/{username}
///
/// Soft-deleted accounts are reported as not found.
pub async fn get_public_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<DataResponse<PublicProfile>>> {
    let normalized = normalize_username(&username);

    let user = UserRepo::find_by_username(&state.pool, &normalized)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Profile",
                key: normalized.clone(),
            })
        })?;

    let profile = PublicProfile {
        username: user.username.clone().unwrap_or(normalized),
        display_name: user
            .first_name
            .as_deref()
            .map(|first| display_name(first, user.last_name.as_deref())),
        bio: user.bio.clone(),
        avatar_url: user.avatar_url.clone(),
        traits: selected_names(&state.pool, PreferenceCategory::Traits, user.id).await?,
        brands: selected_names(&state.pool, PreferenceCategory::Brands, user.id).await?,
        colors: selected_names(&state.pool, PreferenceCategory::Colors, user.id).await?,
        member_since: user.created_at,
    };

    Ok(Json(DataResponse { data: profile }))
}
