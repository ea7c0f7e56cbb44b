//! Handlers for preference catalogs and the caller's selections.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use presently_core::error::CoreError;
use presently_core::onboarding::OnboardingProgress;
use presently_core::preferences::{normalize_selection, validate_catalog_item, PreferenceCategory};
use presently_core::types::DbId;
use presently_db::models::catalog::{CatalogItem, CreateCatalogItem};
use presently_db::repositories::{CatalogRepo, PreferenceRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path};
use crate::handlers::onboarding::sync_progress;
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for replacing a selection.
#[derive(Debug, Deserialize)]
pub struct ReplacePreferences {
    pub ids: Vec<DbId>,
}

/// The caller's selection after a replace, plus updated progress.
#[derive(Debug, Serialize)]
pub struct PreferencesResponse {
    pub items: Vec<CatalogItem>,
    pub onboarding: OnboardingProgress,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// GET /api/v1/catalog/{category}
pub async fn list_catalog(
    State(state): State<AppState>,
    Path(category): Path<PreferenceCategory>,
) -> AppResult<Json<DataResponse<Vec<CatalogItem>>>> {
    let items = CatalogRepo::list_active(&state.pool, category).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/admin/catalog/{category}
///
/// Create a catalog entry. A duplicate slug is a 409.
pub async fn create_catalog_item(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(category): Path<PreferenceCategory>,
    Json(input): Json<CreateCatalogItem>,
) -> AppResult<impl IntoResponse> {
    validate_catalog_item(category, &input.slug, &input.name, input.hex.as_deref())?;

    let item = CatalogRepo::create(&state.pool, category, &input).await?;

    tracing::info!(
        category = ?category,
        item_id = item.id,
        slug = %item.slug,
        identity = %admin.identity_id,
        "Catalog item created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

// ---------------------------------------------------------------------------
// Selections
// ---------------------------------------------------------------------------

/// GET /api/v1/me/preferences/{category}
pub async fn get_preferences(
    CurrentUser { user, .. }: CurrentUser,
    State(state): State<AppState>,
    Path(category): Path<PreferenceCategory>,
) -> AppResult<Json<DataResponse<Vec<CatalogItem>>>> {
    let items = PreferenceRepo::list_for_user(&state.pool, category, user.id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// PUT /api/v1/me/preferences/{category}
///
/// Replace the caller's whole selection for one category. Duplicate ids are
/// collapsed; every id must name an active catalog entry.
pub async fn replace_preferences(
    CurrentUser { auth, user }: CurrentUser,
    State(state): State<AppState>,
    Path(category): Path<PreferenceCategory>,
    Json(input): Json<ReplacePreferences>,
) -> AppResult<Json<DataResponse<PreferencesResponse>>> {
    let ids = normalize_selection(category, &input.ids)?;

    let active = CatalogRepo::count_active(&state.pool, category, &ids).await?;
    if active != ids.len() as i64 {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown or inactive {} in selection",
            category.label()
        ))));
    }

    PreferenceRepo::replace(&state.pool, category, user.id, &ids).await?;
    let (user, onboarding) = sync_progress(&state.pool, &user, auth.is_admin()).await?;
    let items = PreferenceRepo::list_for_user(&state.pool, category, user.id).await?;

    tracing::info!(
        user_id = user.id,
        category = ?category,
        count = items.len(),
        "Preferences replaced",
    );

    Ok(Json(DataResponse {
        data: PreferencesResponse { items, onboarding },
    }))
}
