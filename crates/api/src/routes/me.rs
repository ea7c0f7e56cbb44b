//! Routes for the caller's own account, mounted at `/me`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{me, onboarding, preferences};
use crate::state::AppState;

/// ```text
/// GET    /                        -> get_me
/// DELETE /                        -> delete_me
/// PUT    /profile                 -> update_profile
/// GET    /onboarding              -> get_onboarding
/// GET    /preferences/{category}  -> get_preferences
/// PUT    /preferences/{category}  -> replace_preferences
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(me::get_me).delete(me::delete_me))
        .route("/profile", put(me::update_profile))
        .route("/onboarding", get(onboarding::get_onboarding))
        .route(
            "/preferences/{category}",
            get(preferences::get_preferences).put(preferences::replace_preferences),
        )
}
