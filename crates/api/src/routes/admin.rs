//! Admin routes mounted at `/admin`. Every handler requires the admin role.

use axum::routing::post;
use axum::Router;

use crate::handlers::preferences;
use crate::state::AppState;

/// ```text
/// POST /catalog/{category}  -> create_catalog_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/catalog/{category}", post(preferences::create_catalog_item))
}
