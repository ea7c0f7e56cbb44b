//! Public catalog routes mounted at `/catalog`.

use axum::routing::get;
use axum::Router;

use crate::handlers::preferences;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/{category}", get(preferences::list_catalog))
}
