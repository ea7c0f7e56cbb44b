//! Public profile routes mounted at `/profiles`.

use axum::routing::get;
use axum::Router;

use crate::handlers::profiles;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/{username}", get(profiles::get_public_profile))
}
