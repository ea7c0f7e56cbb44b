//! Username routes mounted at `/usernames`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::username;
use crate::state::AppState;

/// ```text
/// GET  /validate      -> validate
/// GET  /availability  -> check_availability
/// POST /claim         -> claim
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/validate", get(username::validate))
        .route("/availability", get(username::check_availability))
        .route("/claim", post(username::claim))
}
