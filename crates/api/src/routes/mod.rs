pub mod admin;
pub mod catalog;
pub mod health;
pub mod me;
pub mod profiles;
pub mod usernames;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /usernames/validate?username=              format check (public)
/// /usernames/availability?username=          availability (public)
/// /usernames/claim                           claim (POST, auth required)
///
/// /me                                        get, soft-delete (auth required)
/// /me/profile                                profile step (PUT)
/// /me/onboarding?step=                       onboarding state
/// /me/preferences/{category}                 get, replace (GET, PUT)
///
/// /catalog/{category}                        active catalog items (public)
/// /admin/catalog/{category}                  create catalog item (POST, admin only)
///
/// /profiles/{username}                       public profile
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/usernames", usernames::router())
        .nest("/me", me::router())
        .nest("/catalog", catalog::router())
        .nest("/admin", admin::router())
        .nest("/profiles", profiles::router())
}
