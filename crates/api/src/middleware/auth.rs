//! JWT-based authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use presently_core::error::CoreError;
use presently_core::roles::ROLE_ADMIN;
use presently_core::types::IdentityId;
use presently_db::models::user::User;
use presently_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated identity extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(identity = %auth.identity_id, role = %auth.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Identity-provider subject (from `claims.sub`).
    pub identity_id: IdentityId,
    /// Email asserted by the provider, if any.
    pub email: Option<String>,
    /// The caller's role name (`"admin"` or `"user"`).
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            identity_id: claims.sub,
            email: claims.email,
            role: claims.role,
        })
    }
}

/// Authenticated identity together with its user record.
///
/// The record is created on the identity's first authenticated request.
/// Soft-deleted accounts are rejected with 403 Forbidden.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub auth: AuthUser,
    pub user: User,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;

        let user =
            UserRepo::get_or_create(&state.pool, auth.identity_id, auth.email.as_deref()).await?;

        if user.is_deleted() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Account has been deleted".into(),
            )));
        }

        Ok(CurrentUser { auth, user })
    }
}
