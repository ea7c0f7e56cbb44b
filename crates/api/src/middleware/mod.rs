//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the caller's identity from a JWT Bearer token.
//! - [`auth::CurrentUser`] -- Identity plus the caller's (live) user record.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.

pub mod auth;
pub mod rbac;
