//! Shared response envelope types for API handlers.
//!
//! All successful API responses use a `{ "data": ... }` envelope; failures
//! use `{ "error": ..., "code": ... }` (see [`crate::error::AppError`]).

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
