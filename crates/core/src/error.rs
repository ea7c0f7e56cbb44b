/// Closed error taxonomy shared by every layer.
///
/// Backend-specific failures are translated into one of these variants at
/// the boundary; nothing more specific ever reaches a caller.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} '{key}'")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A single field failed validation with a machine-readable reason code.
    #[error("Validation failed for {field}: {message}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
        message: String,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
