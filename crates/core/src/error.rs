//! Domain error shared by validation, hashing, and authorization checks.

use crate::types::DbId;

/// Failure kinds a caller of the core can distinguish and render.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A lookup by id matched nothing.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Caller input failed a validation rule. The message is user-facing.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A uniqueness rule was violated (duplicate email, username, ...).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No authenticated identity, or credentials did not match.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but the role or ownership does not allow the action.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Storage or hashing failure the caller cannot fix.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Stable machine-readable code for the variant.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
