//! Domain error type shared by the db, engine, and HTTP layers.

use crate::types::DbId;

/// Errors raised by matching domain logic.
///
/// The HTTP layer maps each variant to a status code; see
/// `alumni_api::error::AppError`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The entity exists but is not in a state that allows the operation
    /// (e.g. accepting a match that is no longer pending).
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for [`CoreError::NotFound`].
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        CoreError::NotFound { entity, id }
    }
}

impl From<crate::matching::status::TransitionError> for CoreError {
    fn from(err: crate::matching::status::TransitionError) -> Self {
        CoreError::Conflict(err.to_string())
    }
}
