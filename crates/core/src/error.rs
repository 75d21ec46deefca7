use crate::types::DbId;

/// Domain error returned by every lifecycle operation.
///
/// Each variant corresponds to one failure kind callers can distinguish:
/// missing entities, bad input, authorization denial, uniqueness conflicts,
/// actions illegal for the current status, and storage failures.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("User not found: {0}")]
    UnknownUser(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
