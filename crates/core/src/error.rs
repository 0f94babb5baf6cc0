use crate::types::DbId;

/// Domain-level error type shared across crates.
///
/// HTTP-specific concerns (status codes, response bodies) live in the API
/// crate; this enum only distinguishes the failure classes the domain
/// logic can produce.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity lookup by id found nothing.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input failed domain validation.
    #[error("{0}")]
    Validation(String),

    /// The requested operation conflicts with current state.
    #[error("{0}")]
    Conflict(String),

    /// An unexpected internal failure.
    #[error("{0}")]
    Internal(String),
}
