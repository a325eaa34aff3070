//! Domain-level error types.

use thiserror::Error;

/// Domain errors - failures the API reports back to callers.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity_type} not found with id: {id}")]
    NotFound { entity_type: &'static str, id: i32 },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Shorthand for a missing post.
    pub fn post_not_found(id: i32) -> Self {
        DomainError::NotFound {
            entity_type: "Post",
            id,
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Stale version for id {id}: expected {expected:?}, found {found:?}")]
    StaleVersion {
        id: i32,
        expected: Option<i32>,
        found: Option<i32>,
    },
}

/// Storage failures as the API sees them: write clashes are conflicts,
/// anything else is internal.
impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::StaleVersion { .. } | RepoError::Constraint(_) => {
                DomainError::Conflict(err.to_string())
            }
            RepoError::Connection(_) | RepoError::Query(_) => DomainError::Internal(err.to_string()),
        }
    }
}
