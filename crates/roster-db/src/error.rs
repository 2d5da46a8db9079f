//! Database-specific error types and conversions.

use roster_core::error::RegistryError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Group not found: {id}")]
    NotFound { id: String },
}

impl From<DbError> for RegistryError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { id } => RegistryError::NotFound { id },
            other => RegistryError::Storage(other.to_string()),
        }
    }
}
