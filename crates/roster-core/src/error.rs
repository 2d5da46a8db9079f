//! Error types for the roster service.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Group not found: {id}")]
    NotFound { id: String },

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type RegistryResult<T> = Result<T, RegistryError>;
