//! # Index Errors

use thiserror::Error;

use crate::document::DocumentError;
use crate::mapping::MappingError;

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors surfaced by the index facade
#[derive(Debug, Error)]
pub enum IndexError {
    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl IndexError {
    /// Stable code for responses
    pub fn code(&self) -> &'static str {
        match self {
            IndexError::Mapping(e) => e.code().code(),
            IndexError::Document(e) => e.code(),
        }
    }

    /// Returns whether this is a rejected malformed mapping
    pub fn is_malformed_mapping(&self) -> bool {
        matches!(self, IndexError::Mapping(e) if e.is_malformed())
    }
}
