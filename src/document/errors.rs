//! # Document Errors

use thiserror::Error;

/// Result type for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Errors raised on the document write path before anything is stored
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("Invalid document id: {0}")]
    InvalidId(String),

    #[error("Document source is not valid JSON: {0}")]
    MalformedSource(String),

    #[error("Document source must be a JSON object, got {0}")]
    SourceNotObject(&'static str),
}

impl DocumentError {
    /// Stable code for responses
    pub fn code(&self) -> &'static str {
        match self {
            DocumentError::InvalidId(_) => "DOCUMENT_INVALID_ID",
            DocumentError::MalformedSource(_) => "DOCUMENT_MALFORMED_SOURCE",
            DocumentError::SourceNotObject(_) => "DOCUMENT_SOURCE_NOT_OBJECT",
        }
    }
}
