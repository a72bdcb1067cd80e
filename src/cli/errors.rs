//! CLI-specific error types

use std::fmt;
use std::io;

use crate::index::IndexError;
use crate::mapping::MappingError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout/files)
    IoError,
    /// Already initialized
    AlreadyInitialized,
    /// Not initialized
    NotInitialized,
    /// Error passed through from a lower layer, with that layer's code
    Passthrough(&'static str),
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "CLI_CONFIG_ERROR",
            Self::IoError => "CLI_IO_ERROR",
            Self::AlreadyInitialized => "CLI_ALREADY_INITIALIZED",
            Self::NotInitialized => "CLI_NOT_INITIALIZED",
            Self::Passthrough(code) => *code,
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Already initialized
    pub fn already_initialized() -> Self {
        Self::new(
            CliErrorCode::AlreadyInitialized,
            "Data directory already initialized",
        )
    }

    /// Not initialized
    pub fn not_initialized() -> Self {
        Self::new(
            CliErrorCode::NotInitialized,
            "Data directory not initialized. Run 'sizemap init' first.",
        )
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<MappingError> for CliError {
    fn from(e: MappingError) -> Self {
        Self::new(CliErrorCode::Passthrough(e.code().code()), e.message())
    }
}

impl From<IndexError> for CliError {
    fn from(e: IndexError) -> Self {
        Self::new(CliErrorCode::Passthrough(e.code()), e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
