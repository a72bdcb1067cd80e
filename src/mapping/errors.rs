//! Mapping error types
//!
//! Error codes:
//! - MAPPING_MALFORMED (REJECT)
//! - MAPPING_INVALID_TYPE_NAME (REJECT)
//! - MAPPING_UNKNOWN_TYPE (REJECT)
//! - MAPPING_STORAGE_FAILED (FATAL)

use std::fmt;

/// Severity levels for mapping errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Mapping request rejected, nothing applied
    Reject,
    /// Stored mappings unusable
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Mapping-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingErrorCode {
    /// Mapping source could not be parsed
    MalformedMapping,
    /// Type name is not acceptable
    InvalidTypeName,
    /// No mapping exists for the type
    UnknownType,
    /// Reading or writing a mapping file failed
    StorageFailed,
}

impl MappingErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            MappingErrorCode::MalformedMapping => "MAPPING_MALFORMED",
            MappingErrorCode::InvalidTypeName => "MAPPING_INVALID_TYPE_NAME",
            MappingErrorCode::UnknownType => "MAPPING_UNKNOWN_TYPE",
            MappingErrorCode::StorageFailed => "MAPPING_STORAGE_FAILED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            MappingErrorCode::StorageFailed => Severity::Fatal,
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for MappingErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Where in a mapping source a problem was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDetails {
    /// Path inside the mapping source (e.g., "_size.enabled")
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl FieldDetails {
    pub fn new(field: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, "field to be present", "missing")
    }

    pub fn unsupported_parameter(field: impl Into<String>) -> Self {
        Self::new(field, "no unsupported parameters", "unsupported parameter present")
    }

    pub fn type_mismatch(field: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(field, expected, actual)
    }
}

impl fmt::Display for FieldDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': expected {}, got {}", self.field, self.expected, self.actual)
    }
}

/// Mapping error type with full context
#[derive(Debug)]
pub struct MappingError {
    code: MappingErrorCode,
    message: String,
    type_name: Option<String>,
    details: Option<FieldDetails>,
}

impl MappingError {
    /// Create a malformed mapping error pointing at a specific field
    pub fn malformed(details: FieldDetails) -> Self {
        Self {
            code: MappingErrorCode::MalformedMapping,
            message: format!("Malformed mapping: {}", details),
            type_name: None,
            details: Some(details),
        }
    }

    /// Create a malformed mapping error with a free-form reason
    pub fn malformed_reason(reason: impl Into<String>) -> Self {
        Self {
            code: MappingErrorCode::MalformedMapping,
            message: format!("Malformed mapping: {}", reason.into()),
            type_name: None,
            details: None,
        }
    }

    /// Create an invalid type name error
    pub fn invalid_type_name(type_name: impl Into<String>, reason: &str) -> Self {
        let name = type_name.into();
        Self {
            code: MappingErrorCode::InvalidTypeName,
            message: format!("Invalid mapping type name '{}': {}", name, reason),
            type_name: Some(name),
            details: None,
        }
    }

    /// Create an unknown type error
    pub fn unknown_type(type_name: impl Into<String>) -> Self {
        let name = type_name.into();
        Self {
            code: MappingErrorCode::UnknownType,
            message: format!("No mapping found for type '{}'", name),
            type_name: Some(name),
            details: None,
        }
    }

    /// Create a storage failure error (FATAL)
    pub fn storage_failed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: MappingErrorCode::StorageFailed,
            message: format!("Mapping storage '{}': {}", path.into(), reason.into()),
            type_name: None,
            details: None,
        }
    }

    /// Attach the type the failing request was addressed to
    pub fn for_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Returns the error code
    pub fn code(&self) -> MappingErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the type name if applicable
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Returns field details if applicable
    pub fn details(&self) -> Option<&FieldDetails> {
        self.details.as_ref()
    }

    /// Returns whether this is a malformed-mapping rejection
    pub fn is_malformed(&self) -> bool {
        self.code == MappingErrorCode::MalformedMapping
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)?;
        if let Some(ref name) = self.type_name {
            write!(f, " [type {}]", name)?;
        }
        Ok(())
    }
}

impl std::error::Error for MappingError {}

/// Result type for mapping operations
pub type MappingResult<T> = Result<T, MappingError>;

/// JSON type name for error messages
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
