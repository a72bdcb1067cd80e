//! The `_size` metadata field mapping
//!
//! Wire fragment, always emitted when the type mapping holds one:
//!
//! ```text
//! "_size": { "enabled": <bool> }
//! ```

use serde_json::{json, Value};

use super::errors::{json_type_name, FieldDetails, MappingError, MappingResult};

/// Fixed name of the metadata field, both in mappings and in document fields.
pub const SIZE_FIELD_NAME: &str = "_size";

const ENABLED_KEY: &str = "enabled";

/// Whether the `_size` field is recorded for documents of a type.
///
/// Immutable; an update that mentions `_size` replaces the whole value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SizeFieldMapping {
    enabled: bool,
}

impl SizeFieldMapping {
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub const fn enabled() -> Self {
        Self::new(true)
    }

    pub const fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Parses the value found under `_size` in a mapping source.
    ///
    /// `{}` yields the default (disabled). Any key other than `enabled`, or an
    /// `enabled` that is not a JSON boolean, is rejected.
    pub fn parse(fragment: &Value) -> MappingResult<Self> {
        let obj = fragment.as_object().ok_or_else(|| {
            MappingError::malformed(FieldDetails::type_mismatch(
                SIZE_FIELD_NAME,
                "object",
                json_type_name(fragment),
            ))
        })?;

        for key in obj.keys() {
            if key != ENABLED_KEY {
                return Err(MappingError::malformed(FieldDetails::unsupported_parameter(
                    format!("{}.{}", SIZE_FIELD_NAME, key),
                )));
            }
        }

        match obj.get(ENABLED_KEY) {
            Some(Value::Bool(enabled)) => Ok(Self::new(*enabled)),
            Some(other) => Err(MappingError::malformed(FieldDetails::type_mismatch(
                format!("{}.{}", SIZE_FIELD_NAME, ENABLED_KEY),
                "boolean",
                json_type_name(other),
            ))),
            None => Ok(Self::default()),
        }
    }

    /// Emits `{"enabled": <bool>}`.
    pub fn to_fragment(&self) -> Value {
        json!({ "enabled": self.enabled })
    }

    /// Derived `_size` value for a document source, if the field is enabled.
    ///
    /// Counts the bytes exactly as submitted.
    pub fn size_of(&self, source: &[u8]) -> Option<u64> {
        if self.enabled {
            Some(source.len() as u64)
        } else {
            None
        }
    }
}

/// Position of a type mapping in the `_size` state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeFieldState {
    /// Never configured for the type
    Absent,
    Enabled,
    Disabled,
}

impl SizeFieldState {
    pub fn of(size: Option<&SizeFieldMapping>) -> Self {
        match size {
            None => SizeFieldState::Absent,
            Some(s) if s.is_enabled() => SizeFieldState::Enabled,
            Some(_) => SizeFieldState::Disabled,
        }
    }

    /// Absent and disabled behave identically on the write path.
    pub fn records_size(&self) -> bool {
        matches!(self, SizeFieldState::Enabled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeFieldState::Absent => "absent",
            SizeFieldState::Enabled => "enabled",
            SizeFieldState::Disabled => "disabled",
        }
    }
}
