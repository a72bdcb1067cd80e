//! Partial mapping updates
//!
//! Accepted root keys are `_size` and `properties`. A source wrapped in a
//! single key equal to the type name (`{"mytype": {...}}`) is unwrapped first.

use std::collections::BTreeMap;

use serde_json::Value;

use super::errors::{json_type_name, FieldDetails, MappingError, MappingResult};
use super::size_field::{SizeFieldMapping, SIZE_FIELD_NAME};
use super::types::{parse_properties, FieldMapping, PROPERTIES_KEY};

/// A mapping-change request, already validated.
///
/// `size` is `None` when the request does not mention `_size` at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialMappingUpdate {
    pub size: Option<SizeFieldMapping>,
    pub properties: BTreeMap<String, FieldMapping>,
}

impl PartialMappingUpdate {
    /// An update that only touches `_size`
    pub fn size_only(size: SizeFieldMapping) -> Self {
        Self {
            size: Some(size),
            properties: BTreeMap::new(),
        }
    }

    /// An update that only adds or replaces one property
    pub fn property(name: impl Into<String>, field: FieldMapping) -> Self {
        let mut properties = BTreeMap::new();
        properties.insert(name.into(), field);
        Self {
            size: None,
            properties,
        }
    }

    /// Whether the update explicitly sets `_size`
    pub fn mentions_size(&self) -> bool {
        self.size.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.size.is_none() && self.properties.is_empty()
    }

    /// Parses a raw mapping source.
    ///
    /// Either the whole update parses or an error is returned; nothing is
    /// partially accepted.
    pub fn parse(raw: &Value) -> MappingResult<Self> {
        let obj = raw.as_object().ok_or_else(|| {
            MappingError::malformed(FieldDetails::type_mismatch("$root", "object", json_type_name(raw)))
        })?;

        let mut update = Self::default();
        for (key, value) in obj {
            match key.as_str() {
                SIZE_FIELD_NAME => update.size = Some(SizeFieldMapping::parse(value)?),
                PROPERTIES_KEY => update.properties = parse_properties(PROPERTIES_KEY, value)?,
                other => {
                    return Err(MappingError::malformed(FieldDetails::unsupported_parameter(other)));
                }
            }
        }
        Ok(update)
    }

    /// Parses a raw mapping source addressed to `type_name`, unwrapping
    /// `{"<type_name>": {...}}` when present.
    pub fn parse_for_type(type_name: &str, raw: &Value) -> MappingResult<Self> {
        let inner = match raw.as_object() {
            Some(obj) if type_name != PROPERTIES_KEY && obj.len() == 1 && obj.contains_key(type_name) => {
                &obj[type_name]
            }
            _ => raw,
        };
        Self::parse(inner).map_err(|e| e.for_type(type_name))
    }
}
