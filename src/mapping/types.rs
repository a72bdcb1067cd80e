//! Type mapping definitions
//!
//! Supported ordinary field types:
//! - string, binary
//! - long, integer, short, byte
//! - double, float
//! - boolean, date
//! - object: nested properties

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::errors::{json_type_name, FieldDetails, MappingError, MappingResult};
use super::size_field::{SizeFieldMapping, SizeFieldState, SIZE_FIELD_NAME};

pub(crate) const PROPERTIES_KEY: &str = "properties";
const TYPE_KEY: &str = "type";

/// Ordinary field types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    String,
    Binary,
    Long,
    Integer,
    Short,
    Byte,
    Double,
    Float,
    Boolean,
    Date,
    /// Nested object with its own properties
    Object {
        properties: BTreeMap<String, FieldMapping>,
    },
}

impl FieldType {
    /// Returns the type name as written in mapping sources
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Binary => "binary",
            FieldType::Long => "long",
            FieldType::Integer => "integer",
            FieldType::Short => "short",
            FieldType::Byte => "byte",
            FieldType::Double => "double",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Object { .. } => "object",
        }
    }

    fn scalar(name: &str) -> Option<Self> {
        let field_type = match name {
            "string" => FieldType::String,
            "binary" => FieldType::Binary,
            "long" => FieldType::Long,
            "integer" => FieldType::Integer,
            "short" => FieldType::Short,
            "byte" => FieldType::Byte,
            "double" => FieldType::Double,
            "float" => FieldType::Float,
            "boolean" => FieldType::Boolean,
            "date" => FieldType::Date,
            _ => return None,
        };
        Some(field_type)
    }
}

/// Definition of one ordinary field.
///
/// Parameters other than `type` and `properties` are kept verbatim so that
/// the mapping source round-trips; they carry no meaning here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    pub field_type: FieldType,
    pub params: Map<String, Value>,
}

impl FieldMapping {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            params: Map::new(),
        }
    }

    pub fn string() -> Self {
        Self::new(FieldType::String)
    }

    pub fn long() -> Self {
        Self::new(FieldType::Long)
    }

    pub fn object(properties: BTreeMap<String, FieldMapping>) -> Self {
        Self::new(FieldType::Object { properties })
    }

    /// Adds a pass-through parameter
    pub fn with_param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    /// Parses one field definition; `path` is used in error details.
    ///
    /// A definition without `type` but with `properties` is an object.
    pub fn parse(path: &str, value: &Value) -> MappingResult<Self> {
        let obj = value.as_object().ok_or_else(|| {
            MappingError::malformed(FieldDetails::type_mismatch(path, "object", json_type_name(value)))
        })?;

        let type_name = match obj.get(TYPE_KEY) {
            Some(Value::String(t)) => t.as_str(),
            Some(other) => {
                return Err(MappingError::malformed(FieldDetails::type_mismatch(
                    format!("{}.{}", path, TYPE_KEY),
                    "string",
                    json_type_name(other),
                )))
            }
            None if obj.contains_key(PROPERTIES_KEY) => "object",
            None => {
                return Err(MappingError::malformed(FieldDetails::missing_field(format!(
                    "{}.{}",
                    path, TYPE_KEY
                ))))
            }
        };

        let field_type = if type_name == "object" {
            let properties = match obj.get(PROPERTIES_KEY) {
                Some(props) => parse_properties(&format!("{}.{}", path, PROPERTIES_KEY), props)?,
                None => BTreeMap::new(),
            };
            FieldType::Object { properties }
        } else {
            if obj.contains_key(PROPERTIES_KEY) {
                return Err(MappingError::malformed(FieldDetails::unsupported_parameter(
                    format!("{}.{}", path, PROPERTIES_KEY),
                )));
            }
            FieldType::scalar(type_name).ok_or_else(|| {
                MappingError::malformed(FieldDetails::new(
                    format!("{}.{}", path, TYPE_KEY),
                    "a known field type",
                    format!("'{}'", type_name),
                ))
            })?
        };

        let params = obj
            .iter()
            .filter(|(k, _)| k.as_str() != TYPE_KEY && k.as_str() != PROPERTIES_KEY)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(Self { field_type, params })
    }

    /// Serializes back to the mapping source form
    pub fn to_source(&self) -> Value {
        let mut obj = Map::new();
        obj.insert(TYPE_KEY.into(), Value::String(self.field_type.type_name().into()));
        for (k, v) in &self.params {
            obj.insert(k.clone(), v.clone());
        }
        if let FieldType::Object { properties } = &self.field_type {
            obj.insert(PROPERTIES_KEY.into(), properties_to_source(properties));
        }
        Value::Object(obj)
    }
}

/// Parses a `properties` object into field definitions.
pub(crate) fn parse_properties(path: &str, value: &Value) -> MappingResult<BTreeMap<String, FieldMapping>> {
    let obj = value.as_object().ok_or_else(|| {
        MappingError::malformed(FieldDetails::type_mismatch(path, "object", json_type_name(value)))
    })?;

    let mut properties = BTreeMap::new();
    for (name, def) in obj {
        if name.is_empty() {
            return Err(MappingError::malformed(FieldDetails::new(
                path,
                "non-empty field names",
                "empty field name",
            )));
        }
        let field = FieldMapping::parse(&format!("{}.{}", path, name), def)?;
        properties.insert(name.clone(), field);
    }
    Ok(properties)
}

pub(crate) fn properties_to_source(properties: &BTreeMap<String, FieldMapping>) -> Value {
    Value::Object(
        properties
            .iter()
            .map(|(name, field)| (name.clone(), field.to_source()))
            .collect(),
    )
}

/// Authoritative mapping for one document type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapping {
    pub(crate) type_name: String,
    pub(crate) size: Option<SizeFieldMapping>,
    pub(crate) properties: BTreeMap<String, FieldMapping>,
}

impl TypeMapping {
    /// Create an empty mapping (no `_size`, no properties)
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            size: None,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_size(mut self, size: SizeFieldMapping) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, field: FieldMapping) -> Self {
        self.properties.insert(name.into(), field);
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The `_size` configuration, if the type ever declared one
    pub fn size_field(&self) -> Option<&SizeFieldMapping> {
        self.size.as_ref()
    }

    pub fn size_state(&self) -> SizeFieldState {
        SizeFieldState::of(self.size.as_ref())
    }

    /// Whether documents of this type get a `_size` field
    pub fn records_size(&self) -> bool {
        self.size_state().records_size()
    }

    pub fn properties(&self) -> &BTreeMap<String, FieldMapping> {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&FieldMapping> {
        self.properties.get(name)
    }

    /// Mapping source as returned by mapping retrieval.
    ///
    /// `_size` appears whenever configured, including `{"enabled": false}`;
    /// a type that never configured it has no `_size` key.
    pub fn to_source(&self) -> Value {
        let mut obj = Map::new();
        if let Some(size) = &self.size {
            obj.insert(SIZE_FIELD_NAME.into(), size.to_fragment());
        }
        obj.insert(PROPERTIES_KEY.into(), properties_to_source(&self.properties));
        Value::Object(obj)
    }
}
