//! Shorthand mapping builder
//!
//! Builds a mapping source from `name, "key=value,key=value"` pairs:
//!
//! ```text
//! ["_size", "enabled=true", "otherField", "type=string"]
//!   => {"_size": {"enabled": true}, "properties": {"otherField": {"type": "string"}}}
//! ```
//!
//! Names starting with `_` are metadata fields at the root; all others go
//! under `properties`.

use serde_json::{Map, Value};

use super::errors::{MappingError, MappingResult};
use super::types::PROPERTIES_KEY;

/// Builds a mapping source from shorthand name/property pairs.
pub fn simple_mapping<S: AsRef<str>>(pairs: &[S]) -> MappingResult<Value> {
    if pairs.len() % 2 != 0 {
        return Err(MappingError::malformed_reason(format!(
            "shorthand mapping needs name/properties pairs, got {} arguments",
            pairs.len()
        )));
    }

    let mut root = Map::new();
    let mut properties = Map::new();

    for pair in pairs.chunks(2) {
        let name = pair[0].as_ref();
        if name.is_empty() {
            return Err(MappingError::malformed_reason("shorthand field name is empty"));
        }
        let definition = parse_definition(name, pair[1].as_ref())?;

        if name.starts_with('_') {
            root.insert(name.to_string(), definition);
        } else {
            properties.insert(name.to_string(), definition);
        }
    }

    if !properties.is_empty() {
        root.insert(PROPERTIES_KEY.to_string(), Value::Object(properties));
    }
    Ok(Value::Object(root))
}

fn parse_definition(name: &str, spec: &str) -> MappingResult<Value> {
    let mut definition = Map::new();
    for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (key, value) = entry.split_once('=').ok_or_else(|| {
            MappingError::malformed_reason(format!(
                "shorthand property '{}' of field '{}' is not key=value",
                entry, name
            ))
        })?;
        definition.insert(key.trim().to_string(), scalar(value.trim()));
    }
    Ok(Value::Object(definition))
}

fn scalar(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => raw
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(raw.to_string())),
    }
}
