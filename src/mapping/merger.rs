//! Mapping merge
//!
//! Rules:
//! - Properties: union of both sides, the update wins on a name conflict.
//!   Two object definitions under the same name merge their properties by
//!   the same rule.
//! - `_size`: replaced when the update mentions it, carried forward
//!   unchanged otherwise. An update that omits `_size` never disables it.
//!
//! Merging is pure. Storing the result is the caller's job.

use std::collections::BTreeMap;

use serde_json::Value;

use super::errors::MappingResult;
use super::types::{FieldMapping, FieldType, TypeMapping};
use super::update::PartialMappingUpdate;

/// Combines a stored type mapping with a partial update.
pub struct MappingMerger;

impl MappingMerger {
    /// Merges `update` into `previous`.
    ///
    /// `previous` is `None` when the type is being created. The result is
    /// always a fresh value; `previous` is not modified.
    pub fn merge(
        previous: Option<&TypeMapping>,
        type_name: &str,
        update: &PartialMappingUpdate,
    ) -> TypeMapping {
        let mut merged = match previous {
            Some(prev) => prev.clone(),
            None => TypeMapping::new(type_name),
        };

        merge_properties(&mut merged.properties, &update.properties);

        if let Some(size) = update.size {
            merged.size = Some(size);
        }

        merged
    }

    /// Parses `raw` and merges it into `previous`.
    ///
    /// A malformed source aborts before any merging happens.
    pub fn merge_source(
        previous: Option<&TypeMapping>,
        type_name: &str,
        raw: &Value,
    ) -> MappingResult<TypeMapping> {
        let update = PartialMappingUpdate::parse_for_type(type_name, raw)?;
        Ok(Self::merge(previous, type_name, &update))
    }
}

fn merge_properties(
    base: &mut BTreeMap<String, FieldMapping>,
    incoming: &BTreeMap<String, FieldMapping>,
) {
    for (name, field) in incoming {
        match base.get_mut(name) {
            Some(existing) => merge_field(existing, field),
            None => {
                base.insert(name.clone(), field.clone());
            }
        }
    }
}

fn merge_field(existing: &mut FieldMapping, incoming: &FieldMapping) {
    if let (FieldType::Object { properties: ours }, FieldType::Object { properties: theirs }) =
        (&mut existing.field_type, &incoming.field_type)
    {
        merge_properties(ours, theirs);
        for (k, v) in &incoming.params {
            existing.params.insert(k.clone(), v.clone());
        }
        return;
    }
    *existing = incoming.clone();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{SizeFieldMapping, SizeFieldState};
    use serde_json::json;

    fn enabled_mapping() -> TypeMapping {
        MappingMerger::merge_source(None, "mytype", &json!({"_size": {"enabled": true}})).unwrap()
    }

    #[test]
    fn test_create_with_size() {
        let mapping = enabled_mapping();
        assert_eq!(mapping.type_name(), "mytype");
        assert_eq!(mapping.size_state(), SizeFieldState::Enabled);
    }

    #[test]
    fn test_create_without_size_is_absent() {
        let mapping = MappingMerger::merge_source(
            None,
            "mytype",
            &json!({"properties": {"f": {"type": "long"}}}),
        )
        .unwrap();
        assert_eq!(mapping.size_state(), SizeFieldState::Absent);
        assert!(mapping.size_field().is_none());
    }

    #[test]
    fn test_unrelated_update_keeps_size() {
        let previous = enabled_mapping();
        let merged = MappingMerger::merge_source(
            Some(&previous),
            "mytype",
            &json!({"properties": {"otherField": {"type": "string"}}}),
        )
        .unwrap();

        assert_eq!(merged.size_field(), Some(&SizeFieldMapping::enabled()));
        assert!(merged.property("otherField").is_some());
    }

    #[test]
    fn test_explicit_disable() {
        let previous = enabled_mapping();
        let merged = MappingMerger::merge_source(
            Some(&previous),
            "mytype",
            &json!({"_size": {"enabled": false}}),
        )
        .unwrap();
        assert_eq!(merged.size_state(), SizeFieldState::Disabled);
    }

    #[test]
    fn test_empty_update_is_noop() {
        let previous = enabled_mapping().with_property("f", FieldMapping::long());
        let merged = MappingMerger::merge(Some(&previous), "mytype", &PartialMappingUpdate::default());
        assert_eq!(merged, previous);
    }

    #[test]
    fn test_update_wins_on_conflict() {
        let previous = TypeMapping::new("t").with_property("f", FieldMapping::long());
        let merged = MappingMerger::merge(
            Some(&previous),
            "t",
            &PartialMappingUpdate::property("f", FieldMapping::string()),
        );
        assert_eq!(merged.property("f").unwrap().field_type, FieldType::String);
    }

    #[test]
    fn test_object_properties_merge_recursively() {
        let previous = MappingMerger::merge_source(
            None,
            "t",
            &json!({"properties": {"address": {"properties": {"city": {"type": "string"}}}}}),
        )
        .unwrap();

        let merged = MappingMerger::merge_source(
            Some(&previous),
            "t",
            &json!({"properties": {"address": {"properties": {"zip": {"type": "long"}}}}}),
        )
        .unwrap();

        assert_eq!(
            merged.to_source()["properties"]["address"]["properties"],
            json!({"city": {"type": "string"}, "zip": {"type": "long"}})
        );
    }

    #[test]
    fn test_object_replaced_by_scalar() {
        let previous = TypeMapping::new("t").with_property("a", FieldMapping::object(BTreeMap::new()));
        let merged = MappingMerger::merge(
            Some(&previous),
            "t",
            &PartialMappingUpdate::property("a", FieldMapping::string()),
        );
        assert_eq!(merged.property("a").unwrap().field_type, FieldType::String);
    }

    #[test]
    fn test_malformed_update_aborts() {
        let previous = enabled_mapping();
        let result = MappingMerger::merge_source(
            Some(&previous),
            "mytype",
            &json!({"_size": {"enabled": "false"}, "properties": {"x": {"type": "long"}}}),
        );
        assert!(result.unwrap_err().is_malformed());
        assert_eq!(previous, enabled_mapping());
    }

    #[test]
    fn test_enable_twice_is_idempotent() {
        let update = PartialMappingUpdate::size_only(SizeFieldMapping::enabled());
        let once = MappingMerger::merge(None, "t", &update);
        let twice = MappingMerger::merge(Some(&once), "t", &update);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_previous_type_name_kept() {
        let previous = TypeMapping::new("mytype");
        let merged = MappingMerger::merge(Some(&previous), "mytype", &PartialMappingUpdate::default());
        assert_eq!(merged.type_name(), "mytype");
    }
}
