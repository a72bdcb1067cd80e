//! Stored documents and field-fetch results

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::mapping::SIZE_FIELD_NAME;

/// A document as held by the store.
///
/// `source` keeps the exact bytes that were submitted. `metadata` holds
/// derived fields such as `_size`, computed once at write time.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedDocument {
    pub type_name: String,
    pub id: String,
    pub version: u64,
    pub source: Vec<u8>,
    pub metadata: BTreeMap<String, Value>,
    pub(crate) parsed: Value,
}

impl IndexedDocument {
    /// The `_size` value recorded at write time, if any
    pub fn size(&self) -> Option<u64> {
        self.metadata.get(SIZE_FIELD_NAME).and_then(Value::as_u64)
    }

    /// Parsed view of the source
    pub fn parsed_source(&self) -> &Value {
        &self.parsed
    }

    /// Resolves a requested field name.
    ///
    /// Metadata fields win; otherwise the name is looked up in the source,
    /// with dots walking into nested objects.
    pub fn field(&self, name: &str) -> Option<&Value> {
        if let Some(value) = self.metadata.get(name) {
            return Some(value);
        }
        if name.starts_with('_') {
            return None;
        }
        name.split('.')
            .try_fold(&self.parsed, |current, segment| current.as_object()?.get(segment))
    }
}

/// Response to a get request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GetResult {
    #[serde(rename = "_type")]
    pub type_name: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version", skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    pub found: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Value>,
}

impl GetResult {
    pub fn not_found(type_name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            id: id.into(),
            version: None,
            found: false,
            fields: BTreeMap::new(),
        }
    }

    /// Builds a result with the requested fields that resolve on `doc`.
    pub fn from_document(doc: &IndexedDocument, fields: &[&str]) -> Self {
        let fields = fields
            .iter()
            .filter_map(|name| doc.field(name).map(|v| (name.to_string(), v.clone())))
            .collect();
        Self {
            type_name: doc.type_name.clone(),
            id: doc.id.clone(),
            version: Some(doc.version),
            found: true,
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}
