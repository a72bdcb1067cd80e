//! Index facade
//!
//! # API
//!
//! - `put_mapping(type, source)` - Merge a partial mapping into a type
//! - `get_mapping(type)` - Mapping source of a type
//! - `index_document(type, id, source)` - Store a document, attaching `_size`
//! - `get_document(type, id, fields)` - Fetch stored and derived fields

use std::path::Path;

use serde_json::{json, Map, Value};
use uuid::Uuid;

use super::errors::IndexResult;
use crate::document::{DocumentStore, DocumentWriter, GetResult};
use crate::mapping::{MappingError, MappingRegistry, TypeMapping};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry, MetricsSnapshot};

/// Outcome of indexing one document
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct IndexResponse {
    #[serde(rename = "_type")]
    pub type_name: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version")]
    pub version: u64,
    pub created: bool,
    /// `_size` recorded for the document, if the type enables it
    #[serde(rename = "_size", skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// A single index: type mappings plus the documents stored under them.
pub struct Index {
    name: String,
    mappings: MappingRegistry,
    documents: DocumentStore,
    metrics: MetricsRegistry,
}

impl Index {
    /// Creates an index whose mappings live in memory only.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_registry(name, MappingRegistry::in_memory())
    }

    /// Opens an index whose mappings are persisted under `data_dir`.
    pub fn open(name: impl Into<String>, data_dir: &Path) -> IndexResult<Self> {
        Ok(Self::with_registry(name, MappingRegistry::open(data_dir)?))
    }

    fn with_registry(name: impl Into<String>, mappings: MappingRegistry) -> Self {
        Self {
            name: name.into(),
            mappings,
            documents: DocumentStore::new(),
            metrics: MetricsRegistry::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Applies a partial mapping update. The whole update is rejected if any
    /// part of it is malformed.
    pub fn put_mapping(&mut self, type_name: &str, source: &Value) -> IndexResult<&TypeMapping> {
        match self.mappings.put_mapping(type_name, source) {
            Ok(mapping) => {
                self.metrics.increment_mapping_updates();
                Ok(mapping)
            }
            Err(e) => {
                self.metrics.increment_mapping_rejections();
                Err(e.into())
            }
        }
    }

    /// Mapping source of a type, `{"<type>": {...}}`.
    pub fn get_mapping(&self, type_name: &str) -> IndexResult<Value> {
        let mapping = self.mapping(type_name)?;
        let mut wrapped = Map::new();
        wrapped.insert(type_name.to_string(), mapping.to_source());
        Ok(Value::Object(wrapped))
    }

    pub fn mapping(&self, type_name: &str) -> IndexResult<&TypeMapping> {
        self.mappings
            .get(type_name)
            .ok_or_else(|| MappingError::unknown_type(type_name).into())
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.mappings.type_names()
    }

    /// Removes a type's mapping and every document stored under it.
    pub fn delete_type(&mut self, type_name: &str) -> IndexResult<usize> {
        self.mappings.remove(type_name)?;
        Ok(self.documents.remove_type(type_name))
    }

    /// Stores a document under `type_name`.
    ///
    /// A missing id is generated. A type without a mapping gets an empty one
    /// once the document is accepted, so its documents carry no `_size`. A
    /// rejected document changes nothing.
    pub fn index_document(
        &mut self,
        type_name: &str,
        id: Option<&str>,
        source: impl Into<Vec<u8>>,
    ) -> IndexResult<IndexResponse> {
        let id = match id {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        };

        let doc = match DocumentWriter::prepare(self.mappings.get(type_name), type_name, &id, source.into()) {
            Ok(doc) => doc,
            Err(e) => {
                log_event_with_fields(
                    Event::DocumentRejected,
                    &[("type", type_name), ("id", id.as_str()), ("error", e.code())],
                );
                return Err(e.into());
            }
        };

        if !self.mappings.exists(type_name) {
            self.put_mapping(type_name, &json!({}))?;
        }

        let size = doc.size();
        self.metrics.record_document(doc.source.len() as u64, size.is_some());
        let (version, created) = self.documents.put(doc);

        let version_str = version.to_string();
        log_event_with_fields(
            Event::DocumentIndexed,
            &[("type", type_name), ("id", id.as_str()), ("version", version_str.as_str())],
        );

        Ok(IndexResponse {
            type_name: type_name.to_string(),
            id,
            version,
            created,
            size,
        })
    }

    /// Fetches a document with the requested fields, e.g. `["_size"]`.
    pub fn get_document(&self, type_name: &str, id: &str, fields: &[&str]) -> GetResult {
        self.documents.get(type_name, id, fields)
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{MappingErrorCode, SizeFieldState};
    use tempfile::TempDir;

    #[test]
    fn test_index_with_size() {
        let mut index = Index::new("test");
        index
            .put_mapping("type", &json!({"_size": {"enabled": true}}))
            .unwrap();

        let response = index.index_document("type", Some("1"), r#"{"f":10}"#).unwrap();
        assert_eq!(response.size, Some(9));
        assert!(response.created);

        let result = index.get_document("type", "1", &["_size"]);
        assert_eq!(result.field("_size"), Some(&json!(9)));
    }

    #[test]
    fn test_unmapped_type_created_without_size() {
        let mut index = Index::new("test");
        let response = index.index_document("type", Some("1"), r#"{"f":10}"#).unwrap();
        assert_eq!(response.size, None);
        assert_eq!(index.mapping("type").unwrap().size_state(), SizeFieldState::Absent);
        assert_eq!(index.get_mapping("type").unwrap(), json!({"type": {"properties": {}}}));
    }

    #[test]
    fn test_generated_id() {
        let mut index = Index::new("test");
        let response = index.index_document("type", None, "{}").unwrap();
        assert!(Uuid::parse_str(&response.id).is_ok());
        assert!(index.get_document("type", &response.id, &[]).found);
    }

    #[test]
    fn test_unknown_type_mapping() {
        let index = Index::new("test");
        let err = index.get_mapping("missing").unwrap_err();
        assert_eq!(err.code(), MappingErrorCode::UnknownType.code());
    }

    #[test]
    fn test_metrics() {
        let mut index = Index::new("test");
        index.put_mapping("type", &json!({"_size": {"enabled": true}})).unwrap();
        assert!(index.put_mapping("type", &json!({"_size": {"enabled": 1}})).is_err());
        index.index_document("type", Some("1"), r#"{"f":10}"#).unwrap();
        assert!(index.index_document("type", Some("2"), "not json").is_err());

        let snap = index.metrics();
        assert_eq!(snap.mapping_updates, 1);
        assert_eq!(snap.mapping_rejections, 1);
        assert_eq!(snap.documents_indexed, 1);
        assert_eq!(snap.size_fields_attached, 1);
        assert_eq!(snap.source_bytes, 9);
    }

    #[test]
    fn test_rejected_document_creates_no_mapping() {
        let tmp = TempDir::new().unwrap();

        {
            let mut index = Index::open("test", tmp.path()).unwrap();
            assert!(index.index_document("ghost", Some("1"), "not json").is_err());
            assert!(index.mapping("ghost").is_err());

            let snap = index.metrics();
            assert_eq!(snap.mapping_updates, 0);
            assert_eq!(snap.documents_indexed, 0);
        }

        let index = Index::open("test", tmp.path()).unwrap();
        assert!(index.mapping("ghost").is_err());
        assert_eq!(index.type_names().count(), 0);
    }

    #[test]
    fn test_accepted_document_creates_mapping() {
        let mut index = Index::new("test");
        index.index_document("fresh", Some("1"), "{}").unwrap();

        assert_eq!(index.mapping("fresh").unwrap().size_state(), SizeFieldState::Absent);
        assert_eq!(index.metrics().mapping_updates, 1);
    }

    #[test]
    fn test_delete_type() {
        let mut index = Index::new("test");
        index.put_mapping("type", &json!({"_size": {"enabled": true}})).unwrap();
        index.index_document("type", Some("1"), "{}").unwrap();

        assert_eq!(index.delete_type("type").unwrap(), 1);
        assert_eq!(index.document_count(), 0);
        assert!(index.mapping("type").is_err());
    }
}
