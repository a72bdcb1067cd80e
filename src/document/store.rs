//! In-memory document store
//!
//! Documents are keyed by (type, id). Replacing a document bumps its
//! version; versions start at 1.

use std::collections::HashMap;

use super::record::{GetResult, IndexedDocument};

#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: HashMap<(String, String), IndexedDocument>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a prepared document, replacing any previous one with the same
    /// type and id. Returns the assigned version and whether it was created.
    pub fn put(&mut self, mut doc: IndexedDocument) -> (u64, bool) {
        let key = (doc.type_name.clone(), doc.id.clone());
        let previous = self.documents.get(&key).map(|d| d.version);

        doc.version = previous.map_or(1, |v| v + 1);
        let version = doc.version;
        self.documents.insert(key, doc);

        (version, previous.is_none())
    }

    /// Fetches a document with the requested fields.
    pub fn get(&self, type_name: &str, id: &str, fields: &[&str]) -> GetResult {
        match self.document(type_name, id) {
            Some(doc) => GetResult::from_document(doc, fields),
            None => GetResult::not_found(type_name, id),
        }
    }

    pub fn document(&self, type_name: &str, id: &str) -> Option<&IndexedDocument> {
        self.documents.get(&(type_name.to_string(), id.to_string()))
    }

    pub fn remove(&mut self, type_name: &str, id: &str) -> Option<IndexedDocument> {
        self.documents.remove(&(type_name.to_string(), id.to_string()))
    }

    /// Drops every document of a type; returns how many were removed.
    pub fn remove_type(&mut self, type_name: &str) -> usize {
        let before = self.documents.len();
        self.documents.retain(|(t, _), _| t != type_name);
        before - self.documents.len()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentWriter;
    use crate::mapping::{SizeFieldMapping, TypeMapping};
    use serde_json::json;

    fn prepare(type_name: &str, id: &str, source: &str) -> IndexedDocument {
        let mapping = TypeMapping::new(type_name).with_size(SizeFieldMapping::enabled());
        DocumentWriter::prepare(Some(&mapping), type_name, id, source.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn test_put_assigns_versions() {
        let mut store = DocumentStore::new();
        assert_eq!(store.put(prepare("type", "1", r#"{"f":10}"#)), (1, true));
        assert_eq!(store.put(prepare("type", "1", r#"{"f":100}"#)), (2, false));
        assert_eq!(store.put(prepare("other", "1", r#"{"f":10}"#)), (1, true));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_get_size_field() {
        let mut store = DocumentStore::new();
        store.put(prepare("type", "1", r#"{"f":10}"#));

        let result = store.get("type", "1", &["_size"]);
        assert!(result.found);
        assert_eq!(result.version, Some(1));
        assert_eq!(result.field("_size"), Some(&json!(9)));
    }

    #[test]
    fn test_replace_recomputes_size_at_write() {
        let mut store = DocumentStore::new();
        store.put(prepare("type", "1", r#"{"f":10}"#));
        store.put(prepare("type", "1", r#"{"f":1000}"#));
        assert_eq!(store.get("type", "1", &["_size"]).field("_size"), Some(&json!(11)));
    }

    #[test]
    fn test_get_missing() {
        let store = DocumentStore::new();
        let result = store.get("type", "1", &["_size"]);
        assert!(!result.found);
        assert!(result.fields.is_empty());
    }

    #[test]
    fn test_remove_type() {
        let mut store = DocumentStore::new();
        store.put(prepare("a", "1", "{}"));
        store.put(prepare("a", "2", "{}"));
        store.put(prepare("b", "1", "{}"));

        assert_eq!(store.remove_type("a"), 2);
        assert_eq!(store.len(), 1);
        assert!(store.remove("b", "1").is_some());
        assert!(store.is_empty());
    }
}
