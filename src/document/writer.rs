//! Document write path
//!
//! Turns a submitted source into an [`IndexedDocument`]:
//! 1. The id must be non-empty
//! 2. The source must be a JSON object
//! 3. If the type's mapping has `_size` enabled, `_size` is attached with the
//!    byte length of the source exactly as submitted
//!
//! The writer never mutates mappings or the source bytes.

use std::collections::BTreeMap;

use serde_json::Value;

use super::errors::{DocumentError, DocumentResult};
use super::record::IndexedDocument;
use crate::mapping::{json_type_name, TypeMapping, SIZE_FIELD_NAME};

pub struct DocumentWriter;

impl DocumentWriter {
    /// Prepares a document for storage under `mapping`.
    ///
    /// `mapping` is `None` for a type without a mapping, which behaves like a
    /// mapping without `_size`. The returned document has version 0; the
    /// store assigns the real version.
    pub fn prepare(
        mapping: Option<&TypeMapping>,
        type_name: &str,
        id: &str,
        source: Vec<u8>,
    ) -> DocumentResult<IndexedDocument> {
        if id.is_empty() {
            return Err(DocumentError::InvalidId("id must not be empty".into()));
        }

        let parsed: Value = serde_json::from_slice(&source)
            .map_err(|e| DocumentError::MalformedSource(e.to_string()))?;
        if !parsed.is_object() {
            return Err(DocumentError::SourceNotObject(json_type_name(&parsed)));
        }

        let mut metadata = BTreeMap::new();
        attach_size(mapping, &source, &mut metadata);

        Ok(IndexedDocument {
            type_name: type_name.to_string(),
            id: id.to_string(),
            version: 0,
            source,
            metadata,
            parsed,
        })
    }
}

/// Size hook: records `_size` when the mapping enables it.
pub fn attach_size(
    mapping: Option<&TypeMapping>,
    source: &[u8],
    metadata: &mut BTreeMap<String, Value>,
) {
    let size = mapping
        .and_then(TypeMapping::size_field)
        .and_then(|size| size.size_of(source));

    if let Some(len) = size {
        metadata.insert(SIZE_FIELD_NAME.to_string(), Value::from(len));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::SizeFieldMapping;

    fn enabled() -> TypeMapping {
        TypeMapping::new("type").with_size(SizeFieldMapping::enabled())
    }

    #[test]
    fn test_size_attached_when_enabled() {
        let doc = DocumentWriter::prepare(Some(&enabled()), "type", "1", br#"{"f":10}"#.to_vec()).unwrap();
        assert_eq!(doc.size(), Some(9));
    }

    #[test]
    fn test_size_counts_raw_bytes() {
        // Whitespace is counted; the source is not re-serialized.
        let source = b"{ \"f\" : 10 }\n".to_vec();
        let doc = DocumentWriter::prepare(Some(&enabled()), "type", "1", source.clone()).unwrap();
        assert_eq!(doc.size(), Some(source.len() as u64));
        assert_eq!(doc.source, source);
    }

    #[test]
    fn test_no_size_when_disabled() {
        let mapping = TypeMapping::new("type").with_size(SizeFieldMapping::disabled());
        let doc = DocumentWriter::prepare(Some(&mapping), "type", "1", br#"{"f":10}"#.to_vec()).unwrap();
        assert_eq!(doc.size(), None);
        assert!(doc.metadata.is_empty());
    }

    #[test]
    fn test_no_size_when_absent_or_unmapped() {
        let plain = TypeMapping::new("type");
        let doc = DocumentWriter::prepare(Some(&plain), "type", "1", b"{}".to_vec()).unwrap();
        assert_eq!(doc.size(), None);

        let doc = DocumentWriter::prepare(None, "type", "1", b"{}".to_vec()).unwrap();
        assert_eq!(doc.size(), None);
    }

    #[test]
    fn test_rejects_bad_sources() {
        let err = DocumentWriter::prepare(None, "type", "1", b"{\"f\":".to_vec()).unwrap_err();
        assert!(matches!(err, DocumentError::MalformedSource(_)));

        let err = DocumentWriter::prepare(None, "type", "1", b"[1,2]".to_vec()).unwrap_err();
        assert_eq!(err, DocumentError::SourceNotObject("array"));
    }

    #[test]
    fn test_rejects_empty_id() {
        let err = DocumentWriter::prepare(None, "type", "", b"{}".to_vec()).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidId(_)));
    }
}
