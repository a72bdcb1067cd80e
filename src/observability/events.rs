//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,
    /// Stored mappings loaded from disk
    MappingsLoaded,
    /// A stored mapping file could not be read (FATAL)
    MappingLoadFailed,

    // Mapping updates
    /// Mapping update committed
    MappingUpdated,
    /// Mapping update rejected, nothing applied
    MappingRejected,
    /// `_size` moved to another state
    SizeFieldChanged,
    /// Type mapping removed
    MappingRemoved,

    // Documents
    /// Document stored
    DocumentIndexed,
    /// Document rejected before storage
    DocumentRejected,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::MappingsLoaded => "MAPPINGS_LOADED",
            Event::MappingLoadFailed => "MAPPING_LOAD_FAILED",
            Event::MappingUpdated => "MAPPING_UPDATED",
            Event::MappingRejected => "MAPPING_REJECTED",
            Event::SizeFieldChanged => "SIZE_FIELD_CHANGED",
            Event::MappingRemoved => "MAPPING_REMOVED",
            Event::DocumentIndexed => "DOCUMENT_INDEXED",
            Event::DocumentRejected => "DOCUMENT_REJECTED",
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::MappingLoadFailed)
    }

    /// Rejections are logged as warnings
    pub fn is_rejection(&self) -> bool {
        matches!(self, Event::MappingRejected | Event::DocumentRejected)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::MappingUpdated.as_str(), "MAPPING_UPDATED");
        assert_eq!(Event::SizeFieldChanged.as_str(), "SIZE_FIELD_CHANGED");
        assert_eq!(format!("{}", Event::DocumentIndexed), "DOCUMENT_INDEXED");
    }

    #[test]
    fn test_fatal_events() {
        assert!(Event::MappingLoadFailed.is_fatal());
        assert!(!Event::MappingRejected.is_fatal());
        assert!(Event::MappingRejected.is_rejection());
    }
}
