//! Metrics registry
//!
//! - Counters only
//! - Monotonic increase
//! - Reset only on process start

use std::sync::atomic::{AtomicU64, Ordering};

/// Operational counters for one index.
///
/// Relaxed ordering; counters are independent of each other.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Committed mapping updates
    mapping_updates: AtomicU64,
    /// Rejected mapping updates
    mapping_rejections: AtomicU64,
    /// Documents stored
    documents_indexed: AtomicU64,
    /// Documents that received a `_size` field
    size_fields_attached: AtomicU64,
    /// Sum of all indexed source lengths in bytes
    source_bytes: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_mapping_updates(&self) {
        self.mapping_updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_mapping_rejections(&self) {
        self.mapping_rejections.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one stored document of `source_len` bytes
    pub fn record_document(&self, source_len: u64, size_attached: bool) {
        self.documents_indexed.fetch_add(1, Ordering::Relaxed);
        self.source_bytes.fetch_add(source_len, Ordering::Relaxed);
        if size_attached {
            self.size_fields_attached.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            mapping_updates: self.mapping_updates.load(Ordering::Relaxed),
            mapping_rejections: self.mapping_rejections.load(Ordering::Relaxed),
            documents_indexed: self.documents_indexed.load(Ordering::Relaxed),
            size_fields_attached: self.size_fields_attached.load(Ordering::Relaxed),
            source_bytes: self.source_bytes.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    pub mapping_updates: u64,
    pub mapping_rejections: u64,
    pub documents_indexed: u64,
    pub size_fields_attached: u64,
    pub source_bytes: u64,
}
