//! Mapping registry: the authoritative mapping per type
//!
//! - Optionally backed by `<data_dir>/metadata/mappings/mapping_<type>.json`
//! - One file per type, holding the mapping source
//! - Unreadable mapping files on open are FATAL
//! - An update is written to disk before it becomes visible in memory

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::errors::{MappingError, MappingResult};
use super::merger::MappingMerger;
use super::size_field::SizeFieldState;
use super::types::TypeMapping;
use crate::observability::{log_event_with_fields, Event};

/// Holds the current mapping of every type and commits merged updates.
///
/// Callers serialize updates; the registry takes `&mut self` for writes.
#[derive(Debug)]
pub struct MappingRegistry {
    /// `None` for a purely in-memory registry
    mapping_dir: Option<PathBuf>,
    mappings: BTreeMap<String, TypeMapping>,
}

impl MappingRegistry {
    /// Creates a registry that keeps mappings in memory only.
    pub fn in_memory() -> Self {
        Self {
            mapping_dir: None,
            mappings: BTreeMap::new(),
        }
    }

    /// Opens the registry stored under `data_dir`, loading every mapping file.
    ///
    /// Files live at `<data_dir>/metadata/mappings/`; the directory is created
    /// if missing.
    pub fn open(data_dir: &Path) -> MappingResult<Self> {
        let mut registry = Self {
            mapping_dir: Some(data_dir.join("metadata").join("mappings")),
            mappings: BTreeMap::new(),
        };
        registry.load_all()?;
        Ok(registry)
    }

    /// Returns the mapping directory, if persistent.
    pub fn mapping_dir(&self) -> Option<&Path> {
        self.mapping_dir.as_deref()
    }

    fn load_all(&mut self) -> MappingResult<()> {
        let dir = match &self.mapping_dir {
            Some(dir) => dir.clone(),
            None => return Ok(()),
        };

        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| {
                MappingError::storage_failed(
                    dir.display().to_string(),
                    format!("Failed to create mapping directory: {}", e),
                )
            })?;
            return Ok(());
        }

        let entries = fs::read_dir(&dir).map_err(|e| {
            MappingError::storage_failed(
                dir.display().to_string(),
                format!("Failed to read mapping directory: {}", e),
            )
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| {
                MappingError::storage_failed(
                    dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;

            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }

            if let Err(e) = self.load_mapping_file(&path) {
                let path_str = path.display().to_string();
                log_event_with_fields(
                    Event::MappingLoadFailed,
                    &[("path", path_str.as_str()), ("error", e.message())],
                );
                return Err(e);
            }
        }

        let count = self.mappings.len().to_string();
        log_event_with_fields(Event::MappingsLoaded, &[("count", count.as_str())]);
        Ok(())
    }

    fn load_mapping_file(&mut self, path: &Path) -> MappingResult<()> {
        let type_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.strip_prefix("mapping_"))
            .ok_or_else(|| {
                MappingError::storage_failed(
                    path.display().to_string(),
                    "File name is not mapping_<type>.json",
                )
            })?
            .to_string();

        validate_type_name(&type_name)
            .map_err(|e| MappingError::storage_failed(path.display().to_string(), e.message()))?;

        let content = fs::read_to_string(path).map_err(|e| {
            MappingError::storage_failed(path.display().to_string(), format!("Failed to read file: {}", e))
        })?;

        let source: Value = serde_json::from_str(&content).map_err(|e| {
            MappingError::storage_failed(path.display().to_string(), format!("Invalid JSON: {}", e))
        })?;

        let mapping = MappingMerger::merge_source(None, &type_name, &source)
            .map_err(|e| MappingError::storage_failed(path.display().to_string(), e.message()))?;

        self.mappings.insert(type_name, mapping);
        Ok(())
    }

    /// Applies a partial mapping update to `type_name` and commits the result.
    ///
    /// The type is created if it has no mapping yet. On any error the
    /// previous mapping stays in place, in memory and on disk.
    pub fn put_mapping(&mut self, type_name: &str, raw: &Value) -> MappingResult<&TypeMapping> {
        let merged = validate_type_name(type_name)
            .and_then(|_| MappingMerger::merge_source(self.mappings.get(type_name), type_name, raw))
            .and_then(|merged| self.persist(&merged).map(|_| merged));

        let merged = match merged {
            Ok(merged) => merged,
            Err(e) => {
                log_event_with_fields(
                    Event::MappingRejected,
                    &[("type", type_name), ("code", e.code().code()), ("error", e.message())],
                );
                return Err(e);
            }
        };

        let before = self
            .mappings
            .get(type_name)
            .map(TypeMapping::size_state)
            .unwrap_or(SizeFieldState::Absent);
        let after = merged.size_state();
        if before != after {
            log_event_with_fields(
                Event::SizeFieldChanged,
                &[("type", type_name), ("from", before.as_str()), ("to", after.as_str())],
            );
        }

        let field_count = merged.properties().len().to_string();
        log_event_with_fields(
            Event::MappingUpdated,
            &[("type", type_name), ("size", after.as_str()), ("properties", field_count.as_str())],
        );

        self.mappings.insert(type_name.to_string(), merged);
        self.get(type_name)
            .ok_or_else(|| MappingError::unknown_type(type_name))
    }

    /// Removes the mapping of a type, including its file.
    pub fn remove(&mut self, type_name: &str) -> MappingResult<TypeMapping> {
        if !self.mappings.contains_key(type_name) {
            return Err(MappingError::unknown_type(type_name));
        }

        if let Some(path) = self.mapping_path(type_name) {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    MappingError::storage_failed(
                        path.display().to_string(),
                        format!("Failed to remove file: {}", e),
                    )
                })?;
            }
        }

        log_event_with_fields(Event::MappingRemoved, &[("type", type_name)]);
        self.mappings
            .remove(type_name)
            .ok_or_else(|| MappingError::unknown_type(type_name))
    }

    /// Gets the current mapping of a type.
    pub fn get(&self, type_name: &str) -> Option<&TypeMapping> {
        self.mappings.get(type_name)
    }

    /// Checks if a type has a mapping.
    pub fn exists(&self, type_name: &str) -> bool {
        self.mappings.contains_key(type_name)
    }

    /// Type names in sorted order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.mappings.keys().map(String::as_str)
    }

    pub fn mapping_count(&self) -> usize {
        self.mappings.len()
    }

    fn mapping_path(&self, type_name: &str) -> Option<PathBuf> {
        self.mapping_dir
            .as_ref()
            .map(|dir| dir.join(format!("mapping_{}.json", type_name)))
    }

    /// Writes a mapping file via a temp file and rename.
    fn persist(&self, mapping: &TypeMapping) -> MappingResult<()> {
        let (dir, path) = match (&self.mapping_dir, self.mapping_path(mapping.type_name())) {
            (Some(dir), Some(path)) => (dir, path),
            _ => return Ok(()),
        };

        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| {
                MappingError::storage_failed(
                    dir.display().to_string(),
                    format!("Failed to create mapping directory: {}", e),
                )
            })?;
        }

        let content = serde_json::to_string_pretty(&mapping.to_source()).map_err(|e| {
            MappingError::storage_failed(path.display().to_string(), format!("Failed to serialize mapping: {}", e))
        })?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, content).map_err(|e| {
            MappingError::storage_failed(tmp_path.display().to_string(), format!("Failed to write file: {}", e))
        })?;
        fs::rename(&tmp_path, &path).map_err(|e| {
            MappingError::storage_failed(path.display().to_string(), format!("Failed to replace file: {}", e))
        })?;

        Ok(())
    }
}

/// Longest accepted type name in bytes; `mapping_<type>.json.tmp` must
/// still fit in a 255-byte file name.
const MAX_TYPE_NAME_BYTES: usize = 200;

/// Type names must be usable as file name components and must not collide
/// with metadata field names.
fn validate_type_name(type_name: &str) -> MappingResult<()> {
    if type_name.is_empty() {
        return Err(MappingError::invalid_type_name(type_name, "must not be empty"));
    }
    if type_name.len() > MAX_TYPE_NAME_BYTES {
        return Err(MappingError::invalid_type_name(
            type_name,
            &format!("must not be longer than {} bytes", MAX_TYPE_NAME_BYTES),
        ));
    }
    if type_name.chars().any(char::is_control) {
        return Err(MappingError::invalid_type_name(
            type_name,
            "must not contain control characters",
        ));
    }
    if type_name.starts_with('_') {
        return Err(MappingError::invalid_type_name(type_name, "must not start with '_'"));
    }
    if let Some(c) = type_name.chars().find(|c| matches!(c, '#' | '/' | '\\' | '.')) {
        return Err(MappingError::invalid_type_name(
            type_name,
            &format!("must not contain '{}'", c),
        ));
    }
    Ok(())
}
