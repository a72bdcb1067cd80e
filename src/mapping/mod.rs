//! Mapping subsystem
//!
//! A type mapping holds ordinary field definitions and, optionally, the
//! `_size` metadata field configuration.
//!
//! # Rules
//!
//! - `_size` is absent until an update mentions it
//! - An update that mentions `_size` replaces it
//! - An update that does not mention `_size` leaves it as it was
//! - A malformed update is rejected as a whole
//! - Merging is pure; the registry commits and persists the result

mod errors;
mod merger;
mod registry;
mod shorthand;
mod size_field;
mod types;
mod update;

pub(crate) use errors::json_type_name;
pub use errors::{FieldDetails, MappingError, MappingErrorCode, MappingResult, Severity};
pub use merger::MappingMerger;
pub use registry::MappingRegistry;
pub use shorthand::simple_mapping;
pub use size_field::{SizeFieldMapping, SizeFieldState, SIZE_FIELD_NAME};
pub use types::{FieldMapping, FieldType, TypeMapping};
pub use update::PartialMappingUpdate;
