//! sizemap - Document type mappings with an optional `_size` metadata field
//!
//! A type mapping may opt in to `_size`, which records the byte length of each
//! document's source at index time. Partial mapping updates that do not
//! mention `_size` leave its configuration untouched.

pub mod cli;
pub mod document;
pub mod index;
pub mod mapping;
pub mod observability;
