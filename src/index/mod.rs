//! Index subsystem
//!
//! Hosts the mapping registry and the document store of one index and
//! routes requests between them.
//!
//! # Invariants
//!
//! - Mapping updates are merged, then committed; a rejected update changes nothing
//! - `_size` is computed on write from the type's current mapping
//! - Reads never recompute derived fields

mod errors;
mod manager;

pub use errors::{IndexError, IndexResult};
pub use manager::{Index, IndexResponse};
