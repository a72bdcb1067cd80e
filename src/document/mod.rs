//! Document subsystem
//!
//! Write path with the `_size` hook, and an in-memory store serving
//! field-fetch requests. Derived fields are computed once at write time and
//! never recomputed on read.

mod errors;
mod record;
mod store;
mod writer;

pub use errors::{DocumentError, DocumentResult};
pub use record::{GetResult, IndexedDocument};
pub use store::DocumentStore;
pub use writer::{attach_size, DocumentWriter};
