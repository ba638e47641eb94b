//! Schema resolution and caching
//!
//! - [`resolve`]: record shape -> [`FieldSchema`], pure
//! - [`SchemaCache`]: memoized, concurrent-safe front end to `resolve`

pub mod cache;
pub mod descriptor;
pub mod resolve;

pub use cache::SchemaCache;
pub use descriptor::{ContainerShape, Count, FieldDescriptor, FieldSchema};
pub use resolve::resolve;
