//! Core types for structpack
//!
//! This crate holds everything that describes a wire format, as opposed to
//! moving bytes:
//! - WireType, ByteOrder, IntWidth: the wire type registry
//! - Annotation: per-field directive parser
//! - Record, FieldValue, Wire: the typed accessor table records expose
//! - CustomCodec: field-supplied encodings
//! - FieldSchema, SchemaCache: resolved and memoized record layouts
//! - Error, SchemaError: error types

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod annotation;
pub mod codec;
pub mod error;
pub mod options;
pub mod record;
pub mod schema;
pub mod wire_type;

pub use annotation::{Annotation, AnnotationError, ElementSyntax};
pub use codec::CustomCodec;
pub use error::{Error, Result, SchemaError};
pub use options::EncodingOptions;
pub use record::{FieldDecl, FieldValue, Kind, Record, RecordType, Scalar, Wire};
pub use schema::{ContainerShape, Count, FieldDescriptor, FieldSchema, SchemaCache};
pub use wire_type::{ByteOrder, IntWidth, WireType};
