//! # structpack
//!
//! Declarative binary codec for annotated record types.
//!
//! A record declares its fields once, with an optional per-field
//! annotation; structpack derives the wire layout from the field types and
//! annotations, caches it per record type, and packs or unpacks values
//! against it.
//!
//! ## Quick Start
//!
//! ```
//! use structpack::prelude::*;
//!
//! record! {
//!     #[derive(Debug, Default, PartialEq)]
//!     struct Message {
//!         kind: u8,
//!         len: u16 => "sizeof=body",
//!         body: Vec<u8>,
//!         crc: u32 => "little",
//!     }
//! }
//!
//! let mut msg = Message { kind: 1, len: 0, body: b"hi".to_vec(), crc: 7 };
//!
//! let mut bytes = Vec::new();
//! structpack::pack(&mut bytes, &mut msg)?;
//! assert_eq!(bytes, [1, 0, 2, b'h', b'i', 7, 0, 0, 0]);
//! assert_eq!(structpack::size_of(&msg)?, bytes.len());
//!
//! let mut decoded = Message::default();
//! structpack::unpack(&bytes[..], &mut decoded)?;
//! assert_eq!(decoded, msg);
//! # Ok::<(), structpack::Error>(())
//! ```
//!
//! ## Annotations
//!
//! Space- or comma-separated tokens after `=>`:
//!
//! - `big`, `little`: byte order of this field. The first field's order,
//!   if given, is the default for the whole record; otherwise big-endian.
//! - a wire type name (`int8` .. `uint64`, `float32`, `float64`, `bool`,
//!   `byte`, `pad`, `string`), optionally prefixed by `[N]` (fixed count)
//!   or `[]` (count from a size source)
//! - `sizeof=<field>`: this integer field carries the length of `<field>`
//! - `sizefrom=<field>`: this sequence takes its length from `<field>`
//! - `skip`: the field is not encoded
//!
//! ## Entry points
//!
//! The free functions run on [`Engine::global`]. Embedders that want an
//! isolated schema cache or buffer pool build their own [`Engine`].

#![warn(missing_docs)]

pub mod prelude;

use std::io::{Read, Write};

pub use structpack_core::{
    custom_codec, record, Annotation, AnnotationError, ByteOrder, ContainerShape, Count, CustomCodec,
    ElementSyntax, EncodingOptions, Error, FieldDecl, FieldDescriptor, FieldSchema, FieldValue, IntWidth, Kind,
    Record, RecordType, Result, Scalar, SchemaCache, SchemaError, Wire, WireType,
};
pub use structpack_engine::{BufferPool, Engine, Plan, PooledBuffer};

/// Pack `value` onto `sink` with default options
///
/// `sizeof=` fields of `value` are updated with the live lengths of their
/// targets.
pub fn pack<W: Write, T: Wire>(sink: W, value: &mut T) -> Result<()> {
    pack_with_options(sink, value, &EncodingOptions::default())
}

/// Pack `value` onto `sink`
pub fn pack_with_options<W: Write, T: Wire>(sink: W, value: &mut T, options: &EncodingOptions) -> Result<()> {
    Engine::global().pack(sink, value, options)
}

/// Unpack `value` from `source` with default options
pub fn unpack<R: Read, T: Wire>(source: R, value: &mut T) -> Result<()> {
    unpack_with_options(source, value, &EncodingOptions::default())
}

/// Unpack `value` from `source`
pub fn unpack_with_options<R: Read, T: Wire>(source: R, value: &mut T, options: &EncodingOptions) -> Result<()> {
    Engine::global().unpack(source, value, options)
}

/// Encoded size of `value` with default options
pub fn size_of<T: Wire>(value: &T) -> Result<usize> {
    size_of_with_options(value, &EncodingOptions::default())
}

/// Encoded size of `value`
pub fn size_of_with_options<T: Wire>(value: &T, options: &EncodingOptions) -> Result<usize> {
    Engine::global().size_of(value, options)
}
