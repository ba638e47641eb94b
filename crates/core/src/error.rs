//! Error types for structpack
//!
//! Two layers:
//!
//! - [`SchemaError`]: a record shape that cannot be turned into a field
//!   schema. Detected once, when the shape is first resolved, and cached so
//!   later calls see the same error without re-resolving.
//! - [`Error`]: everything a pack/unpack/size call can return. Schema errors
//!   are wrapped, I/O errors from the caller's sink or source are propagated
//!   verbatim, and value-level problems get their own variants.

use crate::annotation::AnnotationError;
use std::io;
use thiserror::Error;

/// Unsatisfiable or ambiguous record shape
///
/// `Clone + PartialEq` so the schema cache can hand out the same error for
/// every call on a broken shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The record declares no fields that take part in the wire format
    #[error("record {record} has no wire fields")]
    NoFields {
        /// Record type name
        record: String,
    },

    /// Malformed annotation on a field
    #[error("field {field}: {source}")]
    Annotation {
        /// Field carrying the annotation
        field: String,
        /// Parser error
        source: AnnotationError,
    },

    /// Neither the annotation nor the declared kind yields a wire type
    #[error("field {field}: could not find a wire type for {kind}")]
    UnknownType {
        /// Field name
        field: String,
        /// Declared kind, as text
        kind: String,
    },

    /// An explicit wire type that cannot encode the declared kind
    #[error("field {field}: wire type {wire} cannot encode {kind}")]
    IncompatibleType {
        /// Field name
        field: String,
        /// Annotated wire type
        wire: String,
        /// Declared kind, as text
        kind: String,
    },

    /// A variable-length field with nothing supplying its element count
    #[error("field {field} is variable-length with no size source")]
    NoSizeSource {
        /// Field name
        field: String,
    },

    /// `sizeof=`/`sizefrom=` names a field that does not exist
    #[error("sizeof target {target} does not exist (declared on field {field})")]
    MissingSizeofTarget {
        /// Field carrying the directive
        field: String,
        /// Name it refers to
        target: String,
    },

    /// Two different fields claim to supply one field's element count
    #[error("field {field} has conflicting size sources {first} and {second}")]
    ConflictingSizeSource {
        /// Sized field
        field: String,
        /// First source seen
        first: String,
        /// Second source seen
        second: String,
    },

    /// A size source that cannot hold an element count
    #[error("field {field} cannot supply a length: {reason}")]
    InvalidSizeSource {
        /// Source field
        field: String,
        /// What is wrong with it
        reason: String,
    },

    /// A size source declared after the field it sizes
    #[error("size source {source_field} must be declared before {field}")]
    SizeSourceOrder {
        /// Sized field
        field: String,
        /// Source field
        source_field: String,
    },

    /// Annotation count disagrees with a fixed-length array declaration
    #[error("field {field}: annotation count {annotated} does not match array length {declared}")]
    CountMismatch {
        /// Field name
        field: String,
        /// Count from the annotation
        annotated: usize,
        /// Length of the declared array
        declared: usize,
    },

    /// A record that contains itself, directly or through other records
    #[error("record {record} contains itself")]
    Recursive {
        /// Record type name
        record: String,
    },
}

/// All structpack errors
#[derive(Debug, Error)]
pub enum Error {
    /// The record shape could not be resolved
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// I/O error from the caller's sink or source
    #[error("I/O error: {0}")]
    Io(io::Error),

    /// The source ended partway through a value
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// The source was already exhausted when a record started
    #[error("end of input")]
    EndOfInput,

    /// A field's value cannot be represented by its wire type
    #[error("type mismatch on field {field}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Field name
        field: String,
        /// What the wire type needs
        expected: String,
        /// What the value offered
        found: String,
    },

    /// A sequence of records or custom values shorter than its count
    #[error("shape mismatch on field {field}: expected {expected} elements, found {actual}")]
    ShapeMismatch {
        /// Field name
        field: String,
        /// Element count required by the schema
        expected: usize,
        /// Elements actually present
        actual: usize,
    },

    /// A length value that cannot be used as an element count
    #[error("invalid length {value} on field {field}")]
    InvalidLength {
        /// Field name
        field: String,
        /// The offending value
        value: i128,
    },

    /// Absent or non-encodable top-level argument
    #[error("bad argument: {0}")]
    BadArgument(String),

    /// Failure reported by a custom codec
    #[error("codec error: {0}")]
    Codec(String),
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::UnexpectedEof
        } else {
            Error::Io(e)
        }
    }
}

/// Result type for structpack operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a type mismatch error
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Error::TypeMismatch {
            field: field.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Check if this error came from schema resolution
    pub fn is_schema(&self) -> bool {
        matches!(self, Error::Schema(_))
    }

    /// Check if the source ran out of bytes, cleanly or mid-value
    pub fn is_eof(&self) -> bool {
        matches!(self, Error::UnexpectedEof | Error::EndOfInput)
    }

    /// Check if this is a bad top-level argument
    pub fn is_bad_argument(&self) -> bool {
        matches!(self, Error::BadArgument(_))
    }

    /// Check if this is a value/type incompatibility
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Error::TypeMismatch { .. })
    }
}
