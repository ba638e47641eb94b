//! Record model
//!
//! The typed accessor table that stands in for runtime reflection. A record
//! type describes itself once through [`Record::fields`] (name, declared
//! [`Kind`], annotation) and exposes its live fields through
//! [`Record::field`] / [`Record::field_mut`] as [`FieldValue`] trait
//! objects. The schema resolver reads the descriptions; the engine reads
//! and writes the values.
//!
//! Most records are declared with the [`record!`](crate::record) macro:
//!
//! ```
//! use structpack_core::record;
//!
//! record! {
//!     #[derive(Debug, Default, PartialEq)]
//!     pub struct Frame {
//!         pub len: u16 => "sizeof=payload",
//!         pub payload: Vec<u8>,
//!         pub checksum: u32 => "little",
//!     }
//! }
//! ```

mod impls;
mod macros;

use crate::codec::CustomCodec;
use crate::wire_type::WireType;
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Declared kind of a field, as the record type spells it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    /// `()`: no value; only meaningful with a `pad` annotation
    Unit,
    /// `bool`
    Bool,
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `isize`; wire width comes from the call's options
    Isize,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `usize`; wire width comes from the call's options
    Usize,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// `String`
    Str,
    /// `[T; N]`
    Array(Box<Kind>, usize),
    /// `Vec<T>`
    Slice(Box<Kind>),
    /// `Box<T>` / `Option<Box<T>>`
    Pointer(Box<Kind>),
    /// A nested record
    Record(RecordType),
    /// A type implementing [`CustomCodec`]
    Custom,
}

impl Kind {
    /// True for kinds whose values are integers (size source candidates)
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Kind::I8
                | Kind::I16
                | Kind::I32
                | Kind::I64
                | Kind::Isize
                | Kind::U8
                | Kind::U16
                | Kind::U32
                | Kind::U64
                | Kind::Usize
        )
    }

    /// Wire type a value of this kind gets when nothing else is specified
    ///
    /// `isize`/`usize` map to their 32-bit types here; callers that honor
    /// [`IntWidth`](crate::IntWidth) widen them per call. Containers and
    /// `()` have no default.
    pub fn default_wire(&self) -> Option<WireType> {
        let wire = match self {
            Kind::Bool => WireType::Bool,
            Kind::I8 => WireType::Int8,
            Kind::I16 => WireType::Int16,
            Kind::I32 | Kind::Isize => WireType::Int32,
            Kind::I64 => WireType::Int64,
            Kind::U8 => WireType::Uint8,
            Kind::U16 => WireType::Uint16,
            Kind::U32 | Kind::Usize => WireType::Uint32,
            Kind::U64 => WireType::Uint64,
            Kind::F32 => WireType::Float32,
            Kind::F64 => WireType::Float64,
            Kind::Str => WireType::String,
            Kind::Record(_) | Kind::Custom => WireType::Struct,
            Kind::Unit | Kind::Array(..) | Kind::Slice(_) | Kind::Pointer(_) => return None,
        };
        Some(wire)
    }

    /// Platform-width integer kinds
    pub fn is_native_int(&self) -> bool {
        matches!(self, Kind::Isize | Kind::Usize)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Unit => f.write_str("()"),
            Kind::Bool => f.write_str("bool"),
            Kind::I8 => f.write_str("i8"),
            Kind::I16 => f.write_str("i16"),
            Kind::I32 => f.write_str("i32"),
            Kind::I64 => f.write_str("i64"),
            Kind::Isize => f.write_str("isize"),
            Kind::U8 => f.write_str("u8"),
            Kind::U16 => f.write_str("u16"),
            Kind::U32 => f.write_str("u32"),
            Kind::U64 => f.write_str("u64"),
            Kind::Usize => f.write_str("usize"),
            Kind::F32 => f.write_str("f32"),
            Kind::F64 => f.write_str("f64"),
            Kind::Str => f.write_str("String"),
            Kind::Array(elem, n) => write!(f, "[{}; {}]", elem, n),
            Kind::Slice(elem) => write!(f, "Vec<{}>", elem),
            Kind::Pointer(inner) => write!(f, "Box<{}>", inner),
            Kind::Record(rt) => f.write_str(rt.name()),
            Kind::Custom => f.write_str("custom codec"),
        }
    }
}

/// Identity of a record shape
///
/// Equality and hashing use the Rust `TypeId` only; this is the schema
/// cache key.
#[derive(Clone, Copy)]
pub struct RecordType {
    id: TypeId,
    name: &'static str,
    fields: fn() -> Vec<FieldDecl>,
}

impl RecordType {
    /// Shape of record type `R`
    pub fn of<R: Record + 'static>() -> Self {
        RecordType {
            id: TypeId::of::<R>(),
            name: std::any::type_name::<R>(),
            fields: R::fields,
        }
    }

    /// Type identity
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Type name (for errors and logs)
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Introspect the record's declared fields
    pub fn fields(&self) -> Vec<FieldDecl> {
        (self.fields)()
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RecordType {}

impl Hash for RecordType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordType({})", self.name)
    }
}

/// One introspected field: name, declared kind, annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Field name, as referenced by `sizeof=`/`sizefrom=`
    pub name: &'static str,
    /// Declared kind
    pub kind: Kind,
    /// Annotation string (may be empty)
    pub tag: &'static str,
    /// The record cannot write this field back
    ///
    /// Opaque fields still occupy their bytes: zero-filled on pack,
    /// consumed and discarded on unpack.
    pub opaque: bool,
}

impl FieldDecl {
    /// Describe a field with an explicit kind
    pub fn new(name: &'static str, kind: Kind, tag: &'static str) -> Self {
        FieldDecl {
            name,
            kind,
            tag,
            opaque: false,
        }
    }

    /// Describe a field of Rust type `T`
    pub fn of<T: Wire>(name: &'static str, tag: &'static str) -> Self {
        Self::new(name, T::kind(), tag)
    }

    /// Mark the field as opaque
    pub fn opaque(mut self) -> Self {
        self.opaque = true;
        self
    }
}

/// A scalar field value, widened for transport between record and engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    Uint(u64),
    /// Float
    Float(f64),
}

impl Scalar {
    /// Integer bit pattern (two's complement), for integer and bool wire types
    ///
    /// `None` for floats.
    pub fn to_bits(self) -> Option<u64> {
        match self {
            Scalar::Bool(b) => Some(b as u64),
            Scalar::Int(v) => Some(v as u64),
            Scalar::Uint(v) => Some(v),
            Scalar::Float(_) => None,
        }
    }

    /// Float value, for float wire types
    pub fn to_float(self) -> Option<f64> {
        match self {
            Scalar::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Element count carried by a size field
    ///
    /// `Err` holds the value when it is negative or does not fit `usize`.
    pub fn to_count(self) -> Result<usize, i128> {
        match self {
            Scalar::Int(v) => usize::try_from(v).map_err(|_| v as i128),
            Scalar::Uint(v) => usize::try_from(v).map_err(|_| v as i128),
            Scalar::Bool(b) => Ok(b as usize),
            Scalar::Float(v) => Err(v as i128),
        }
    }

    /// Name of the variant, for error messages
    pub fn type_name(self) -> &'static str {
        match self {
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) => "signed integer",
            Scalar::Uint(_) => "unsigned integer",
            Scalar::Float(_) => "float",
        }
    }
}

/// Live access to one field's value
///
/// Every method has a default that reports the capability as missing, so
/// an implementation only overrides what its type supports. The engine
/// turns a missing capability into a typed error.
pub trait FieldValue {
    /// Current value as a scalar
    fn scalar(&self) -> Option<Scalar> {
        None
    }

    /// Store a decoded scalar; `false` if the type cannot hold it
    fn set_scalar(&mut self, _value: Scalar) -> bool {
        false
    }

    /// Contents as raw bytes (byte sequences only)
    fn bytes(&self) -> Option<&[u8]> {
        None
    }

    /// Replace contents with raw bytes; `false` if unsupported
    fn set_bytes(&mut self, _bytes: &[u8]) -> bool {
        false
    }

    /// Runtime element count of a sequence
    fn seq_len(&self) -> Option<usize> {
        None
    }

    /// Sequence element
    fn element(&self, _index: usize) -> Option<&dyn FieldValue> {
        None
    }

    /// Mutable sequence element
    fn element_mut(&mut self, _index: usize) -> Option<&mut dyn FieldValue> {
        None
    }

    /// Set the sequence length, filling with defaults; `false` if the
    /// sequence cannot take that length
    fn resize(&mut self, _len: usize) -> bool {
        false
    }

    /// Nested record view
    fn record(&self) -> Option<&dyn Record> {
        None
    }

    /// Mutable nested record view
    fn record_mut(&mut self) -> Option<&mut dyn Record> {
        None
    }

    /// Custom codec view
    fn codec(&self) -> Option<&dyn CustomCodec> {
        None
    }

    /// Mutable custom codec view
    fn codec_mut(&mut self) -> Option<&mut dyn CustomCodec> {
        None
    }

    /// Call `f` with the pointee; `false` if this is not a pointer
    ///
    /// An absent pointee is presented as its type's default value.
    fn with_pointee(&self, _f: &mut dyn FnMut(&dyn FieldValue)) -> bool {
        false
    }

    /// Mutable pointee, allocating a default one when absent
    fn pointee_mut(&mut self) -> Option<&mut dyn FieldValue> {
        None
    }

    /// True for an absent pointer
    fn is_null(&self) -> bool {
        false
    }
}

/// Static side of a field type: its declared kind
pub trait Wire: FieldValue + Sized + 'static {
    /// Declared kind of this type
    fn kind() -> Kind;

    /// View a slice of this type as raw bytes (only `u8` can)
    #[doc(hidden)]
    fn slice_bytes(_values: &[Self]) -> Option<&[u8]> {
        None
    }

    /// Fill `values` from raw bytes of the same length (only `u8` can)
    #[doc(hidden)]
    fn fill_from_bytes(_values: &mut [Self], _bytes: &[u8]) -> bool {
        false
    }
}

/// A record: an ordered set of annotated fields
pub trait Record: FieldValue {
    /// Introspect the declared fields, in declaration order
    fn fields() -> Vec<FieldDecl>
    where
        Self: Sized;

    /// Shape identity of this record
    fn record_type(&self) -> RecordType;

    /// Field by declared index
    fn field(&self, index: usize) -> Option<&dyn FieldValue>;

    /// Mutable field by declared index; `None` for opaque fields
    fn field_mut(&mut self, index: usize) -> Option<&mut dyn FieldValue>;
}
