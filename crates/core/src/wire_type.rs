//! Wire type registry
//!
//! The closed set of primitive on-the-wire encodings, their byte widths, and
//! the names the annotation parser recognizes for them.
//!
//! | Name | WireType | Width |
//! |------|----------|-------|
//! | `pad` | Pad | 1 per element |
//! | `bool` | Bool | 1 |
//! | `int8`, `uint8`, `byte` | Int8, Uint8 | 1 |
//! | `int16`, `uint16` | Int16, Uint16 | 2 |
//! | `int32`, `uint32`, `float32` | Int32, Uint32, Float32 | 4 |
//! | `int64`, `uint64`, `float64` | Int64, Uint64, Float64 | 8 |
//! | `string` | String | 1 per element |
//!
//! `Struct` and `Pointer` are container markers with no width of their own.

use std::fmt;

/// Primitive wire encoding of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    /// Zero bytes, one per element
    Pad,
    /// One byte, 0 or 1
    Bool,
    /// Signed 8-bit integer
    Int8,
    /// Unsigned 8-bit integer
    Uint8,
    /// Signed 16-bit integer
    Int16,
    /// Unsigned 16-bit integer
    Uint16,
    /// Signed 32-bit integer
    Int32,
    /// Unsigned 32-bit integer
    Uint32,
    /// Signed 64-bit integer
    Int64,
    /// Unsigned 64-bit integer
    Uint64,
    /// IEEE-754 single precision
    Float32,
    /// IEEE-754 double precision
    Float64,
    /// Raw byte sequence, one byte per element
    String,
    /// Nested record
    Struct,
    /// Indirection to another value
    Pointer,
}

impl WireType {
    /// Byte width of one element
    ///
    /// `None` for the container markers, whose size is that of the value
    /// they wrap.
    pub fn width(self) -> Option<usize> {
        match self {
            WireType::Pad | WireType::String => Some(1),
            WireType::Bool | WireType::Int8 | WireType::Uint8 => Some(1),
            WireType::Int16 | WireType::Uint16 => Some(2),
            WireType::Int32 | WireType::Uint32 | WireType::Float32 => Some(4),
            WireType::Int64 | WireType::Uint64 | WireType::Float64 => Some(8),
            WireType::Struct | WireType::Pointer => None,
        }
    }

    /// Look up a wire type by its annotation name
    pub fn from_name(name: &str) -> Option<WireType> {
        let wire = match name {
            "pad" => WireType::Pad,
            "bool" => WireType::Bool,
            "byte" | "uint8" => WireType::Uint8,
            "int8" => WireType::Int8,
            "int16" => WireType::Int16,
            "uint16" => WireType::Uint16,
            "int32" => WireType::Int32,
            "uint32" => WireType::Uint32,
            "int64" => WireType::Int64,
            "uint64" => WireType::Uint64,
            "float32" => WireType::Float32,
            "float64" => WireType::Float64,
            "string" => WireType::String,
            _ => return None,
        };
        Some(wire)
    }

    /// Canonical annotation name
    pub fn name(self) -> &'static str {
        match self {
            WireType::Pad => "pad",
            WireType::Bool => "bool",
            WireType::Int8 => "int8",
            WireType::Uint8 => "uint8",
            WireType::Int16 => "int16",
            WireType::Uint16 => "uint16",
            WireType::Int32 => "int32",
            WireType::Uint32 => "uint32",
            WireType::Int64 => "int64",
            WireType::Uint64 => "uint64",
            WireType::Float32 => "float32",
            WireType::Float64 => "float64",
            WireType::String => "string",
            WireType::Struct => "struct",
            WireType::Pointer => "pointer",
        }
    }

    /// Integer wire types (signed or unsigned)
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            WireType::Int8
                | WireType::Uint8
                | WireType::Int16
                | WireType::Uint16
                | WireType::Int32
                | WireType::Uint32
                | WireType::Int64
                | WireType::Uint64
        )
    }

    /// Signed integer wire types
    pub fn is_signed(self) -> bool {
        matches!(
            self,
            WireType::Int8 | WireType::Int16 | WireType::Int32 | WireType::Int64
        )
    }

    /// Float wire types
    pub fn is_float(self) -> bool {
        matches!(self, WireType::Float32 | WireType::Float64)
    }

    /// One-byte element types that can be copied as raw bytes
    pub fn is_byte(self) -> bool {
        matches!(self, WireType::Uint8 | WireType::Int8 | WireType::String)
    }

    /// Signed or unsigned integer of the given width
    pub fn integer(width: IntWidth, signed: bool) -> WireType {
        match (width, signed) {
            (IntWidth::W8, true) => WireType::Int8,
            (IntWidth::W8, false) => WireType::Uint8,
            (IntWidth::W16, true) => WireType::Int16,
            (IntWidth::W16, false) => WireType::Uint16,
            (IntWidth::W32, true) => WireType::Int32,
            (IntWidth::W32, false) => WireType::Uint32,
            (IntWidth::W64, true) => WireType::Int64,
            (IntWidth::W64, false) => WireType::Uint64,
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Byte order of multi-byte values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
    /// Most significant byte first (the default)
    #[default]
    Big,
    /// Least significant byte first
    Little,
}

impl ByteOrder {
    /// Byte order of the host
    ///
    /// Only for callers that explicitly ask for it; schemas never fall back
    /// to it.
    pub fn native() -> ByteOrder {
        if cfg!(target_endian = "little") {
            ByteOrder::Little
        } else {
            ByteOrder::Big
        }
    }

    /// Parse an annotation token
    pub fn from_name(name: &str) -> Option<ByteOrder> {
        match name {
            "big" => Some(ByteOrder::Big),
            "little" => Some(ByteOrder::Little),
            _ => None,
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteOrder::Big => f.write_str("big"),
            ByteOrder::Little => f.write_str("little"),
        }
    }
}

/// Wire width used for platform-width integers (`isize`/`usize`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IntWidth {
    /// 1 byte
    W8,
    /// 2 bytes
    W16,
    /// 4 bytes
    #[default]
    W32,
    /// 8 bytes
    W64,
}

impl IntWidth {
    /// Width from a bit count (8/16/32/64)
    pub fn from_bits(bits: u32) -> Option<IntWidth> {
        match bits {
            8 => Some(IntWidth::W8),
            16 => Some(IntWidth::W16),
            32 => Some(IntWidth::W32),
            64 => Some(IntWidth::W64),
            _ => None,
        }
    }

    /// Width in bytes
    pub fn bytes(self) -> usize {
        match self {
            IntWidth::W8 => 1,
            IntWidth::W16 => 2,
            IntWidth::W32 => 4,
            IntWidth::W64 => 8,
        }
    }
}
