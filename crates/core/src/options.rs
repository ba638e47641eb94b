//! Per-call encoding options

use crate::wire_type::{ByteOrder, IntWidth};

/// Options supplied to a single pack/unpack/size call
///
/// Never stored in a schema. A byte order override applies to every field
/// of the call, nested records included, and leaves the cached schema
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodingOptions {
    /// Byte order for every field, replacing the resolved per-field order
    pub byte_order: Option<ByteOrder>,
    /// Wire width of `isize`/`usize` fields with no explicit type
    pub int_width: IntWidth,
}

impl EncodingOptions {
    /// Default options: schema byte order, 32-bit platform integers
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the byte order of every field
    pub fn with_byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = Some(order);
        self
    }

    /// Set the wire width of platform-width integers
    pub fn with_int_width(mut self, width: IntWidth) -> Self {
        self.int_width = width;
        self
    }

    /// Byte order to use for a field resolved with `resolved`
    #[inline]
    pub fn effective_order(&self, resolved: ByteOrder) -> ByteOrder {
        self.byte_order.unwrap_or(resolved)
    }
}
