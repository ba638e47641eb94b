//! Resolved field descriptors and the per-record field schema

use crate::record::RecordType;
use crate::wire_type::{ByteOrder, IntWidth, WireType};
use std::fmt;

/// Container shape of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerShape {
    /// A single value
    Scalar,
    /// A fixed number of elements
    FixedArray(usize),
    /// A runtime-determined number of elements
    OpenSlice,
    /// Text; a runtime-determined number of bytes
    StringLike,
}

impl ContainerShape {
    /// True for every shape holding more than one element
    pub fn is_sequence(self) -> bool {
        !matches!(self, ContainerShape::Scalar)
    }
}

/// Resolved element count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Count {
    /// Known at schema-build time
    Fixed(usize),
    /// Determined at runtime by the field's size source
    Variable,
}

/// One resolved field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name
    pub name: &'static str,
    /// Position in the record's declaration (accessor index)
    pub declared_index: usize,
    /// Element wire type
    ///
    /// `Struct` for nested records and for custom codec fields, which are
    /// sized by their codec.
    pub wire_type: WireType,
    /// Container shape
    pub shape: ContainerShape,
    /// Element count
    pub count: Count,
    /// Resolved byte order; a per-call override takes precedence
    pub byte_order: ByteOrder,
    /// Platform-width integer whose wire width comes from the call options
    pub native_int: bool,
    /// The value sits behind a pointer
    pub is_pointer: bool,
    /// Nested record shape, for record fields and record sequences
    pub nested: Option<RecordType>,
    /// Elements encode through their own `CustomCodec`
    pub custom: bool,
    /// The record cannot write this field back
    pub opaque: bool,
    /// Schema position of the field whose length this field carries
    pub sizeof_target: Option<usize>,
    /// Schema position of the field supplying this field's count
    pub size_from: Option<usize>,
}

impl FieldDescriptor {
    /// True for nested record fields
    pub fn is_nested_struct(&self) -> bool {
        self.nested.is_some()
    }

    /// Wire type for this call
    ///
    /// Platform-width integers take their width from `int_width`.
    pub fn effective_wire_type(&self, int_width: IntWidth) -> WireType {
        if self.native_int {
            WireType::integer(int_width, self.wire_type.is_signed())
        } else {
            self.wire_type
        }
    }

    /// Width of one element, if the wire type has a fixed one
    pub fn element_width(&self, int_width: IntWidth) -> Option<usize> {
        if self.custom || self.nested.is_some() {
            return None;
        }
        self.effective_wire_type(int_width).width()
    }

    /// Element count known without looking at any value
    pub fn fixed_count(&self) -> Option<usize> {
        match self.count {
            Count::Fixed(n) => Some(n),
            Count::Variable => None,
        }
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.wire_type == WireType::Pad {
            return match self.count {
                Count::Fixed(n) => write!(f, "{{{}: pad, len: {}}}", self.name, n),
                Count::Variable => write!(f, "{{{}: pad}}", self.name),
            };
        }

        let type_name = match (&self.nested, self.custom) {
            (Some(rt), _) => rt.name(),
            (None, true) => "custom",
            (None, false) => self.wire_type.name(),
        };
        write!(f, "{{{}: {}, order: {}", self.name, type_name, self.byte_order)?;
        if self.is_pointer {
            f.write_str(", pointer")?;
        }
        if let Some(src) = self.size_from {
            write!(f, ", sizefrom: {}", src)?;
        } else if let Count::Fixed(n) = self.count {
            if self.shape.is_sequence() {
                write!(f, ", len: {}", n)?;
            }
        }
        if let Some(target) = self.sizeof_target {
            write!(f, ", sizeof: {}", target)?;
        }
        f.write_str("}")
    }
}

/// Ordered, immutable field descriptors of one record shape
///
/// Shared read-only (behind an `Arc`) by every call on that shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    record: RecordType,
    fields: Vec<FieldDescriptor>,
}

impl FieldSchema {
    pub(crate) fn new(record: RecordType, fields: Vec<FieldDescriptor>) -> Self {
        FieldSchema { record, fields }
    }

    /// Record shape this schema describes
    pub fn record_type(&self) -> RecordType {
        self.record
    }

    /// Descriptors in wire order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Descriptor at a schema position
    pub fn get(&self, position: usize) -> Option<&FieldDescriptor> {
        self.fields.get(position)
    }

    /// Descriptor by field name
    pub fn find(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Number of wire fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when there are no wire fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate descriptors in wire order
    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }

    /// Nested record shapes referenced by this schema
    pub fn nested_types(&self) -> impl Iterator<Item = RecordType> + '_ {
        self.fields.iter().filter_map(|f| f.nested)
    }
}

impl<'a> IntoIterator for &'a FieldSchema {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl fmt::Display for FieldSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", field)?;
        }
        f.write_str("}")
    }
}
