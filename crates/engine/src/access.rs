//! Field access shared by every pass
//!
//! The passes (prepare, validate, size, encode, decode) all walk a schema
//! against a live record. This module holds the pieces they share: the
//! per-call [`Context`], pointer-transparent value access, and element
//! count resolution.

use std::sync::Arc;
use structpack_core::{
    ByteOrder, Count, CustomCodec, EncodingOptions, Error, FieldDescriptor, FieldSchema,
    FieldValue, Record, Result, SchemaCache, SchemaError, WireType,
};

/// Per-call state threaded through every pass
#[derive(Clone, Copy)]
pub(crate) struct Context<'a> {
    pub cache: &'a SchemaCache,
    pub options: &'a EncodingOptions,
}

impl<'a> Context<'a> {
    pub fn new(cache: &'a SchemaCache, options: &'a EncodingOptions) -> Self {
        Context { cache, options }
    }

    /// Schema of a nested record field
    pub fn schema(&self, field: &FieldDescriptor) -> Result<Arc<FieldSchema>> {
        let nested = field
            .nested
            .ok_or_else(|| Error::type_mismatch(field.name, "nested record", field.wire_type.name()))?;
        Ok(self.cache.schema(nested)?)
    }

    /// Byte order for this call
    pub fn order(&self, field: &FieldDescriptor) -> ByteOrder {
        self.options.effective_order(field.byte_order)
    }

    /// Wire type for this call
    pub fn wire(&self, field: &FieldDescriptor) -> WireType {
        field.effective_wire_type(self.options.int_width)
    }

    /// Element width for this call, for fixed-width elements
    pub fn width(&self, field: &FieldDescriptor) -> Option<usize> {
        field.element_width(self.options.int_width)
    }
}

pub(crate) fn field_ref<'r>(record: &'r dyn Record, field: &FieldDescriptor) -> Result<&'r dyn FieldValue> {
    record
        .field(field.declared_index)
        .ok_or_else(|| no_accessor(record.record_type().name(), field))
}

pub(crate) fn field_mut<'r>(
    record: &'r mut dyn Record,
    field: &FieldDescriptor,
) -> Result<&'r mut dyn FieldValue> {
    let name = record.record_type().name();
    record
        .field_mut(field.declared_index)
        .ok_or_else(|| no_accessor(name, field))
}

fn no_accessor(record: &str, field: &FieldDescriptor) -> Error {
    Error::BadArgument(format!("{} exposes no accessor for field {}", record, field.name))
}

/// Run `f` on the field's value, looking through a pointer if it has one
///
/// An absent pointee is seen as its type's default value.
pub(crate) fn view<T>(
    field: &FieldDescriptor,
    value: &dyn FieldValue,
    f: impl FnOnce(&dyn FieldValue) -> Result<T>,
) -> Result<T> {
    if !field.is_pointer {
        return f(value);
    }

    let mut f = Some(f);
    let mut out = None;
    value.with_pointee(&mut |pointee| {
        if let Some(f) = f.take() {
            out = Some(f(pointee));
        }
    });
    out.unwrap_or_else(|| Err(Error::type_mismatch(field.name, "pointer", "plain value")))
}

/// Mutable [`view`]; an absent pointee is allocated first
pub(crate) fn view_mut<T>(
    field: &FieldDescriptor,
    value: &mut dyn FieldValue,
    f: impl FnOnce(&mut dyn FieldValue) -> Result<T>,
) -> Result<T> {
    if !field.is_pointer {
        return f(value);
    }
    match value.pointee_mut() {
        Some(pointee) => f(pointee),
        None => Err(Error::type_mismatch(field.name, "pointer", "plain value")),
    }
}

pub(crate) fn as_record<'v>(field: &FieldDescriptor, value: &'v dyn FieldValue) -> Result<&'v dyn Record> {
    value
        .record()
        .ok_or_else(|| Error::type_mismatch(field.name, "record", "non-record value"))
}

pub(crate) fn as_record_mut<'v>(
    field: &FieldDescriptor,
    value: &'v mut dyn FieldValue,
) -> Result<&'v mut dyn Record> {
    value
        .record_mut()
        .ok_or_else(|| Error::type_mismatch(field.name, "record", "non-record value"))
}

pub(crate) fn as_codec<'v>(field: &FieldDescriptor, value: &'v dyn FieldValue) -> Result<&'v dyn CustomCodec> {
    value
        .codec()
        .ok_or_else(|| Error::type_mismatch(field.name, "custom codec", "plain value"))
}

pub(crate) fn as_codec_mut<'v>(
    field: &FieldDescriptor,
    value: &'v mut dyn FieldValue,
) -> Result<&'v mut dyn CustomCodec> {
    value
        .codec_mut()
        .ok_or_else(|| Error::type_mismatch(field.name, "custom codec", "plain value"))
}

/// Sequence element `index`, which must exist
pub(crate) fn element<'v>(
    field: &FieldDescriptor,
    value: &'v dyn FieldValue,
    index: usize,
    count: usize,
) -> Result<&'v dyn FieldValue> {
    value.element(index).ok_or_else(|| Error::ShapeMismatch {
        field: field.name.to_string(),
        expected: count,
        actual: value.seq_len().unwrap_or(0),
    })
}

/// Give a sequence exactly `count` elements
pub(crate) fn resize(field: &FieldDescriptor, value: &mut dyn FieldValue, count: usize) -> Result<()> {
    if value.resize(count) {
        Ok(())
    } else {
        Err(Error::ShapeMismatch {
            field: field.name.to_string(),
            expected: count,
            actual: value.seq_len().unwrap_or(0),
        })
    }
}

/// Runtime length of a sequence value
pub(crate) fn live_len(field: &FieldDescriptor, value: &dyn FieldValue) -> Result<usize> {
    view(field, value, |v| {
        v.seq_len()
            .ok_or_else(|| Error::type_mismatch(field.name, "sequence", "scalar"))
    })
}

/// Element count stored in size source `source`, on behalf of `sized`
pub(crate) fn stored_count(
    sized: &FieldDescriptor,
    source: &FieldDescriptor,
    value: &dyn FieldValue,
) -> Result<usize> {
    if source.custom {
        return value
            .codec()
            .and_then(|c| c.count())
            .ok_or_else(|| Error::type_mismatch(source.name, "length-carrying codec", "custom codec"));
    }

    let scalar = value
        .scalar()
        .ok_or_else(|| Error::type_mismatch(source.name, "integer", "non-scalar value"))?;
    scalar.to_count().map_err(|value| Error::InvalidLength {
        field: sized.name.to_string(),
        value,
    })
}

fn source_of<'s>(schema: &'s FieldSchema, field: &FieldDescriptor) -> Result<&'s FieldDescriptor> {
    let src = field.size_from.ok_or_else(|| {
        Error::Schema(SchemaError::NoSizeSource {
            field: field.name.to_string(),
        })
    })?;
    Ok(&schema.fields()[src])
}

/// Element count of field `pos` when packing or sizing
///
/// A `sizeof=`-linked field counts its live elements (the pre-pass writes
/// that same number into the source). A `sizefrom=`-only field takes the
/// source's current value.
pub(crate) fn pack_count(schema: &FieldSchema, record: &dyn Record, pos: usize) -> Result<usize> {
    let field = &schema.fields()[pos];
    match field.count {
        Count::Fixed(n) => Ok(n),
        Count::Variable => {
            let source = source_of(schema, field)?;
            if source.sizeof_target == Some(pos) {
                live_len(field, field_ref(record, field)?)
            } else {
                stored_count(field, source, field_ref(record, source)?)
            }
        }
    }
}

/// Element count of field `pos` when unpacking
///
/// Variable counts come from the already-decoded source field.
pub(crate) fn unpack_count(schema: &FieldSchema, record: &dyn Record, pos: usize) -> Result<usize> {
    let field = &schema.fields()[pos];
    match field.count {
        Count::Fixed(n) => Ok(n),
        Count::Variable => {
            let source = source_of(schema, field)?;
            stored_count(field, source, field_ref(record, source)?)
        }
    }
}

/// `length` argument for a scalar custom field's `unpack`
pub(crate) fn codec_length(schema: &FieldSchema, record: &dyn Record, pos: usize) -> Result<usize> {
    let field = &schema.fields()[pos];
    match field.size_from {
        Some(_) => {
            let source = source_of(schema, field)?;
            stored_count(field, source, field_ref(record, source)?)
        }
        None => Ok(field.fixed_count().unwrap_or(1)),
    }
}
