//! Direct slice encoder

use crate::access::{self, Context};
use crate::{scalar, size};
use structpack_core::{Error, FieldDescriptor, FieldSchema, FieldValue, Record, Result, WireType};

/// Write position within the output slice
struct Cursor<'b> {
    buf: &'b mut [u8],
    pos: usize,
}

impl<'b> Cursor<'b> {
    fn new(buf: &'b mut [u8]) -> Self {
        Cursor { buf, pos: 0 }
    }

    /// Claim the next `n` bytes
    fn take(&mut self, n: usize, field: &str) -> Result<&mut [u8]> {
        let end = self.pos + n;
        if end > self.buf.len() {
            return Err(Error::ShapeMismatch {
                field: field.to_string(),
                expected: n,
                actual: self.buf.len() - self.pos,
            });
        }
        let start = self.pos;
        self.pos = end;
        Ok(&mut self.buf[start..end])
    }
}

/// Encode a record into `buf`; returns the number of bytes written
pub(crate) fn encode_record(
    ctx: &Context<'_>,
    schema: &FieldSchema,
    record: &dyn Record,
    buf: &mut [u8],
) -> Result<usize> {
    let mut cursor = Cursor::new(buf);
    record_into(ctx, schema, record, &mut cursor)?;
    Ok(cursor.pos)
}

/// Encode a single value into `buf`; returns the number of bytes written
pub(crate) fn encode_value(
    ctx: &Context<'_>,
    field: &FieldDescriptor,
    value: &dyn FieldValue,
    count: usize,
    buf: &mut [u8],
) -> Result<usize> {
    let mut cursor = Cursor::new(buf);
    value_into(ctx, field, value, count, &mut cursor)?;
    Ok(cursor.pos)
}

fn record_into(ctx: &Context<'_>, schema: &FieldSchema, record: &dyn Record, cursor: &mut Cursor<'_>) -> Result<()> {
    for (pos, field) in schema.iter().enumerate() {
        let count = access::pack_count(schema, record, pos)?;
        if field.opaque {
            let n = size::field_size(ctx, field, record, count)?;
            cursor.take(n, field.name)?.fill(0);
            continue;
        }
        value_into(ctx, field, access::field_ref(record, field)?, count, cursor)?;
    }
    Ok(())
}

fn value_into(
    ctx: &Context<'_>,
    field: &FieldDescriptor,
    value: &dyn FieldValue,
    count: usize,
    cursor: &mut Cursor<'_>,
) -> Result<()> {
    let wire = ctx.wire(field);
    if wire == WireType::Pad {
        cursor.take(count, field.name)?.fill(0);
        return Ok(());
    }

    access::view(field, value, |value| {
        if field.custom {
            return codecs_into(ctx, field, value, count, cursor);
        }
        if field.nested.is_some() {
            let schema = ctx.schema(field)?;
            if !field.shape.is_sequence() {
                return record_into(ctx, &schema, access::as_record(field, value)?, cursor);
            }
            for index in 0..count {
                let element = access::element(field, value, index, count)?;
                record_into(ctx, &schema, access::as_record(field, element)?, cursor)?;
            }
            return Ok(());
        }

        let order = ctx.order(field);
        let width = wire.width().unwrap_or(1);
        if !field.shape.is_sequence() {
            let scalar = value
                .scalar()
                .ok_or_else(|| Error::type_mismatch(field.name, wire.name(), "non-scalar value"))?;
            return scalar::put(cursor.take(width, field.name)?, wire, order, scalar, field.name);
        }

        if wire.is_byte() {
            if let Some(bytes) = value.bytes() {
                if bytes.len() != count {
                    return Err(Error::ShapeMismatch {
                        field: field.name.to_string(),
                        expected: count,
                        actual: bytes.len(),
                    });
                }
                cursor.take(count, field.name)?.copy_from_slice(bytes);
                return Ok(());
            }
        }

        for index in 0..count {
            let scalar = access::element(field, value, index, count)?
                .scalar()
                .ok_or_else(|| Error::type_mismatch(field.name, wire.name(), "non-scalar value"))?;
            scalar::put(cursor.take(width, field.name)?, wire, order, scalar, field.name)?;
        }
        Ok(())
    })
}

fn codecs_into(
    ctx: &Context<'_>,
    field: &FieldDescriptor,
    value: &dyn FieldValue,
    count: usize,
    cursor: &mut Cursor<'_>,
) -> Result<()> {
    if !field.shape.is_sequence() {
        let codec = access::as_codec(field, value)?;
        let slot = cursor.take(codec.size(ctx.options), field.name)?;
        slot.fill(0);
        codec.pack(slot, ctx.options)?;
        return Ok(());
    }
    for index in 0..count {
        let codec = access::as_codec(field, access::element(field, value, index, count)?)?;
        let slot = cursor.take(codec.size(ctx.options), field.name)?;
        slot.fill(0);
        codec.pack(slot, ctx.options)?;
    }
    Ok(())
}
