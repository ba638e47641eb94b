//! `sizeof=` pre-pass
//!
//! Before a record is sized or encoded, every `sizeof=` field is
//! overwritten with the live element count of its target, so the stream
//! always carries the real length regardless of what the field held.
//! Nested records (direct, behind pointers, in sequences) get the same
//! treatment. Absent pointees are left absent; they encode as defaults,
//! whose lengths are already consistent.

use crate::access::{self, Context};
use structpack_core::{Error, FieldDescriptor, FieldSchema, FieldValue, Record, Result, Scalar, WireType};

pub(crate) fn prepare_record(ctx: &Context<'_>, schema: &FieldSchema, record: &mut dyn Record) -> Result<()> {
    for field in schema.iter() {
        let Some(target_pos) = field.sizeof_target else {
            continue;
        };
        let target = &schema.fields()[target_pos];
        let len = target_length(ctx, target, access::field_ref(record, target)?)?;
        store_length(ctx, field, target, access::field_mut(record, field)?, len)?;
    }

    for field in schema.iter().filter(|f| f.nested.is_some() && !f.opaque) {
        let nested = ctx.schema(field)?;
        let value = access::field_mut(record, field)?;
        if field.is_pointer && value.is_null() {
            continue;
        }
        access::view_mut(field, value, |value| {
            if !field.shape.is_sequence() {
                return prepare_record(ctx, &nested, access::as_record_mut(field, value)?);
            }
            let len = value.seq_len().unwrap_or(0);
            for index in 0..len {
                if let Some(element) = value.element_mut(index).and_then(|e| e.record_mut()) {
                    prepare_record(ctx, &nested, element)?;
                }
            }
            Ok(())
        })?;
    }

    Ok(())
}

/// Live length of a `sizeof=` target
///
/// Sequences report their element count; a scalar custom field reports its
/// encoded size.
fn target_length(ctx: &Context<'_>, target: &FieldDescriptor, value: &dyn FieldValue) -> Result<usize> {
    access::view(target, value, |value| {
        if target.custom && !target.shape.is_sequence() {
            return Ok(access::as_codec(target, value)?.size(ctx.options));
        }
        value
            .seq_len()
            .ok_or_else(|| Error::type_mismatch(target.name, "sequence", "scalar"))
    })
}

fn store_length(
    ctx: &Context<'_>,
    field: &FieldDescriptor,
    target: &FieldDescriptor,
    value: &mut dyn FieldValue,
    len: usize,
) -> Result<()> {
    if field.custom {
        let stored = value.codec_mut().map_or(false, |codec| codec.set_count(len));
        return if stored {
            Ok(())
        } else {
            Err(Error::type_mismatch(field.name, "length-carrying codec", "custom codec"))
        };
    }

    if !fits(ctx.wire(field), len) {
        return Err(Error::InvalidLength {
            field: target.name.to_string(),
            value: len as i128,
        });
    }
    if !value.set_scalar(Scalar::Uint(len as u64)) {
        return Err(Error::type_mismatch(field.name, field.wire_type.name(), "non-integer value"));
    }

    // The field's own type may be narrower than its wire type
    if value.scalar().map(Scalar::to_count) != Some(Ok(len)) {
        return Err(Error::InvalidLength {
            field: target.name.to_string(),
            value: len as i128,
        });
    }
    Ok(())
}

/// Whether `len` survives encoding as `wire`
fn fits(wire: WireType, len: usize) -> bool {
    match wire.width() {
        Some(width) if wire.is_integer() => {
            let bits = width as u32 * 8 - wire.is_signed() as u32;
            (len as u128) < (1u128 << bits)
        }
        _ => true,
    }
}
