//! Encoded size computation
//!
//! Fixed-width elements contribute `width * count`, custom codecs their
//! reported size, nested records their own computed size. Pointers are
//! dereferenced; an absent pointee is sized as its default. A total that
//! overflows `usize` is an `Error::InvalidLength` on the offending field.

use crate::access::{self, Context};
use structpack_core::{Error, FieldDescriptor, FieldSchema, FieldValue, Record, Result};

pub(crate) fn record_size(ctx: &Context<'_>, schema: &FieldSchema, record: &dyn Record) -> Result<usize> {
    let mut total = 0usize;
    for (pos, field) in schema.iter().enumerate() {
        let count = access::pack_count(schema, record, pos)?;
        total = total
            .checked_add(field_size(ctx, field, record, count)?)
            .ok_or_else(|| too_large(field, count))?;
    }
    Ok(total)
}

/// Bytes taken by `count` elements of `width` bytes each
pub(crate) fn span(field: &FieldDescriptor, width: usize, count: usize) -> Result<usize> {
    width.checked_mul(count).ok_or_else(|| too_large(field, count))
}

fn too_large(field: &FieldDescriptor, count: usize) -> Error {
    Error::InvalidLength {
        field: field.name.to_string(),
        value: count as i128,
    }
}

/// Bytes a field occupies, opaque fields included
pub(crate) fn field_size(ctx: &Context<'_>, field: &FieldDescriptor, record: &dyn Record, count: usize) -> Result<usize> {
    if let Some(width) = ctx.width(field) {
        return span(field, width, count);
    }
    match record.field(field.declared_index) {
        Some(value) => value_size(ctx, field, value, count),
        None => Err(Error::BadArgument(format!(
            "cannot size field {} without reading it",
            field.name
        ))),
    }
}

pub(crate) fn value_size(
    ctx: &Context<'_>,
    field: &FieldDescriptor,
    value: &dyn FieldValue,
    count: usize,
) -> Result<usize> {
    if let Some(width) = ctx.width(field) {
        return span(field, width, count);
    }

    access::view(field, value, |value| {
        if field.custom {
            if !field.shape.is_sequence() {
                return Ok(access::as_codec(field, value)?.size(ctx.options));
            }
            let mut total = 0usize;
            for index in 0..count {
                let element = access::element(field, value, index, count)?;
                total = total
                    .checked_add(access::as_codec(field, element)?.size(ctx.options))
                    .ok_or_else(|| too_large(field, count))?;
            }
            return Ok(total);
        }

        let schema = ctx.schema(field)?;
        if !field.shape.is_sequence() {
            return record_size(ctx, &schema, access::as_record(field, value)?);
        }
        let mut total = 0usize;
        for index in 0..count {
            let element = access::element(field, value, index, count)?;
            total = total
                .checked_add(record_size(ctx, &schema, access::as_record(field, element)?)?)
                .ok_or_else(|| too_large(field, count))?;
        }
        Ok(total)
    })
}
