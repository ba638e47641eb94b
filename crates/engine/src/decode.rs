//! Unpack: one forward pass over the source
//!
//! Fields are decoded in schema order, so a `sizefrom` count is always read
//! from a source field decoded earlier in the same pass. Every read
//! consumes exactly its width or fails with `Error::UnexpectedEof`.

use crate::access::{self, Context};
use crate::{scalar, size};
use std::io::{self, Read};
use structpack_core::{Error, FieldDescriptor, FieldSchema, FieldValue, Record, Result, Scalar, WireType};

/// Reader that counts consumed bytes
///
/// Tells a clean end of input (nothing consumed) apart from a truncated
/// record.
pub(crate) struct Counting<R> {
    inner: R,
    consumed: u64,
}

impl<R: Read> Counting<R> {
    pub fn new(inner: R) -> Self {
        Counting { inner, consumed: 0 }
    }

    /// Map an EOF before the first byte to `Error::EndOfInput`
    pub fn finish(&self, result: Result<()>) -> Result<()> {
        match result {
            Err(Error::UnexpectedEof) if self.consumed == 0 => Err(Error::EndOfInput),
            other => other,
        }
    }
}

impl<R: Read> Read for Counting<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.consumed += n as u64;
        Ok(n)
    }
}

pub(crate) fn decode_record(
    ctx: &Context<'_>,
    schema: &FieldSchema,
    record: &mut dyn Record,
    r: &mut dyn Read,
) -> Result<()> {
    for (pos, field) in schema.iter().enumerate() {
        let count = access::unpack_count(schema, record, pos)?;

        if field.opaque {
            let n = size::field_size(ctx, field, record, count)?;
            skip(r, n)?;
            continue;
        }

        if field.custom && !field.shape.is_sequence() {
            let length = access::codec_length(schema, record, pos)?;
            let value = access::field_mut(record, field)?;
            access::view_mut(field, value, |value| {
                access::as_codec_mut(field, value)?.unpack(r, length, ctx.options)
            })?;
            continue;
        }

        decode_value(ctx, field, access::field_mut(record, field)?, count, r)?;
    }
    Ok(())
}

pub(crate) fn decode_value(
    ctx: &Context<'_>,
    field: &FieldDescriptor,
    value: &mut dyn FieldValue,
    count: usize,
    r: &mut dyn Read,
) -> Result<()> {
    let wire = ctx.wire(field);
    if wire == WireType::Pad {
        return skip(r, count);
    }

    access::view_mut(field, value, |value| {
        if field.custom {
            if !field.shape.is_sequence() {
                return access::as_codec_mut(field, value)?.unpack(r, count, ctx.options);
            }
            return decode_elements(field, value, count, |element| {
                access::as_codec_mut(field, element)?.unpack(r, 1, ctx.options)
            });
        }

        if field.nested.is_some() {
            let schema = ctx.schema(field)?;
            if !field.shape.is_sequence() {
                return decode_record(ctx, &schema, access::as_record_mut(field, value)?, r);
            }
            return decode_elements(field, value, count, |element| {
                decode_record(ctx, &schema, access::as_record_mut(field, element)?, r)
            });
        }

        let order = ctx.order(field);
        if !field.shape.is_sequence() {
            let scalar = scalar::read(r, wire, order, field.name)?;
            return store(field, wire, value, scalar);
        }

        if wire.is_byte() && value.bytes().is_some() {
            let mut buf = Vec::new();
            Read::take(&mut *r, count as u64).read_to_end(&mut buf)?;
            if buf.len() < count {
                return Err(Error::UnexpectedEof);
            }
            if !value.set_bytes(&buf) {
                return Err(Error::type_mismatch(field.name, "valid UTF-8", "arbitrary bytes"));
            }
            return Ok(());
        }

        decode_elements(field, value, count, |element| {
            let scalar = scalar::read(r, wire, order, field.name)?;
            store(field, wire, element, scalar)
        })
    })
}

/// Decode `count` elements into a sequence
///
/// A sequence whose length differs from `count` is regrown one element at
/// a time, so its allocation never runs ahead of the bytes actually read.
fn decode_elements(
    field: &FieldDescriptor,
    value: &mut dyn FieldValue,
    count: usize,
    mut decode: impl FnMut(&mut dyn FieldValue) -> Result<()>,
) -> Result<()> {
    let grow = value.seq_len() != Some(count);
    if grow && !value.resize(0) {
        return Err(Error::ShapeMismatch {
            field: field.name.to_string(),
            expected: count,
            actual: value.seq_len().unwrap_or(0),
        });
    }
    for index in 0..count {
        if grow {
            access::resize(field, value, index + 1)?;
        }
        decode(element_mut(field, value, index, count)?)?;
    }
    Ok(())
}

fn store(field: &FieldDescriptor, wire: WireType, value: &mut dyn FieldValue, scalar: Scalar) -> Result<()> {
    if value.set_scalar(scalar) {
        Ok(())
    } else {
        Err(Error::type_mismatch(field.name, wire.name(), "a field that cannot hold it"))
    }
}

fn element_mut<'v>(
    field: &FieldDescriptor,
    value: &'v mut dyn FieldValue,
    index: usize,
    count: usize,
) -> Result<&'v mut dyn FieldValue> {
    let len = value.seq_len().unwrap_or(0);
    value.element_mut(index).ok_or_else(|| Error::ShapeMismatch {
        field: field.name.to_string(),
        expected: count,
        actual: len,
    })
}

/// Consume and discard exactly `n` bytes
fn skip(r: &mut dyn Read, n: usize) -> Result<()> {
    let copied = io::copy(&mut Read::take(&mut *r, n as u64), &mut io::sink())?;
    if copied < n as u64 {
        return Err(Error::UnexpectedEof);
    }
    Ok(())
}
