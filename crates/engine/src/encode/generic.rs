//! Shape-tolerant stream encoder

use crate::access::{self, Context};
use crate::{scalar, size};
use std::io::{self, Read, Write};
use structpack_core::{CustomCodec, Error, FieldDescriptor, FieldSchema, FieldValue, Record, Result, WireType};

pub(crate) fn encode_record<W: Write + ?Sized>(
    ctx: &Context<'_>,
    schema: &FieldSchema,
    record: &dyn Record,
    w: &mut W,
) -> Result<()> {
    for (pos, field) in schema.iter().enumerate() {
        let count = access::pack_count(schema, record, pos)?;
        if field.opaque {
            let n = size::field_size(ctx, field, record, count)?;
            zeros(w, n)?;
            continue;
        }
        encode_value(ctx, field, access::field_ref(record, field)?, count, w)?;
    }
    Ok(())
}

pub(crate) fn encode_value<W: Write + ?Sized>(
    ctx: &Context<'_>,
    field: &FieldDescriptor,
    value: &dyn FieldValue,
    count: usize,
    w: &mut W,
) -> Result<()> {
    let wire = ctx.wire(field);
    if wire == WireType::Pad {
        return zeros(w, count);
    }

    access::view(field, value, |value| {
        if field.custom {
            return encode_codecs(ctx, field, value, count, w);
        }
        if field.nested.is_some() {
            let schema = ctx.schema(field)?;
            if !field.shape.is_sequence() {
                return encode_record(ctx, &schema, access::as_record(field, value)?, w);
            }
            for index in 0..count {
                let element = access::element(field, value, index, count)?;
                encode_record(ctx, &schema, access::as_record(field, element)?, w)?;
            }
            return Ok(());
        }

        let order = ctx.order(field);
        if !field.shape.is_sequence() {
            let scalar = value
                .scalar()
                .ok_or_else(|| Error::type_mismatch(field.name, wire.name(), "non-scalar value"))?;
            return scalar::write(w, wire, order, scalar, field.name);
        }

        let len = value.seq_len().unwrap_or(0);
        let present = len.min(count);

        if wire.is_byte() {
            if let Some(bytes) = value.bytes() {
                w.write_all(&bytes[..present])?;
                return zeros(w, count - present);
            }
        }

        for index in 0..present {
            let scalar = access::element(field, value, index, count)?
                .scalar()
                .ok_or_else(|| Error::type_mismatch(field.name, wire.name(), "non-scalar value"))?;
            scalar::write(w, wire, order, scalar, field.name)?;
        }
        zeros(w, size::span(field, wire.width().unwrap_or(1), count - present)?)
    })
}

fn encode_codecs<W: Write + ?Sized>(
    ctx: &Context<'_>,
    field: &FieldDescriptor,
    value: &dyn FieldValue,
    count: usize,
    w: &mut W,
) -> Result<()> {
    if !field.shape.is_sequence() {
        return encode_codec(ctx, access::as_codec(field, value)?, w);
    }
    for index in 0..count {
        let element = access::element(field, value, index, count)?;
        encode_codec(ctx, access::as_codec(field, element)?, w)?;
    }
    Ok(())
}

fn encode_codec<W: Write + ?Sized>(
    ctx: &Context<'_>,
    codec: &dyn CustomCodec,
    w: &mut W,
) -> Result<()> {
    let mut buf = vec![0u8; codec.size(ctx.options)];
    codec.pack(&mut buf, ctx.options)?;
    w.write_all(&buf)?;
    Ok(())
}

fn zeros<W: Write + ?Sized>(w: &mut W, n: usize) -> Result<()> {
    io::copy(&mut io::repeat(0).take(n as u64), w)?;
    Ok(())
}
