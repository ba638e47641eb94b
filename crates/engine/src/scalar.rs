//! Fixed-width scalar codec
//!
//! Three entry points over the same wire rules: [`put`] writes into a slice
//! (fast path), [`write`] goes through `io::Write` (generic path), [`read`]
//! decodes from `io::Read`. Integers are written as their two's complement
//! bit pattern truncated to the wire width; floats as IEEE-754 bits.

use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};
use structpack_core::{ByteOrder, Error, Result, Scalar, WireType};

/// Encode one element into `buf`, which is exactly the wire width long
pub(crate) fn put(buf: &mut [u8], wire: WireType, order: ByteOrder, value: Scalar, field: &str) -> Result<()> {
    match order {
        ByteOrder::Big => put_with::<BigEndian>(buf, wire, value, field),
        ByteOrder::Little => put_with::<LittleEndian>(buf, wire, value, field),
    }
}

fn put_with<B: byteorder::ByteOrder>(buf: &mut [u8], wire: WireType, value: Scalar, field: &str) -> Result<()> {
    match wire {
        WireType::Float32 => B::write_f32(buf, float(wire, value, field)? as f32),
        WireType::Float64 => B::write_f64(buf, float(wire, value, field)?),
        WireType::Bool => buf[0] = (bits(wire, value, field)? != 0) as u8,
        WireType::Int8 | WireType::Uint8 | WireType::String => buf[0] = bits(wire, value, field)? as u8,
        WireType::Int16 | WireType::Uint16 => B::write_u16(buf, bits(wire, value, field)? as u16),
        WireType::Int32 | WireType::Uint32 => B::write_u32(buf, bits(wire, value, field)? as u32),
        WireType::Int64 | WireType::Uint64 => B::write_u64(buf, bits(wire, value, field)?),
        WireType::Pad | WireType::Struct | WireType::Pointer => return Err(not_scalar(wire, field)),
    }
    Ok(())
}

/// Encode one element onto a writer
pub(crate) fn write<W: Write + ?Sized>(
    w: &mut W,
    wire: WireType,
    order: ByteOrder,
    value: Scalar,
    field: &str,
) -> Result<()> {
    match order {
        ByteOrder::Big => write_with::<BigEndian, W>(w, wire, value, field),
        ByteOrder::Little => write_with::<LittleEndian, W>(w, wire, value, field),
    }
}

fn write_with<B: byteorder::ByteOrder, W: Write + ?Sized>(
    w: &mut W,
    wire: WireType,
    value: Scalar,
    field: &str,
) -> Result<()> {
    match wire {
        WireType::Float32 => w.write_f32::<B>(float(wire, value, field)? as f32)?,
        WireType::Float64 => w.write_f64::<B>(float(wire, value, field)?)?,
        WireType::Bool => w.write_u8((bits(wire, value, field)? != 0) as u8)?,
        WireType::Int8 | WireType::Uint8 | WireType::String => w.write_u8(bits(wire, value, field)? as u8)?,
        WireType::Int16 | WireType::Uint16 => w.write_u16::<B>(bits(wire, value, field)? as u16)?,
        WireType::Int32 | WireType::Uint32 => w.write_u32::<B>(bits(wire, value, field)? as u32)?,
        WireType::Int64 | WireType::Uint64 => w.write_u64::<B>(bits(wire, value, field)?)?,
        WireType::Pad | WireType::Struct | WireType::Pointer => return Err(not_scalar(wire, field)),
    }
    Ok(())
}

/// Decode one element
///
/// Signed wire types decode to `Scalar::Int`, unsigned ones to
/// `Scalar::Uint`, so narrowing into the field is a plain cast.
pub(crate) fn read(r: &mut dyn Read, wire: WireType, order: ByteOrder, field: &str) -> Result<Scalar> {
    match order {
        ByteOrder::Big => read_with::<BigEndian>(r, wire, field),
        ByteOrder::Little => read_with::<LittleEndian>(r, wire, field),
    }
}

fn read_with<B: byteorder::ByteOrder>(r: &mut dyn Read, wire: WireType, field: &str) -> Result<Scalar> {
    let value = match wire {
        WireType::Bool => Scalar::Bool(r.read_u8()? != 0),
        WireType::Int8 => Scalar::Int(r.read_i8()? as i64),
        WireType::Uint8 | WireType::String => Scalar::Uint(r.read_u8()? as u64),
        WireType::Int16 => Scalar::Int(r.read_i16::<B>()? as i64),
        WireType::Uint16 => Scalar::Uint(r.read_u16::<B>()? as u64),
        WireType::Int32 => Scalar::Int(r.read_i32::<B>()? as i64),
        WireType::Uint32 => Scalar::Uint(r.read_u32::<B>()? as u64),
        WireType::Int64 => Scalar::Int(r.read_i64::<B>()?),
        WireType::Uint64 => Scalar::Uint(r.read_u64::<B>()?),
        WireType::Float32 => Scalar::Float(r.read_f32::<B>()? as f64),
        WireType::Float64 => Scalar::Float(r.read_f64::<B>()?),
        WireType::Pad | WireType::Struct | WireType::Pointer => return Err(not_scalar(wire, field)),
    };
    Ok(value)
}

/// Check that `value` can be written as `wire` without writing it
pub(crate) fn check(wire: WireType, value: Scalar, field: &str) -> Result<()> {
    if wire.is_float() {
        float(wire, value, field).map(|_| ())
    } else {
        bits(wire, value, field).map(|_| ())
    }
}

fn bits(wire: WireType, value: Scalar, field: &str) -> Result<u64> {
    value
        .to_bits()
        .ok_or_else(|| Error::type_mismatch(field, wire.name(), value.type_name()))
}

fn float(wire: WireType, value: Scalar, field: &str) -> Result<f64> {
    value
        .to_float()
        .ok_or_else(|| Error::type_mismatch(field, wire.name(), value.type_name()))
}

fn not_scalar(wire: WireType, field: &str) -> Error {
    Error::type_mismatch(field, "scalar wire type", wire.name())
}
