//! Top-level dispatch
//!
//! What an entry point was handed decides how it is encoded:
//!
//! - a record: its schema
//! - a pointer: its pointee, one level deep; an absent pointee is a bad
//!   argument
//! - a custom codec: the codec, directly
//! - anything else: the fixed-width fallback, a single anonymous field using
//!   the configured byte order (big-endian when none is given), the value's
//!   runtime length, and no directives

use structpack_core::{
    ByteOrder, ContainerShape, Count, CustomCodec, EncodingOptions, Error, FieldDescriptor, FieldValue,
    Kind, Record, Result, WireType,
};

pub(crate) enum Target<'v> {
    Record(&'v dyn Record),
    Codec(&'v dyn CustomCodec),
    Value(FieldDescriptor, usize, &'v dyn FieldValue),
}

pub(crate) enum TargetMut<'v> {
    Record(&'v mut dyn Record),
    Codec(&'v mut dyn CustomCodec),
    Value(FieldDescriptor, usize, &'v mut dyn FieldValue),
}

/// Run `f` on the top-level target of a shared value
pub(crate) fn with_target<T>(
    kind: &Kind,
    value: &dyn FieldValue,
    options: &EncodingOptions,
    f: impl FnOnce(Target<'_>) -> Result<T>,
) -> Result<T> {
    let Kind::Pointer(inner) = kind else {
        return target(kind, value, options).and_then(f);
    };
    check_pointer(kind, inner, value)?;

    let mut f = Some(f);
    let mut out = None;
    value.with_pointee(&mut |pointee| {
        if let Some(f) = f.take() {
            out = Some(target(inner, pointee, options).and_then(f));
        }
    });
    out.unwrap_or_else(|| Err(Error::BadArgument(format!("{} is not dereferenceable", kind))))
}

/// Top-level target of a mutable value
pub(crate) fn target_mut<'v>(
    kind: &Kind,
    value: &'v mut dyn FieldValue,
    options: &EncodingOptions,
) -> Result<TargetMut<'v>> {
    match kind {
        Kind::Pointer(inner) => {
            check_pointer(kind, inner, value)?;
            let pointee = value
                .pointee_mut()
                .ok_or_else(|| Error::BadArgument(format!("{} is not dereferenceable", kind)))?;
            target_mut(inner, pointee, options)
        }
        Kind::Record(_) => value
            .record_mut()
            .map(TargetMut::Record)
            .ok_or_else(|| no_view(kind)),
        Kind::Custom => value
            .codec_mut()
            .map(TargetMut::Codec)
            .ok_or_else(|| no_view(kind)),
        other => {
            let (field, count) = fallback_field(other, value.seq_len(), options)?;
            Ok(TargetMut::Value(field, count, value))
        }
    }
}

fn target<'v>(kind: &Kind, value: &'v dyn FieldValue, options: &EncodingOptions) -> Result<Target<'v>> {
    match kind {
        Kind::Pointer(_) => Err(Error::BadArgument(format!("nested pointer {}", kind))),
        Kind::Record(_) => value.record().map(Target::Record).ok_or_else(|| no_view(kind)),
        Kind::Custom => value.codec().map(Target::Codec).ok_or_else(|| no_view(kind)),
        other => {
            let (field, count) = fallback_field(other, value.seq_len(), options)?;
            Ok(Target::Value(field, count, value))
        }
    }
}

fn check_pointer(kind: &Kind, inner: &Kind, value: &dyn FieldValue) -> Result<()> {
    if value.is_null() {
        return Err(Error::BadArgument(format!("absent value behind {}", kind)));
    }
    if matches!(inner, Kind::Pointer(_)) {
        return Err(Error::BadArgument(format!("nested pointer {}", kind)));
    }
    Ok(())
}

fn no_view(kind: &Kind) -> Error {
    Error::BadArgument(format!("{} exposes no accessor table", kind))
}

/// Single anonymous field describing a non-record value
fn fallback_field(kind: &Kind, len: Option<usize>, options: &EncodingOptions) -> Result<(FieldDescriptor, usize)> {
    let unsupported = || Error::BadArgument(format!("{} has no fixed-width encoding", kind));

    let (element, shape) = match kind {
        Kind::Array(element, n) => (Some(&**element), ContainerShape::FixedArray(*n)),
        Kind::Slice(element) => (Some(&**element), ContainerShape::OpenSlice),
        Kind::Str => (None, ContainerShape::StringLike),
        other => (Some(other), ContainerShape::Scalar),
    };

    let (wire_type, nested, custom) = match element {
        None => (WireType::String, None, false),
        Some(Kind::Record(rt)) => (WireType::Struct, Some(*rt), false),
        Some(Kind::Custom) => (WireType::Struct, None, true),
        Some(Kind::Str) => return Err(unsupported()),
        Some(other) => (other.default_wire().ok_or_else(unsupported)?, None, false),
    };

    let count = if shape.is_sequence() {
        len.ok_or_else(unsupported)?
    } else {
        1
    };

    let field = FieldDescriptor {
        name: "value",
        declared_index: 0,
        wire_type,
        shape,
        count: Count::Fixed(count),
        byte_order: options.byte_order.unwrap_or(ByteOrder::Big),
        native_int: element.map_or(false, Kind::is_native_int),
        is_pointer: false,
        nested,
        custom,
        opaque: false,
        sizeof_target: None,
        size_from: None,
    };
    Ok((field, count))
}
