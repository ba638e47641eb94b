//! Up-front runtime shape check
//!
//! Runs after the pre-pass and before any byte is produced. It either
//! fails with a typed error (a value its wire type cannot encode, a record
//! or codec sequence shorter than its count) or returns a [`Plan`]:
//!
//! - `Exact`: every sequence holds exactly its resolved count, so the fast
//!   path can copy raw slices and index elements directly.
//! - `Irregular`: some byte or scalar sequence is shorter or longer than its
//!   count. The generic path zero-pads or truncates it.

use crate::access::{self, Context};
use crate::scalar;
use structpack_core::{Error, FieldDescriptor, FieldSchema, FieldValue, Record, Result, WireType};

/// Which encode path a value may take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    /// Every sequence length equals its count
    Exact,
    /// At least one sequence needs padding or truncation
    Irregular,
}

impl Plan {
    fn and(self, other: Plan) -> Plan {
        if self == Plan::Exact {
            other
        } else {
            Plan::Irregular
        }
    }

    fn of_lengths(len: usize, count: usize) -> Plan {
        if len == count {
            Plan::Exact
        } else {
            Plan::Irregular
        }
    }
}

pub(crate) fn validate_record(ctx: &Context<'_>, schema: &FieldSchema, record: &dyn Record) -> Result<Plan> {
    let mut plan = Plan::Exact;
    for (pos, field) in schema.iter().enumerate() {
        if field.opaque || field.wire_type == WireType::Pad {
            continue;
        }
        let count = access::pack_count(schema, record, pos)?;
        let value = access::field_ref(record, field)?;
        plan = plan.and(validate_value(ctx, field, value, count)?);
    }
    Ok(plan)
}

pub(crate) fn validate_value(
    ctx: &Context<'_>,
    field: &FieldDescriptor,
    value: &dyn FieldValue,
    count: usize,
) -> Result<Plan> {
    access::view(field, value, |value| {
        if field.custom {
            check_codecs(field, value, count)
        } else if field.nested.is_some() {
            check_records(ctx, field, value, count)
        } else if field.shape.is_sequence() {
            check_sequence(ctx, field, value, count)
        } else {
            check_scalar(ctx.wire(field), field, value)?;
            Ok(Plan::Exact)
        }
    })
}

fn check_codecs(field: &FieldDescriptor, value: &dyn FieldValue, count: usize) -> Result<Plan> {
    if !field.shape.is_sequence() {
        access::as_codec(field, value)?;
        return Ok(Plan::Exact);
    }
    check_long_enough(field, value, count)?;
    for index in 0..count {
        access::as_codec(field, access::element(field, value, index, count)?)?;
    }
    Ok(Plan::Exact)
}

fn check_records(ctx: &Context<'_>, field: &FieldDescriptor, value: &dyn FieldValue, count: usize) -> Result<Plan> {
    let schema = ctx.schema(field)?;
    if !field.shape.is_sequence() {
        return validate_record(ctx, &schema, access::as_record(field, value)?);
    }
    check_long_enough(field, value, count)?;
    let mut plan = Plan::Exact;
    for index in 0..count {
        let element = access::element(field, value, index, count)?;
        plan = plan.and(validate_record(ctx, &schema, access::as_record(field, element)?)?);
    }
    Ok(plan)
}

fn check_sequence(ctx: &Context<'_>, field: &FieldDescriptor, value: &dyn FieldValue, count: usize) -> Result<Plan> {
    let wire = ctx.wire(field);
    let len = value
        .seq_len()
        .ok_or_else(|| Error::type_mismatch(field.name, "sequence", "scalar"))?;

    if wire.is_byte() && value.bytes().is_some() {
        return Ok(Plan::of_lengths(len, count));
    }

    for index in 0..len.min(count) {
        check_scalar(wire, field, access::element(field, value, index, count)?)?;
    }
    Ok(Plan::of_lengths(len, count))
}

fn check_scalar(wire: WireType, field: &FieldDescriptor, value: &dyn FieldValue) -> Result<()> {
    let scalar = value
        .scalar()
        .ok_or_else(|| Error::type_mismatch(field.name, wire.name(), "non-scalar value"))?;
    scalar::check(wire, scalar, field.name)
}

/// Records and codecs cannot be zero-filled, so they must all be present
fn check_long_enough(field: &FieldDescriptor, value: &dyn FieldValue, count: usize) -> Result<()> {
    let len = value.seq_len().unwrap_or(0);
    if len < count {
        return Err(Error::ShapeMismatch {
            field: field.name.to_string(),
            expected: count,
            actual: len,
        });
    }
    Ok(())
}
