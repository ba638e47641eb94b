//! Schema resolution
//!
//! Turns a record's introspected fields plus their annotations into a
//! [`FieldSchema`]. Per field, in declaration order:
//!
//! 1. Derive shape, count and element wire type from the declared kind.
//! 2. Overlay the annotation: explicit type, explicit count, explicit order.
//! 3. Default byte order: the first field's explicit order, else big-endian.
//!
//! Then the whole record:
//!
//! 4. Link `sizeof=` / `sizefrom=` pairs by name into schema positions. The
//!    reverse edges go into a side table and are applied after the pass,
//!    since a target may be resolved before its source is seen.
//! 5. Validate: every variable-length field has a size source, every source
//!    is an integer scalar declared before what it sizes.
//!
//! Resolution is pure: the same record type always yields the same schema.

use super::descriptor::{ContainerShape, Count, FieldDescriptor, FieldSchema};
use crate::annotation::{Annotation, ElementSyntax};
use crate::error::SchemaError;
use crate::record::{FieldDecl, Kind, RecordType};
use crate::wire_type::{ByteOrder, WireType};
use rustc_hash::FxHashMap;

/// Element encoding derived from a declared kind
struct Element {
    wire: WireType,
    native_int: bool,
    nested: Option<RecordType>,
    custom: bool,
}

impl Element {
    fn wire(wire: WireType) -> Self {
        Element {
            wire,
            native_int: false,
            nested: None,
            custom: false,
        }
    }
}

/// Kind-derived defaults before the annotation is applied
struct Base {
    shape: ContainerShape,
    count: Count,
    is_pointer: bool,
    element: Option<Element>,
    array_len: Option<usize>,
}

/// Resolve the field schema of a record shape
pub fn resolve(record: RecordType) -> Result<FieldSchema, SchemaError> {
    let decls = record.fields();

    let mut parsed = Vec::with_capacity(decls.len());
    for (index, decl) in decls.iter().enumerate() {
        let annotation =
            Annotation::parse(decl.tag).map_err(|source| SchemaError::Annotation {
                field: decl.name.to_string(),
                source,
            })?;
        if annotation.skip {
            continue;
        }
        parsed.push((index, decl, annotation));
    }

    if parsed.is_empty() {
        return Err(SchemaError::NoFields {
            record: record.name().to_string(),
        });
    }

    let default_order = parsed[0].2.order.unwrap_or(ByteOrder::Big);

    let mut fields = parsed
        .iter()
        .map(|(index, decl, annotation)| resolve_field(*index, decl, annotation, default_order))
        .collect::<Result<Vec<_>, _>>()?;

    link_sizes(&parsed, &mut fields)?;
    validate(&fields)?;

    Ok(FieldSchema::new(record, fields))
}

fn resolve_field(
    declared_index: usize,
    decl: &FieldDecl,
    annotation: &Annotation,
    default_order: ByteOrder,
) -> Result<FieldDescriptor, SchemaError> {
    let base = base_of(decl)?;

    let mut element = base.element;
    if let Some(wire) = annotation.wire_type {
        if let Some(e) = &element {
            if (e.nested.is_some() || e.custom) && wire != WireType::Pad {
                return Err(SchemaError::IncompatibleType {
                    field: decl.name.to_string(),
                    wire: wire.to_string(),
                    kind: decl.kind.to_string(),
                });
            }
        }
        element = Some(Element::wire(wire));
    }
    let element = element.ok_or_else(|| SchemaError::UnknownType {
        field: decl.name.to_string(),
        kind: decl.kind.to_string(),
    })?;

    let (mut shape, mut count) = (base.shape, base.count);
    match annotation.elements {
        Some(ElementSyntax::Fixed(n)) => {
            if let Some(declared) = base.array_len {
                if declared != n {
                    return Err(SchemaError::CountMismatch {
                        field: decl.name.to_string(),
                        annotated: n,
                        declared,
                    });
                }
            }
            shape = ContainerShape::FixedArray(n);
            count = Count::Fixed(n);
        }
        Some(ElementSyntax::Open) => {
            shape = ContainerShape::OpenSlice;
            count = Count::Variable;
        }
        None => {}
    }

    Ok(FieldDescriptor {
        name: decl.name,
        declared_index,
        wire_type: element.wire,
        shape,
        count,
        byte_order: annotation.order.unwrap_or(default_order),
        native_int: element.native_int,
        is_pointer: base.is_pointer,
        nested: element.nested,
        custom: element.custom,
        opaque: decl.opaque,
        sizeof_target: None,
        size_from: None,
    })
}

fn base_of(decl: &FieldDecl) -> Result<Base, SchemaError> {
    let unknown = || SchemaError::UnknownType {
        field: decl.name.to_string(),
        kind: decl.kind.to_string(),
    };

    let (kind, is_pointer) = match &decl.kind {
        Kind::Pointer(inner) => (&**inner, true),
        other => (other, false),
    };

    let base = match kind {
        Kind::Pointer(_) => return Err(unknown()),
        Kind::Array(elem, n) => Base {
            shape: ContainerShape::FixedArray(*n),
            count: Count::Fixed(*n),
            is_pointer,
            element: sequence_element(elem).ok_or_else(unknown)?,
            array_len: Some(*n),
        },
        Kind::Slice(elem) => Base {
            shape: ContainerShape::OpenSlice,
            count: Count::Variable,
            is_pointer,
            element: sequence_element(elem).ok_or_else(unknown)?,
            array_len: None,
        },
        Kind::Str => Base {
            shape: ContainerShape::StringLike,
            count: Count::Variable,
            is_pointer,
            element: Some(Element::wire(WireType::String)),
            array_len: None,
        },
        other => Base {
            shape: ContainerShape::Scalar,
            count: Count::Fixed(1),
            is_pointer,
            element: scalar_element(other),
            array_len: None,
        },
    };
    Ok(base)
}

/// Element of a `Vec`/array; `None` when the element kind cannot repeat
fn sequence_element(kind: &Kind) -> Option<Option<Element>> {
    match kind {
        Kind::Array(..) | Kind::Slice(_) | Kind::Pointer(_) | Kind::Str => None,
        other => Some(scalar_element(other)),
    }
}

/// Element for a non-container kind; `None` for `()`
fn scalar_element(kind: &Kind) -> Option<Element> {
    Some(Element {
        wire: kind.default_wire()?,
        native_int: kind.is_native_int(),
        nested: match kind {
            Kind::Record(rt) => Some(*rt),
            _ => None,
        },
        custom: *kind == Kind::Custom,
    })
}

/// Apply `sizeof=` and `sizefrom=` links
fn link_sizes(
    parsed: &[(usize, &FieldDecl, Annotation)],
    fields: &mut [FieldDescriptor],
) -> Result<(), SchemaError> {
    let positions: FxHashMap<&str, usize> = parsed
        .iter()
        .enumerate()
        .map(|(pos, (_, decl, _))| (decl.name, pos))
        .collect();

    let lookup = |field: &str, target: &str| {
        positions
            .get(target)
            .copied()
            .ok_or_else(|| SchemaError::MissingSizeofTarget {
                field: field.to_string(),
                target: target.to_string(),
            })
    };

    // sized position -> source position
    let mut sources: Vec<Option<usize>> = vec![None; fields.len()];

    for (pos, (_, decl, annotation)) in parsed.iter().enumerate() {
        if let Some(target) = &annotation.sizeof {
            let target_pos = lookup(decl.name, target)?;
            fields[pos].sizeof_target = Some(target_pos);
            add_source(&mut sources, fields, target_pos, pos)?;
        }
        if let Some(source) = &annotation.sizefrom {
            let source_pos = lookup(decl.name, source)?;
            add_source(&mut sources, fields, pos, source_pos)?;
        }
    }

    for (field, source) in fields.iter_mut().zip(sources) {
        field.size_from = source;
    }
    Ok(())
}

fn add_source(
    sources: &mut [Option<usize>],
    fields: &[FieldDescriptor],
    sized: usize,
    source: usize,
) -> Result<(), SchemaError> {
    match sources[sized] {
        Some(existing) if existing != source => Err(SchemaError::ConflictingSizeSource {
            field: fields[sized].name.to_string(),
            first: fields[existing].name.to_string(),
            second: fields[source].name.to_string(),
        }),
        _ => {
            sources[sized] = Some(source);
            Ok(())
        }
    }
}

fn validate(fields: &[FieldDescriptor]) -> Result<(), SchemaError> {
    for (pos, field) in fields.iter().enumerate() {
        if let Some(src) = field.size_from {
            check_source(&fields[src])?;
            if src >= pos {
                return Err(SchemaError::SizeSourceOrder {
                    field: field.name.to_string(),
                    source_field: fields[src].name.to_string(),
                });
            }
        }

        if let Some(target) = field.sizeof_target {
            let target = &fields[target];
            if !target.shape.is_sequence() && !target.custom {
                return Err(SchemaError::InvalidSizeSource {
                    field: field.name.to_string(),
                    reason: format!("sizeof target {} is not a sequence", target.name),
                });
            }
        }

        if field.count == Count::Variable && field.size_from.is_none() {
            return Err(SchemaError::NoSizeSource {
                field: field.name.to_string(),
            });
        }
    }
    Ok(())
}

fn check_source(source: &FieldDescriptor) -> Result<(), SchemaError> {
    let reason = if source.shape != ContainerShape::Scalar {
        Some("a size source must be a scalar")
    } else if source.is_pointer {
        Some("a size source cannot sit behind a pointer")
    } else if source.opaque {
        Some("an opaque field cannot carry a length")
    } else if !(source.wire_type.is_integer() || source.custom) {
        Some("a size source must have an integer wire type")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(SchemaError::InvalidSizeSource {
            field: source.name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}
