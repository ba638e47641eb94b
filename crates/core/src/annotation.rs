//! Field annotation parser
//!
//! An annotation is a short directive string attached to a record field:
//!
//! ```text
//! "uint16,little,sizeof=payload"
//! "[4]byte"
//! "[]uint8 sizefrom=count"
//! ```
//!
//! Tokens are separated by commas and/or whitespace. Recognized tokens:
//!
//! - `big` / `little`: byte order override
//! - `sizeof=<field>`: this field carries the element count of `<field>`
//! - `sizefrom=<field>`: this field's element count comes from `<field>`
//! - `skip`: the field takes no part in the wire format
//! - `[N]name`, `[]name`, `name`: wire type with an optional element count
//!
//! Anything else is ignored, so a missing type simply defers to the field's
//! declared kind.

use crate::wire_type::{ByteOrder, WireType};
use thiserror::Error;

/// Malformed annotation token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed annotation token `{token}`")]
pub struct AnnotationError {
    /// The offending token
    pub token: String,
}

impl AnnotationError {
    fn new(token: &str) -> Self {
        AnnotationError {
            token: token.to_string(),
        }
    }
}

/// Element count written in bracket syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementSyntax {
    /// `[N]`
    Fixed(usize),
    /// `[]`
    Open,
}

/// Parsed field annotation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    /// Explicit wire type, if a known type name was given
    pub wire_type: Option<WireType>,
    /// Explicit byte order
    pub order: Option<ByteOrder>,
    /// Field whose length this field carries
    pub sizeof: Option<String>,
    /// Field supplying this field's element count
    pub sizefrom: Option<String>,
    /// Element count from `[N]` / `[]`
    pub elements: Option<ElementSyntax>,
    /// Field excluded from the wire format
    pub skip: bool,
}

impl Annotation {
    /// Parse an annotation string
    ///
    /// The empty string parses to the default (no directives).
    pub fn parse(input: &str) -> Result<Annotation, AnnotationError> {
        let mut annotation = Annotation::default();

        for token in input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            if let Some(order) = ByteOrder::from_name(token) {
                annotation.order = Some(order);
            } else if let Some(target) = token.strip_prefix("sizeof=") {
                annotation.sizeof = Some(link_target(token, target)?);
            } else if let Some(target) = token.strip_prefix("sizefrom=") {
                annotation.sizefrom = Some(link_target(token, target)?);
            } else if token == "skip" {
                annotation.skip = true;
            } else if token.starts_with('[') {
                let (elements, name) = parse_bracket(token)?;
                annotation.elements = Some(elements);
                if let Some(wire) = WireType::from_name(name) {
                    annotation.wire_type = Some(wire);
                }
            } else if let Some(wire) = WireType::from_name(token) {
                annotation.wire_type = Some(wire);
            }
        }

        Ok(annotation)
    }

    /// True when nothing was specified
    pub fn is_empty(&self) -> bool {
        *self == Annotation::default()
    }
}

fn link_target(token: &str, target: &str) -> Result<String, AnnotationError> {
    if target.is_empty() {
        return Err(AnnotationError::new(token));
    }
    Ok(target.to_string())
}

/// Split `[N]name` into its count and type name
fn parse_bracket(token: &str) -> Result<(ElementSyntax, &str), AnnotationError> {
    let close = token.find(']').ok_or_else(|| AnnotationError::new(token))?;
    let digits = &token[1..close];
    let name = &token[close + 1..];
    if name.is_empty() {
        return Err(AnnotationError::new(token));
    }

    let elements = if digits.is_empty() {
        ElementSyntax::Open
    } else {
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AnnotationError::new(token));
        }
        let count = digits
            .parse::<usize>()
            .map_err(|_| AnnotationError::new(token))?;
        ElementSyntax::Fixed(count)
    };

    Ok((elements, name))
}
