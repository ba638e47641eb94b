//! Byte order resolution and per-call overrides

use super::*;
use structpack::{pack_with_options, record, unpack_with_options, ByteOrder};

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct ExampleEndian {
        pub t: i64 => "int16,big",
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct LittleFirst {
        pub a: u16 => "little",
        pub b: u32,
        pub c: u16 => "big",
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Unmarked {
        pub a: u16,
        pub b: f64,
    }
}

#[test]
fn test_big_to_little_swap() {
    let big = EncodingOptions::new().with_byte_order(ByteOrder::Big);
    let little = EncodingOptions::new().with_byte_order(ByteOrder::Little);

    let mut buf = Vec::new();
    pack_with_options(&mut buf, &mut ExampleEndian { t: 1 }, &big).unwrap();
    assert_eq!(buf, [0x00, 0x01]);

    let mut out = ExampleEndian::default();
    unpack_with_options(&buf[..], &mut out, &little).unwrap();
    assert_eq!(out.t, 256);
}

#[test]
fn test_first_field_order_is_record_default() {
    let mut value = LittleFirst { a: 1, b: 2, c: 3 };
    assert_eq!(packed(&mut value), [1, 0, 2, 0, 0, 0, 0, 3]);
}

#[test]
fn test_unmarked_record_is_big_endian() {
    let mut value = Unmarked { a: 1, b: 1.0 };
    assert_eq!(
        packed(&mut value),
        [0, 1, 0x3f, 0xf0, 0, 0, 0, 0, 0, 0]
    );
}

#[test]
fn test_override_applies_to_every_field() {
    let little = EncodingOptions::new().with_byte_order(ByteOrder::Little);
    let mut value = LittleFirst { a: 1, b: 2, c: 3 };
    let mut buf = Vec::new();
    pack_with_options(&mut buf, &mut value, &little).unwrap();
    assert_eq!(buf, [1, 0, 2, 0, 0, 0, 3, 0]);
}

#[test]
fn test_fallback_uses_configured_order() {
    let little = EncodingOptions::new().with_byte_order(ByteOrder::Little);
    let mut words: Vec<u16> = vec![1, 2];

    let mut buf = Vec::new();
    pack_with_options(&mut buf, &mut words, &little).unwrap();
    assert_eq!(buf, [1, 0, 2, 0]);
    assert_eq!(packed(&mut words), [0, 1, 0, 2]);

    let mut single = 0u32;
    unpack_with_options(&[1u8, 0, 0, 0][..], &mut single, &little).unwrap();
    assert_eq!(single, 1);
}
