//! Wire layout policies: padding, truncation, linked lengths, pointers

use super::*;
use structpack::record;

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Fixed4 {
        pub field: Vec<u8> => "[4]byte",
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct LenData {
        pub len: u32 => "sizeof=data",
        pub data: Vec<u8>,
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct SliceUnderrun {
        pub s: String => "[10]byte",
        pub arr: Vec<u16> => "[10]uint16",
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Leaf {
        pub v: u16,
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Holder {
        pub head: u8,
        pub leaf: Option<Box<Leaf>>,
        pub tail: u8,
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Padded {
        pub a: u8,
        pub gap: () => "[3]pad",
        pub b: u8,
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Skipping {
        pub a: u8,
        pub cache: u64 => "skip",
        pub b: u8,
    }
}

// === Fixed-width byte runs ===

#[test]
fn test_short_fixed_run_is_zero_padded() {
    let mut value = Fixed4 {
        field: vec![0x61, 0x62, 0x63],
    };
    assert_eq!(packed(&mut value), [0x61, 0x62, 0x63, 0x00]);
    assert_eq!(structpack::size_of(&value).unwrap(), 4);
}

#[test]
fn test_long_fixed_run_is_truncated() {
    let mut value = Fixed4 {
        field: b"abcde".to_vec(),
    };
    assert_eq!(packed(&mut value), b"abcd");
}

#[test]
fn test_fixed_run_unpacks_full_width() {
    let mut out = Fixed4::default();
    structpack::unpack(&[0x61, 0x62, 0x63, 0x00][..], &mut out).unwrap();
    assert_eq!(out.field, vec![0x61, 0x62, 0x63, 0x00]);
}

#[test]
fn test_slice_underrun_pads_each_field() {
    let mut value = SliceUnderrun {
        s: "foo".to_string(),
        arr: vec![1, 2, 3],
    };
    let bytes = packed(&mut value);
    assert_eq!(bytes.len(), 30);
    assert_eq!(&bytes[..10], b"foo\0\0\0\0\0\0\0");
    assert_eq!(&bytes[10..16], &[0, 1, 0, 2, 0, 3]);
    assert!(bytes[16..].iter().all(|&b| b == 0));
}

// === Linked lengths ===

#[test]
fn test_sizeof_reflects_live_length() {
    let mut value = LenData {
        len: 0,
        data: vec![1, 2, 3, 4],
    };
    assert_eq!(packed(&mut value), [0, 0, 0, 4, 1, 2, 3, 4]);
    assert_eq!(value.len, 4);
}

#[test]
fn test_sizeof_with_empty_target() {
    let mut value = LenData { len: 9, data: vec![] };
    assert_eq!(packed(&mut value), [0, 0, 0, 0]);

    let mut out = LenData::default();
    structpack::unpack(&[0u8, 0, 0, 0][..], &mut out).unwrap();
    assert_eq!(out, LenData::default());
}

#[test]
fn test_size_of_uses_live_length_without_mutating() {
    let value = LenData {
        len: 0,
        data: vec![7; 12],
    };
    assert_eq!(structpack::size_of(&value).unwrap(), 16);
    assert_eq!(value.len, 0);
}

// === Pointers ===

#[test]
fn test_absent_nested_pointer_encodes_default() {
    let mut value = Holder {
        head: 1,
        leaf: None,
        tail: 2,
    };
    assert_eq!(packed(&mut value), [1, 0, 0, 2]);
}

#[test]
fn test_nested_pointer_is_allocated_on_unpack() {
    let mut out = Holder::default();
    structpack::unpack(&[1u8, 0, 9, 2][..], &mut out).unwrap();
    assert_eq!(out.leaf, Some(Box::new(Leaf { v: 9 })));
    assert_eq!(out.tail, 2);
}

// === Pad and skip ===

#[test]
fn test_pad_is_zero_on_pack_and_skipped_on_unpack() {
    let mut value = Padded { a: 1, gap: (), b: 2 };
    assert_eq!(packed(&mut value), [1, 0, 0, 0, 2]);

    let mut out = Padded::default();
    structpack::unpack(&[1u8, 0xff, 0xff, 0xff, 2][..], &mut out).unwrap();
    assert_eq!(out, value);
}

#[test]
fn test_skipped_field_is_untouched() {
    let mut value = Skipping { a: 1, cache: 42, b: 2 };
    assert_eq!(packed(&mut value), [1, 2]);

    let mut out = Skipping {
        cache: 7,
        ..Skipping::default()
    };
    structpack::unpack(&[1u8, 2][..], &mut out).unwrap();
    assert_eq!(out, Skipping { a: 1, cache: 7, b: 2 });
}
