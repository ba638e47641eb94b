//! Reference record covering every field shape
//!
//! One record with fixed-width overrides, native scalars, both byte orders,
//! fixed and linked byte runs, nested records behind values and pointers,
//! record sequences, a skipped field and a custom-codec size source.

use super::*;
use structpack::record;

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Nested {
        pub test2: i64 => "int8",
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Example {
        pub pad: () => "[5]pad",
        pub i8f: i64 => "int8",
        pub i16f: i64 => "int16",
        pub i32f: i64 => "int32",
        pub i64f: i64 => "int64",
        pub u8f: i64 => "uint8,little",
        pub u16f: i64 => "uint16,little",
        pub u32f: i64 => "uint32,little",
        pub u64f: i64 => "uint64,little",
        pub boolf: i64 => "bool",
        pub byte4f: Vec<u8> => "[4]byte",

        pub i8: i8,
        pub i16: i16,
        pub i32: i32,
        pub i64: i64,
        pub u8: u8 => "little",
        pub u16: u16 => "little",
        pub u32: u32 => "little",
        pub u64: u64 => "little",
        pub bool_t: bool,
        pub bool_f: bool,
        pub byte4: [u8; 4],
        pub float1: f32,
        pub float2: f64,

        pub i32f2: i64 => "int32",
        pub u32f2: i64 => "uint32",

        pub i32f3: i32 => "int64",

        pub size: i32 => "sizeof=str,little",
        pub str: String => "[]byte",
        pub strb: String => "[4]byte",

        pub size2: i64 => "uint8,sizeof=str2",
        pub str2: String,

        pub size3: i64 => "uint8,sizeof=bstr",
        pub bstr: Vec<u8>,

        pub size4: i32 => "little",
        pub str4a: String => "[]byte,sizefrom=size4",
        pub str4b: String => "[]byte,sizefrom=size4",

        pub size5: i64 => "uint8",
        pub bstr2: Vec<u8> => "sizefrom=size5",

        pub nested: Nested,
        pub nested_p: Option<Box<Nested>>,
        pub test_p64: Option<Box<i64>> => "int64",

        pub nested_size: i32 => "sizeof=nested_a",
        pub nested_a: Vec<Nested>,

        pub skipped: i64 => "skip",

        pub custom_type_size: Int3 => "sizeof=custom_type_size_arr",
        pub custom_type_size_arr: Vec<u8>,
    }
}

pub fn reference() -> Example {
    Example {
        pad: (),
        i8f: 1,
        i16f: 2,
        i32f: 3,
        i64f: 4,
        u8f: 5,
        u16f: 6,
        u32f: 7,
        u64f: 8,
        boolf: 0,
        byte4f: b"abcd".to_vec(),

        i8: 9,
        i16: 10,
        i32: 11,
        i64: 12,
        u8: 13,
        u16: 14,
        u32: 15,
        u64: 16,
        bool_t: true,
        bool_f: false,
        byte4: *b"efgh",
        float1: 20.0,
        float2: 21.0,

        i32f2: -1,
        u32f2: 4_294_967_295,

        i32f3: -1,

        size: 10,
        str: "ijklmnopqr".to_string(),
        strb: "stuv".to_string(),

        size2: 4,
        str2: "1234".to_string(),

        size3: 4,
        bstr: b"5678".to_vec(),

        size4: 7,
        str4a: "ijklmno".to_string(),
        str4b: "pqrstuv".to_string(),

        size5: 4,
        bstr2: b"5678".to_vec(),

        nested: Nested { test2: 1 },
        nested_p: Some(Box::new(Nested { test2: 2 })),
        test_p64: Some(Box::new(5)),

        nested_size: 6,
        nested_a: (3..=8).map(|test2| Nested { test2 }).collect(),

        skipped: 0,

        custom_type_size: Int3(4),
        custom_type_size_arr: b"ABCD".to_vec(),
    }
}

pub fn reference_bytes() -> Vec<u8> {
    let mut out = Vec::new();
    // pad
    out.extend_from_slice(&[0, 0, 0, 0, 0]);
    // int8-int64 overrides, 1-4
    out.extend_from_slice(&[1, 0, 2, 0, 0, 0, 3, 0, 0, 0, 0, 0, 0, 0, 4]);
    // little-endian uint8-uint64 overrides, 5-8
    out.extend_from_slice(&[5, 6, 0, 7, 0, 0, 0, 8, 0, 0, 0, 0, 0, 0, 0]);
    // bool override, [4]byte
    out.push(0);
    out.extend_from_slice(b"abcd");

    // native int8-int64, 9-12
    out.extend_from_slice(&[9, 0, 10, 0, 0, 0, 11, 0, 0, 0, 0, 0, 0, 0, 12]);
    // native little-endian uint8-uint64, 13-16
    out.extend_from_slice(&[13, 14, 0, 15, 0, 0, 0, 16, 0, 0, 0, 0, 0, 0, 0]);
    out.extend_from_slice(&[1, 0]);
    out.extend_from_slice(b"efgh");
    out.extend_from_slice(&[65, 160, 0, 0]);
    out.extend_from_slice(&[64, 53, 0, 0, 0, 0, 0, 0]);

    out.extend_from_slice(&[255; 4]);
    out.extend_from_slice(&[255; 4]);
    out.extend_from_slice(&[255; 8]);

    out.extend_from_slice(&[10, 0, 0, 0]);
    out.extend_from_slice(b"ijklmnopqr");
    out.extend_from_slice(b"stuv");
    out.push(4);
    out.extend_from_slice(b"1234");
    out.push(4);
    out.extend_from_slice(b"5678");

    out.extend_from_slice(&[7, 0, 0, 0]);
    out.extend_from_slice(b"ijklmno");
    out.extend_from_slice(b"pqrstuv");
    out.push(4);
    out.extend_from_slice(b"5678");

    out.extend_from_slice(&[1, 2]);
    out.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 5]);

    out.extend_from_slice(&[0, 0, 0, 6]);
    out.extend_from_slice(&[3, 4, 5, 6, 7, 8]);

    out.extend_from_slice(&[0, 0, 4]);
    out.extend_from_slice(b"ABCD");
    out
}

#[test]
fn test_encode_reference() {
    init_tracing();
    let mut value = reference();
    assert_eq!(packed(&mut value), reference_bytes());
}

#[test]
fn test_decode_reference() {
    let mut out = Example::default();
    structpack::unpack(&reference_bytes()[..], &mut out).unwrap();
    assert_eq!(out, reference());
}

#[test]
fn test_round_trip_reference() {
    let mut value = reference();
    let bytes = packed(&mut value);
    let mut out = Example::default();
    structpack::unpack(&bytes[..], &mut out).unwrap();
    assert_eq!(out, value);
}

#[test]
fn test_size_of_reference() {
    assert_eq!(structpack::size_of(&reference()).unwrap(), reference_bytes().len());
}

#[test]
fn test_sizeof_fields_track_live_lengths() {
    let mut value = reference();
    value.size = 0;
    value.size2 = 99;
    value.nested_size = 0;
    value.custom_type_size = Int3(0);
    value.nested_a.truncate(2);

    let bytes = packed(&mut value);
    assert_eq!(value.size, 10);
    assert_eq!(value.size2, 4);
    assert_eq!(value.nested_size, 2);
    assert_eq!(value.custom_type_size, Int3(4));

    let mut out = Example::default();
    structpack::unpack(&bytes[..], &mut out).unwrap();
    assert_eq!(out.nested_a, vec![Nested { test2: 3 }, Nested { test2: 4 }]);
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Within {
        pub a: u8 => "int32",
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct ExampleSlice {
        pub props_len: u8 => "sizeof=props",
        pub props: Vec<Within>,
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct ExampleArray {
        pub props_len: u8,
        pub props: [Within; 16],
    }
}

fn array_slice_bytes() -> Vec<u8> {
    let mut out = vec![16];
    for n in 1..=16u8 {
        out.extend_from_slice(&[0, 0, 0, n]);
    }
    out
}

fn props() -> Vec<Within> {
    (1..=16).map(|a| Within { a }).collect()
}

#[test]
fn test_record_slice_and_array_share_layout() {
    let mut slice = ExampleSlice {
        props_len: 0,
        props: props(),
    };
    let mut array = ExampleArray {
        props_len: 16,
        props: std::array::from_fn(|i| Within { a: i as u8 + 1 }),
    };
    assert_eq!(packed(&mut slice), array_slice_bytes());
    assert_eq!(packed(&mut array), array_slice_bytes());

    let mut out = ExampleSlice::default();
    structpack::unpack(&array_slice_bytes()[..], &mut out).unwrap();
    assert_eq!(out.props, props());

    let mut out = ExampleArray::default();
    structpack::unpack(&array_slice_bytes()[..], &mut out).unwrap();
    assert_eq!(out.props.to_vec(), props());
}
