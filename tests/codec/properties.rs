//! Property tests: round trip and size agreement

use super::*;
use proptest::prelude::*;
use structpack::record;

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Point {
        pub x: i32,
        pub y: i32 => "little",
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Frame {
        pub version: u8,
        pub flags: [bool; 3],
        pub name_len: u8 => "sizeof=name",
        pub name: String,
        pub count: u16 => "sizeof=points",
        pub points: Vec<Point>,
        pub origin: Option<Box<Point>>,
        pub scale: f64,
        pub checksum: Int3,
        pub raw: Vec<u8> => "[8]byte",
        pub wide: u64 => "little",
        pub tiny: i8,
    }
}

fn arb_point() -> impl Strategy<Value = Point> {
    (any::<i32>(), any::<i32>()).prop_map(|(x, y)| Point { x, y })
}

fn arb_frame() -> impl Strategy<Value = Frame> {
    (
        any::<u8>(),
        any::<[bool; 3]>(),
        "[a-zA-Z0-9 ]{0,40}",
        proptest::collection::vec(arb_point(), 0..16),
        proptest::option::of(arb_point()),
        any::<f64>().prop_filter("comparable", |f| !f.is_nan()),
        0u32..0x0100_0000,
        any::<[u8; 8]>(),
        any::<u64>(),
        any::<i8>(),
    )
        .prop_map(
            |(version, flags, name, points, origin, scale, checksum, raw, wide, tiny)| Frame {
                version,
                flags,
                name_len: 0,
                name,
                count: 0,
                points,
                origin: Some(Box::new(origin.unwrap_or_default())),
                scale,
                checksum: Int3(checksum),
                raw: raw.to_vec(),
                wide,
                tiny,
            },
        )
}

proptest! {
    #[test]
    fn prop_round_trip(frame in arb_frame()) {
        let mut frame = frame;
        let bytes = packed(&mut frame);

        let mut out = Frame::default();
        structpack::unpack(&bytes[..], &mut out).unwrap();
        prop_assert_eq!(out, frame);
    }

    #[test]
    fn prop_size_of_matches_encoded_length(frame in arb_frame()) {
        let mut frame = frame;
        let size = structpack::size_of(&frame).unwrap();
        prop_assert_eq!(size, packed(&mut frame).len());
    }

    #[test]
    fn prop_unpack_consumes_exactly_one_record(frame in arb_frame(), trailer in proptest::collection::vec(any::<u8>(), 0..8)) {
        let mut frame = frame;
        let mut bytes = packed(&mut frame);
        bytes.extend_from_slice(&trailer);

        let mut source = &bytes[..];
        let mut out = Frame::default();
        structpack::unpack(&mut source, &mut out).unwrap();
        prop_assert_eq!(source, &trailer[..]);
    }

    #[test]
    fn prop_fallback_slices_round_trip(words in proptest::collection::vec(any::<u16>(), 0..32)) {
        let mut words = words;
        let bytes = packed(&mut words);
        prop_assert_eq!(bytes.len(), words.len() * 2);

        let mut out = vec![0u16; words.len()];
        structpack::unpack(&bytes[..], &mut out).unwrap();
        prop_assert_eq!(out, words);
    }
}
