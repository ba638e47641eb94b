//! Custom codec fields

use super::*;
use byteorder::WriteBytesExt;
use structpack::record;

/// Two bytes, read back little-endian
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DoubleU8(pub [u8; 2]);

impl CustomCodec for DoubleU8 {
    fn size(&self, _: &EncodingOptions) -> usize {
        2
    }

    fn pack(&self, buf: &mut [u8], _: &EncodingOptions) -> Result<usize> {
        buf[..2].copy_from_slice(&self.0);
        Ok(2)
    }

    fn unpack(&mut self, r: &mut dyn Read, _: usize, _: &EncodingOptions) -> Result<()> {
        r.read_exact(&mut self.0)?;
        Ok(())
    }
}

/// Bytes terminated by a NUL
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CString(pub Vec<u8>);

impl CustomCodec for CString {
    fn size(&self, _: &EncodingOptions) -> usize {
        self.0.len() + 1
    }

    fn pack(&self, mut buf: &mut [u8], _: &EncodingOptions) -> Result<usize> {
        std::io::Write::write_all(&mut buf, &self.0)?;
        buf.write_u8(0)?;
        Ok(self.0.len() + 1)
    }

    fn unpack(&mut self, r: &mut dyn Read, _: usize, _: &EncodingOptions) -> Result<()> {
        self.0.clear();
        loop {
            match r.read_u8()? {
                0 => return Ok(()),
                b => self.0.push(b),
            }
        }
    }
}

/// Echoes the `length` it was unpacked with
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Run(pub Vec<u8>);

impl CustomCodec for Run {
    fn size(&self, _: &EncodingOptions) -> usize {
        self.0.len()
    }

    fn pack(&self, buf: &mut [u8], _: &EncodingOptions) -> Result<usize> {
        buf[..self.0.len()].copy_from_slice(&self.0);
        Ok(self.0.len())
    }

    fn unpack(&mut self, r: &mut dyn Read, length: usize, _: &EncodingOptions) -> Result<()> {
        self.0 = vec![0; length];
        r.read_exact(&mut self.0)?;
        Ok(())
    }
}

custom_codec!(DoubleU8, CString, Run);

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Int3Record {
        pub i: Int3,
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Int3Pair {
        pub i: [Int3; 2],
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct CStringRecord {
        pub s: CString,
        pub n: u8,
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct RunRecord {
        pub n: u8,
        pub run: Run => "sizefrom=n",
    }
}

fn round_trip<T: structpack::Wire + Default + PartialEq + std::fmt::Debug + Clone>(value: T, expected: &[u8]) {
    let mut value = value;
    let bytes = packed(&mut value);
    assert_eq!(bytes, expected);
    assert_eq!(structpack::size_of(&value).unwrap(), expected.len());

    let mut out = T::default();
    structpack::unpack(expected, &mut out).unwrap();
    assert_eq!(out, value);
}

// === Top-level codecs ===

#[test]
fn test_int3_packs_to_three_bytes() {
    round_trip(Int3(3), &[0, 0, 3]);
    round_trip(Int3(4000), &[0, 15, 160]);
}

#[test]
fn test_boxed_codec() {
    round_trip(Box::new(Int3(3)), &[0, 0, 3]);
}

#[test]
fn test_array_of_codecs() {
    round_trip([Int3(3), Int3(4)], &[0, 0, 3, 0, 0, 4]);
}

#[test]
fn test_codec_over_byte_pair() {
    round_trip(DoubleU8([32, 64]), &[32, 64]);
}

#[test]
fn test_nul_terminated() {
    round_trip(CString(vec![128, 64, 32]), &[128, 64, 32, 0]);
    round_trip(CString(Vec::new()), &[0]);
}

// === Codec fields ===

#[test]
fn test_codec_field_in_record() {
    round_trip(Int3Record { i: Int3(3) }, &[0, 0, 3]);
}

#[test]
fn test_codec_elements_in_record() {
    round_trip(Int3Pair { i: [Int3(3), Int3(4)] }, &[0, 0, 3, 0, 0, 4]);
}

#[test]
fn test_variable_codec_followed_by_field() {
    round_trip(
        CStringRecord {
            s: CString(vec![128, 64, 32]),
            n: 192,
        },
        &[128, 64, 32, 0, 192],
    );
}

#[test]
fn test_codec_receives_length_from_source() {
    let mut out = RunRecord::default();
    structpack::unpack(&[3u8, 7, 8, 9][..], &mut out).unwrap();
    assert_eq!(out.run, Run(vec![7, 8, 9]));
}

#[test]
fn test_codec_error_is_propagated() {
    let mut value = Int3Record { i: Int3(1 << 24) };
    let mut out = Vec::new();
    let err = structpack::pack(&mut out, &mut value).unwrap_err();
    assert!(matches!(err, Error::Codec(_)));
    assert!(out.is_empty());
}

#[test]
fn test_truncated_codec_input() {
    let mut out = Int3Record::default();
    let err = structpack::unpack(&[0u8, 1][..], &mut out).unwrap_err();
    assert!(matches!(err, Error::UnexpectedEof));
}
