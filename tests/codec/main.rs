//! Codec Integration Test Suite
//!
//! Exercises the public `structpack` entry points end to end: wire layout,
//! round trips, length linkage, custom codecs, error surfaces and
//! concurrent use of the shared schema cache.
//!
//! ## Running Tests
//!
//! ```bash
//! # Run the whole suite
//! cargo test --test codec
//!
//! # Run one module
//! cargo test --test codec reference::
//! ```

use std::io::Read;

use byteorder::{BigEndian, ByteOrder as _, ReadBytesExt};
use structpack::{custom_codec, CustomCodec, EncodingOptions, Error, Result};

// Test modules
pub mod concurrency;
pub mod custom;
pub mod endian;
pub mod layout;
pub mod properties;
pub mod reference;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Install a test-writer subscriber so `RUST_LOG` output shows up per test
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Pack into a fresh vector with default options
pub fn packed<T: structpack::Wire>(value: &mut T) -> Vec<u8> {
    let mut out = Vec::new();
    structpack::pack(&mut out, value).unwrap();
    out
}

/// A 24-bit big-endian unsigned integer
///
/// Also carries an element count, so it can act as a `sizeof=` source.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Int3(pub u32);

impl CustomCodec for Int3 {
    fn size(&self, _: &EncodingOptions) -> usize {
        3
    }

    fn pack(&self, buf: &mut [u8], _: &EncodingOptions) -> Result<usize> {
        if self.0 > 0x00ff_ffff {
            return Err(Error::Codec(format!("{} does not fit in 24 bits", self.0)));
        }
        BigEndian::write_u24(&mut buf[..3], self.0);
        Ok(3)
    }

    fn unpack(&mut self, r: &mut dyn Read, _: usize, _: &EncodingOptions) -> Result<()> {
        self.0 = r.read_u24::<BigEndian>()?;
        Ok(())
    }

    fn count(&self) -> Option<usize> {
        Some(self.0 as usize)
    }

    fn set_count(&mut self, count: usize) -> bool {
        match u32::try_from(count) {
            Ok(n) if n <= 0x00ff_ffff => {
                self.0 = n;
                true
            }
            _ => false,
        }
    }
}

custom_codec!(Int3);
