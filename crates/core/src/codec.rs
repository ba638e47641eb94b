//! Custom codec hook
//!
//! A value type that the wire type registry cannot express (odd bit widths,
//! terminated runs, tagged unions) implements [`CustomCodec`] and reports
//! [`Kind::Custom`](crate::record::Kind::Custom) from its `Wire` impl. The
//! engine then hands that field's bytes over to the codec entirely: size,
//! byte order and framing are the codec's business.
//!
//! Sequences of a custom type call the codec once per element.
//!
//! The [`custom_codec!`](crate::custom_codec) macro wires a codec type into
//! the record model.

use crate::error::Result;
use crate::options::EncodingOptions;
use std::io::Read;

/// Field-value-supplied encoding
pub trait CustomCodec {
    /// Encoded size in bytes
    fn size(&self, options: &EncodingOptions) -> usize;

    /// Write the encoding into `buf`, which is exactly `size()` bytes long
    ///
    /// Returns the number of bytes written.
    fn pack(&self, buf: &mut [u8], options: &EncodingOptions) -> Result<usize>;

    /// Read the encoding from `reader`
    ///
    /// `length` is the element count the schema resolved for the field (1
    /// for a scalar field).
    fn unpack(
        &mut self,
        reader: &mut dyn Read,
        length: usize,
        options: &EncodingOptions,
    ) -> Result<()>;

    /// Element count carried by this value when it is a size source
    fn count(&self) -> Option<usize> {
        None
    }

    /// Store an element count written by the `sizeof=` pre-pass
    ///
    /// Returns `false` if the type cannot carry a count.
    fn set_count(&mut self, _count: usize) -> bool {
        false
    }
}

/// Implement `Wire` and `FieldValue` for a [`CustomCodec`] type
///
/// ```
/// use std::io::Read;
/// use structpack_core::{custom_codec, CustomCodec, EncodingOptions, Result};
///
/// #[derive(Default)]
/// struct Flag(bool);
///
/// impl CustomCodec for Flag {
///     fn size(&self, _: &EncodingOptions) -> usize { 1 }
///     fn pack(&self, buf: &mut [u8], _: &EncodingOptions) -> Result<usize> {
///         buf[0] = if self.0 { b'Y' } else { b'N' };
///         Ok(1)
///     }
///     fn unpack(&mut self, r: &mut dyn Read, _: usize, _: &EncodingOptions) -> Result<()> {
///         let mut b = [0u8; 1];
///         r.read_exact(&mut b)?;
///         self.0 = b[0] == b'Y';
///         Ok(())
///     }
/// }
///
/// custom_codec!(Flag);
/// ```
#[macro_export]
macro_rules! custom_codec {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::FieldValue for $ty {
                fn codec(&self) -> ::std::option::Option<&dyn $crate::CustomCodec> {
                    ::std::option::Option::Some(self)
                }

                fn codec_mut(&mut self) -> ::std::option::Option<&mut dyn $crate::CustomCodec> {
                    ::std::option::Option::Some(self)
                }
            }

            impl $crate::Wire for $ty {
                fn kind() -> $crate::Kind {
                    $crate::Kind::Custom
                }
            }
        )+
    };
}
