//! Convenient imports for structpack.
//!
//! ```
//! use structpack::prelude::*;
//!
//! record! {
//!     #[derive(Default)]
//!     struct Ping {
//!         seq: u32,
//!     }
//! }
//! ```

// Declaration macros
pub use crate::{custom_codec, record};

// Record model
pub use crate::{CustomCodec, FieldValue, Record, Wire};

// Options
pub use crate::{ByteOrder, EncodingOptions, IntWidth};

// Error handling
pub use crate::{Error, Result};

// Engine
pub use crate::Engine;
