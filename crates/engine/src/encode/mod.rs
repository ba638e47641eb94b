//! Encode paths
//!
//! - [`fast`]: writes straight into a preallocated slice of exactly the
//!   computed size. Byte sequences are a single raw copy. Only taken for
//!   [`Plan::Exact`](crate::validate::Plan::Exact) values.
//! - [`generic`]: goes through `io::Write` and safe accessors, zero-padding
//!   short sequences and truncating long ones.
//!
//! For exact values both produce identical bytes.

pub(crate) mod fast;
pub(crate) mod generic;
