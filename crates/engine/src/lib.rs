//! Pack/unpack engine for structpack
//!
//! Executes resolved schemas against record values:
//! - dispatch: what a top-level argument encodes as
//! - prepare: sizeof= fields updated with live lengths
//! - validate: value shapes checked, encode path chosen
//! - size: encoded length computation
//! - encode: fast (slice) and generic (writer) encoders
//! - decode: single forward pass over a reader
//! - pool: recycled scratch buffers
//!
//! [`Engine`] ties these together; [`Engine::global`] is the process-wide
//! instance the `structpack` facade uses.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod access;
mod decode;
mod dispatch;
mod encode;
mod engine;
mod pool;
mod prepare;
mod scalar;
mod size;
mod validate;

pub use engine::Engine;
pub use pool::{BufferPool, PooledBuffer, DEFAULT_MAX_POOLED, DEFAULT_THRESHOLD};
pub use validate::Plan;
