//! The pack/unpack engine
//!
//! ## Pack sequence
//!
//! ```text
//! 1. dispatch      - record, pointer, custom codec or fallback value
//! 2. prepare       - write live lengths into sizeof= fields
//! 3. validate      - typed error, or Plan::Exact / Plan::Irregular
//! 4. size          - total encoded length
//! 5. encode        - fast path (Exact) or generic path (Irregular) into a
//!                    pooled scratch buffer
//! 6. write_all     - hand the finished bytes to the sink
//! ```
//!
//! Nothing reaches the sink unless every step succeeded.

use crate::access::Context;
use crate::decode::{self, Counting};
use crate::dispatch::{self, Target, TargetMut};
use crate::encode::{fast, generic};
use crate::pool::{BufferPool, PooledBuffer};
use crate::validate::{self, Plan};
use crate::{prepare, size};
use once_cell::sync::Lazy;
use std::io::{Read, Write};
use std::sync::Arc;
use structpack_core::{
    EncodingOptions, FieldDescriptor, FieldSchema, FieldValue, Kind, Record, RecordType, Result, SchemaCache, Wire,
};
use tracing::trace;

static GLOBAL: Lazy<Engine<'static>> = Lazy::new(|| Engine::new(SchemaCache::global()));

/// Pack/unpack engine: a schema cache plus a scratch buffer pool
///
/// # Thread Safety
///
/// `Engine` is `Sync`. Calls on independent values run fully in parallel;
/// the schema cache and the buffer pool are the only shared state.
#[derive(Debug)]
pub struct Engine<'c> {
    cache: &'c SchemaCache,
    pool: BufferPool,
}

impl<'c> Engine<'c> {
    /// Engine over `cache` with a default buffer pool
    pub fn new(cache: &'c SchemaCache) -> Self {
        Self::with_pool(cache, BufferPool::new())
    }

    /// Engine over `cache` with an explicit buffer pool
    pub fn with_pool(cache: &'c SchemaCache, pool: BufferPool) -> Self {
        Engine { cache, pool }
    }

    /// The schema cache this engine resolves through
    pub fn cache(&self) -> &'c SchemaCache {
        self.cache
    }

    /// The scratch buffer pool
    pub fn pool(&self) -> &BufferPool {
        &self.pool
    }

    /// Resolved schema for a record shape
    pub fn schema(&self, record: RecordType) -> Result<Arc<FieldSchema>> {
        Ok(self.cache.schema(record)?)
    }

    /// Pack `value` onto `sink`
    ///
    /// Takes `&mut` because `sizeof=` fields are updated in place with the
    /// live lengths of their targets.
    pub fn pack<W: Write, T: Wire>(&self, mut sink: W, value: &mut T, options: &EncodingOptions) -> Result<()> {
        let buf = self.encode(&T::kind(), value, options)?;
        sink.write_all(&buf)?;
        Ok(())
    }

    /// Pack `value` into a new `Vec`
    pub fn pack_to_vec<T: Wire>(&self, value: &mut T, options: &EncodingOptions) -> Result<Vec<u8>> {
        let buf = self.encode(&T::kind(), value, options)?;
        Ok(buf.to_vec())
    }

    /// Unpack `value` from `source`
    ///
    /// An empty source is `Error::EndOfInput`; a source that ends partway
    /// through is `Error::UnexpectedEof`.
    pub fn unpack<R: Read, T: Wire>(&self, source: R, value: &mut T, options: &EncodingOptions) -> Result<()> {
        let ctx = Context::new(self.cache, options);
        let mut source = Counting::new(source);

        let result = match dispatch::target_mut(&T::kind(), value, options)? {
            TargetMut::Record(record) => {
                let schema = self.cache.schema(record.record_type())?;
                decode::decode_record(&ctx, &schema, record, &mut source)
            }
            TargetMut::Codec(codec) => codec.unpack(&mut source, 1, options),
            TargetMut::Value(field, count, value) => decode::decode_value(&ctx, &field, value, count, &mut source),
        };
        source.finish(result)
    }

    /// Encoded size of `value`, without encoding it
    pub fn size_of<T: Wire>(&self, value: &T, options: &EncodingOptions) -> Result<usize> {
        let ctx = Context::new(self.cache, options);
        dispatch::with_target(&T::kind(), value, options, |target| match target {
            Target::Record(record) => {
                let schema = self.cache.schema(record.record_type())?;
                size::record_size(&ctx, &schema, record)
            }
            Target::Codec(codec) => Ok(codec.size(options)),
            Target::Value(field, count, value) => size::value_size(&ctx, &field, value, count),
        })
    }

    fn encode(&self, kind: &Kind, value: &mut dyn FieldValue, options: &EncodingOptions) -> Result<PooledBuffer<'_>> {
        let ctx = Context::new(self.cache, options);
        match dispatch::target_mut(kind, value, options)? {
            TargetMut::Record(record) => {
                let schema = self.cache.schema(record.record_type())?;
                prepare::prepare_record(&ctx, &schema, record)?;
                self.encode_record(&ctx, &schema, record)
            }
            TargetMut::Codec(codec) => {
                let size = codec.size(options);
                let mut buf = self.pool.checkout(size);
                buf.resize(size, 0);
                codec.pack(&mut buf[..], options)?;
                Ok(buf)
            }
            TargetMut::Value(field, count, value) => self.encode_value(&ctx, &field, value, count),
        }
    }

    fn encode_record(&self, ctx: &Context<'_>, schema: &FieldSchema, record: &dyn Record) -> Result<PooledBuffer<'_>> {
        let plan = validate::validate_record(ctx, schema, record)?;
        let size = size::record_size(ctx, schema, record)?;
        trace!(record = schema.record_type().name(), size, ?plan, "pack");

        let mut buf = self.pool.checkout(size);
        match plan {
            Plan::Exact => {
                buf.resize(size, 0);
                fast::encode_record(ctx, schema, record, &mut buf[..])?;
            }
            Plan::Irregular => generic::encode_record(ctx, schema, record, &mut *buf)?,
        }
        Ok(buf)
    }

    fn encode_value(
        &self,
        ctx: &Context<'_>,
        field: &FieldDescriptor,
        value: &dyn FieldValue,
        count: usize,
    ) -> Result<PooledBuffer<'_>> {
        let plan = validate::validate_value(ctx, field, value, count)?;
        let size = size::value_size(ctx, field, value, count)?;
        trace!(wire = field.wire_type.name(), size, ?plan, "pack value");

        let mut buf = self.pool.checkout(size);
        match plan {
            Plan::Exact => {
                buf.resize(size, 0);
                fast::encode_value(ctx, field, value, count, &mut buf[..])?;
            }
            Plan::Irregular => generic::encode_value(ctx, field, value, count, &mut *buf)?,
        }
        Ok(buf)
    }
}

impl Engine<'static> {
    /// The process-wide engine over [`SchemaCache::global`]
    pub fn global() -> &'static Engine<'static> {
        &GLOBAL
    }
}
