//! Process-wide schema cache
//!
//! Memoizes [`resolve`] by record type identity. Any number of threads may
//! ask for schemas concurrently:
//!
//! - Reads of a present entry go through a DashMap shard read lock.
//! - Resolution runs outside any lock. Two threads missing on the same type
//!   both resolve it; the first insert wins and both return that entry.
//!   Resolution is pure, so the loser's work is identical and is dropped.
//! - Failures are cached too: a broken shape resolves once.
//!
//! Nested record shapes are resolved eagerly along with their parent, so a
//! schema handed out by the cache has every nested schema in the cache as
//! well. A nested failure fails the parent.

use super::descriptor::FieldSchema;
use super::resolve::resolve;
use crate::error::SchemaError;
use crate::record::{Record, RecordType};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::any::TypeId;
use std::sync::Arc;
use tracing::debug;

type Entry = Result<Arc<FieldSchema>, SchemaError>;

static GLOBAL: Lazy<SchemaCache> = Lazy::new(SchemaCache::new);

/// Memoized record shape -> field schema
#[derive(Debug, Default)]
pub struct SchemaCache {
    entries: DashMap<TypeId, Entry>,
}

impl SchemaCache {
    /// Create an empty cache
    pub fn new() -> Self {
        SchemaCache {
            entries: DashMap::new(),
        }
    }

    /// The process-wide cache used by the top-level API
    pub fn global() -> &'static SchemaCache {
        &GLOBAL
    }

    /// Schema for a record shape, resolving it on first use
    pub fn schema(&self, record: RecordType) -> Result<Arc<FieldSchema>, SchemaError> {
        let mut visiting = Vec::new();
        self.lookup(record, &mut visiting)
    }

    /// Schema for record type `R`
    pub fn schema_of<R: Record + 'static>(&self) -> Result<Arc<FieldSchema>, SchemaError> {
        self.schema(RecordType::of::<R>())
    }

    /// Check whether a shape has an entry (resolved or failed)
    pub fn contains(&self, record: RecordType) -> bool {
        self.entries.contains_key(&record.id())
    }

    /// Number of cached shapes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been resolved yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, record: RecordType, visiting: &mut Vec<TypeId>) -> Entry {
        if let Some(entry) = self.entries.get(&record.id()) {
            return entry.value().clone();
        }

        if visiting.contains(&record.id()) {
            return Err(SchemaError::Recursive {
                record: record.name().to_string(),
            });
        }

        visiting.push(record.id());
        let built = self.build(record, visiting);
        visiting.pop();

        match &built {
            Ok(schema) => debug!(record = record.name(), fields = schema.len(), "resolved schema"),
            Err(e) => debug!(record = record.name(), error = %e, "schema resolution failed"),
        }

        self.entries
            .entry(record.id())
            .or_insert(built)
            .value()
            .clone()
    }

    fn build(&self, record: RecordType, visiting: &mut Vec<TypeId>) -> Entry {
        let schema = resolve(record)?;
        for nested in schema.nested_types() {
            self.lookup(nested, visiting)?;
        }
        Ok(Arc::new(schema))
    }
}
