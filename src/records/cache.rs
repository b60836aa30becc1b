//! Optional directory memoization for pipelines that see the same record
//! shapes over and over.
//!
//! Stream processors typically handle long runs of records sharing one
//! `(fieldspace id, schema hash)` pair. `DirectoryCache` lets them parse and
//! validate a directory once and reuse the typed entry table for every
//! subsequent record with the same key. The cache is an explicit
//! collaborator: the core never consults one on its own, and eviction is
//! entirely caller-controlled (`remove`, `clear`).
//!
//! Entries are `Arc`-shared and the map sits behind a read-write lock, so
//! concurrent readers touch only the read path.

use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::records::directory::DirectoryEntry;
use crate::records::types::{SchemaId, TypeCode};
use crate::records::view::RecordView;

/// A fully validated, owned directory: every entry's type byte resolved to a
/// `TypeCode`, entries in ascending field-id order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDirectory {
    entries: Box<[DirectoryEntry]>,
}

impl ParsedDirectory {
    /// Materializes the directory of `record`. Fails with `UnknownType` if
    /// any entry carries a reserved type code.
    pub fn from_view(record: &RecordView<'_>) -> Result<Self> {
        let entries = record
            .raw_directory()
            .iter()
            .map(|entry| {
                let code = entry.type_code;
                let type_code = TypeCode::from_byte(code).ok_or(Error::UnknownType {
                    offset: entry.offset.get() as usize,
                    code,
                })?;
                Ok(DirectoryEntry {
                    field_id: entry.id.get(),
                    type_code,
                    offset: entry.offset.get(),
                })
            })
            .collect::<Result<Box<[DirectoryEntry]>>>()?;
        Ok(Self { entries })
    }

    /// Binary search by field id.
    pub fn find(&self, field_id: u32) -> Option<&DirectoryEntry> {
        let index = self
            .entries
            .binary_search_by_key(&field_id, |entry| entry.field_id)
            .ok()?;
        Some(&self.entries[index])
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Maps `SchemaId` to a shared parsed directory.
#[derive(Debug, Default)]
pub struct DirectoryCache {
    inner: RwLock<HashMap<SchemaId, Arc<ParsedDirectory>>>,
}

impl DirectoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, schema_id: &SchemaId) -> Option<Arc<ParsedDirectory>> {
        self.inner.read().get(schema_id).cloned()
    }

    /// Returns the cached directory for the record's schema id, parsing and
    /// inserting it on first sight.
    pub fn get_or_parse(&self, record: &RecordView<'_>) -> Result<Arc<ParsedDirectory>> {
        let schema_id = record.schema_id();
        if let Some(parsed) = self.get(&schema_id) {
            return Ok(parsed);
        }
        let parsed = Arc::new(ParsedDirectory::from_view(record)?);
        let mut map = self.inner.write();
        let shared = map.entry(schema_id).or_insert(parsed);
        Ok(Arc::clone(shared))
    }

    pub fn insert(&self, schema_id: SchemaId, directory: Arc<ParsedDirectory>) {
        self.inner.write().insert(schema_id, directory);
    }

    pub fn remove(&self, schema_id: &SchemaId) -> Option<Arc<ParsedDirectory>> {
        self.inner.write().remove(schema_id)
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}
