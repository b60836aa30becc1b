//! # RecordBuilder - Record Construction
//!
//! `RecordBuilder` accumulates `(field id, value)` pairs, encoding each
//! value as it is set, and emits canonical record bytes on
//! [`RecordBuilder::finalize`]: fields sorted ascending by id, payload laid
//! out in the same order, offsets assigned as running sums. Because the
//! output is canonical, logically equal field sets always serialize to
//! byte-identical records.
//!
//! Setting a field id twice replaces the earlier value (last write wins).
//! [`RecordBuilder::deny_duplicates`] switches to strict mode, where
//! `finalize` reports `DuplicateFieldId` instead.
//!
//! ## Usage
//!
//! ```ignore
//! let mut builder = RecordBuilder::new(SchemaId::new(7, 0));
//! builder.set(1, 42i32)?;
//! builder.set(2, "hi")?;
//! let record = builder.finalize()?;
//! let view = record.view()?;
//! ```

use crate::encoding::varint;
use crate::error::{Error, Result};
use crate::records::directory::{self, RawEntry};
use crate::records::header::Header;
use crate::records::types::{Flags, SchemaId, TypeCode, DIR_ENTRY_LEN, HEADER_LEN};
use crate::records::value::{self, Value};
use crate::records::view::RecordView;

#[derive(Debug, Clone)]
struct FieldSlot {
    field_id: u32,
    type_code: TypeCode,
    bytes: Vec<u8>,
}

/// Accumulates fields and emits canonical record bytes.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    schema_id: SchemaId,
    fields: Vec<FieldSlot>,
    deny_duplicates: bool,
}

impl RecordBuilder {
    pub fn new(schema_id: SchemaId) -> Self {
        Self {
            schema_id,
            fields: Vec::new(),
            deny_duplicates: false,
        }
    }

    /// Makes `finalize` fail with `DuplicateFieldId` when a field id was set
    /// more than once, instead of keeping the last write.
    pub fn deny_duplicates(mut self) -> Self {
        self.deny_duplicates = true;
        self
    }

    /// Number of fields currently staged. Replaced fields count once.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Encodes `value` under `field_id`. In the default mode a repeated id
    /// replaces the staged value in place.
    pub fn set<'v>(&mut self, field_id: u32, value: impl Into<Value<'v>>) -> Result<()> {
        let value = value.into();
        let type_code = value.type_code();
        let mut bytes = Vec::new();
        value::write_value(&value, &mut bytes)?;

        if !self.deny_duplicates {
            if let Some(slot) = self.fields.iter_mut().find(|slot| slot.field_id == field_id) {
                slot.type_code = type_code;
                slot.bytes = bytes;
                return Ok(());
            }
        }
        self.fields.push(FieldSlot {
            field_id,
            type_code,
            bytes,
        });
        Ok(())
    }

    /// Sorts fields by id, assigns offsets, and emits the record.
    pub fn finalize(mut self) -> Result<RecordBuf> {
        self.fields.sort_by_key(|slot| slot.field_id);
        if let Some(pair) = self
            .fields
            .windows(2)
            .find(|pair| pair[0].field_id == pair[1].field_id)
        {
            return Err(Error::DuplicateFieldId {
                field_id: pair[0].field_id,
            });
        }

        let payload_len: usize = self.fields.iter().map(|slot| slot.bytes.len()).sum();
        let mut entries = Vec::with_capacity(self.fields.len());
        let mut payload = Vec::with_capacity(payload_len);
        for slot in &self.fields {
            entries.push(RawEntry::new(
                slot.field_id,
                slot.type_code as u8,
                payload.len() as u32,
            ));
            payload.extend_from_slice(&slot.bytes);
        }

        Ok(RecordBuf::assemble(self.schema_id, &entries, &payload))
    }
}

/// An owned, canonically encoded record, as produced by the builder and the
/// byte-level operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordBuf {
    bytes: Vec<u8>,
}

impl RecordBuf {
    /// Assembles header + directory + payload into a single buffer.
    pub(crate) fn assemble(schema_id: SchemaId, entries: &[RawEntry], payload: &[u8]) -> RecordBuf {
        let header = Header {
            flags: Flags::from_bits(Flags::DIRECTORY),
            schema_id,
            payload_size: payload.len() as u32,
        };

        let dir_len = varint::varint_len(entries.len() as u64) + entries.len() * DIR_ENTRY_LEN;
        let mut bytes = Vec::with_capacity(HEADER_LEN + dir_len + payload.len());
        header.write(&mut bytes);
        directory::write(entries, &mut bytes);
        bytes.extend_from_slice(payload);
        RecordBuf { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Opens a view over this record.
    pub fn view(&self) -> Result<RecordView<'_>> {
        RecordView::new(&self.bytes)
    }
}

impl AsRef<[u8]> for RecordBuf {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<RecordBuf> for Vec<u8> {
    fn from(record: RecordBuf) -> Vec<u8> {
        record.bytes
    }
}

impl<'a> From<&'a RecordBuf> for Value<'a> {
    /// Embeds the record as a row value.
    fn from(record: &'a RecordBuf) -> Value<'a> {
        Value::Row(std::borrow::Cow::Borrowed(record.as_bytes()))
    }
}
