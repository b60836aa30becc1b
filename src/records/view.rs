//! # RecordView - Zero-Copy Record Access
//!
//! `RecordView` parses a record's framing (header and directory) over a
//! borrowed byte slice and resolves fields by binary search, without copying
//! payload bytes. All getters return slices or `Cow`-borrowing values tied
//! to the input buffer's lifetime.
//!
//! ```text
//! +--------------+---------------------+------------------+
//! | Header (15B) | Directory           | Payload          |
//! |              | varint N + N x 9B   | values, id order |
//! +--------------+---------------------+------------------+
//! ```
//!
//! Construction validates the header, the directory frame bounds, and the
//! directory's ordering invariants, and allocates nothing: the entry table
//! is used in place as a zerocopy slice. Bytes after the header-declared
//! payload are ignored, so records can be read out of framed streams;
//! [`RecordView::bytes`] returns the record's exact extent.
//!
//! Per-field accessors validate on demand and fail independently: a field
//! with a reserved type code or a truncated body poisons neither the view
//! nor the other fields.
//!
//! ## Thread Safety
//!
//! A view borrows immutably and is freely shareable across threads for
//! concurrent reads.

use crate::error::{Error, Result};
use crate::records::directory::{self, DirectoryEntry, RawEntry};
use crate::records::header::Header;
use crate::records::merge::{self, MergeOptions};
use crate::records::project::{self, ProjectOptions};
use crate::records::types::{Flags, SchemaId, TypeCode, HEADER_LEN};
use crate::records::value::{self, Value};
use crate::records::RecordBuf;

#[derive(Debug, Clone, Copy)]
pub struct RecordView<'a> {
    header: Header,
    directory: &'a [RawEntry],
    payload: &'a [u8],
    /// Total record extent: header + directory frame + payload.
    len: usize,
    data: &'a [u8],
}

impl<'a> RecordView<'a> {
    /// Parses the record at the front of `data`.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        let header = Header::read(data)?;
        let mut cursor = HEADER_LEN;

        let directory: &[RawEntry] = if header.flags.has_directory() {
            let (entries, consumed) = directory::parse(&data[cursor..], cursor)?;
            cursor += consumed;
            entries
        } else {
            &[]
        };

        let payload_size = header.payload_size as usize;
        let available = data.len() - cursor;
        if available < payload_size {
            return Err(Error::Truncated {
                offset: cursor,
                needed: payload_size,
                available,
            });
        }
        let payload = &data[cursor..cursor + payload_size];

        Ok(Self {
            header,
            directory,
            payload,
            len: cursor + payload_size,
            data,
        })
    }

    /// The record's exact encoded bytes, excluding any trailing input.
    pub fn bytes(&self) -> &'a [u8] {
        &self.data[..self.len]
    }

    /// The payload region holding the encoded values.
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    pub fn schema_id(&self) -> SchemaId {
        self.header.schema_id
    }

    pub fn flags(&self) -> Flags {
        self.header.flags
    }

    pub fn field_count(&self) -> usize {
        self.directory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directory.is_empty()
    }

    pub(crate) fn raw_directory(&self) -> &'a [RawEntry] {
        self.directory
    }

    /// Looks up a field by id. O(log N); never touches the payload.
    pub fn find(&self, field_id: u32) -> Option<FieldHandle<'a>> {
        let index = directory::find(self.directory, field_id)?;
        let entry = &self.directory[index];
        Some(FieldHandle {
            id: entry.id.get(),
            raw_type: entry.type_code,
            offset: entry.offset.get(),
            payload: self.payload,
        })
    }

    /// Returns the field's type code and its exact value byte range, as the
    /// value codec would consume it. `None` when the field is absent.
    pub fn get_raw(&self, field_id: u32) -> Result<Option<(TypeCode, &'a [u8])>> {
        match self.find(field_id) {
            Some(handle) => {
                let type_code = handle.type_code()?;
                let bytes = handle.bytes()?;
                Ok(Some((type_code, bytes)))
            }
            None => Ok(None),
        }
    }

    /// Decodes the field's value. `None` when the field is absent.
    pub fn get_value(&self, field_id: u32) -> Result<Option<Value<'a>>> {
        match self.find(field_id) {
            Some(handle) => handle.value().map(Some),
            None => Ok(None),
        }
    }

    /// Iterates fields in canonical (ascending id) order, yielding each
    /// field's id, type code, and exact value byte range.
    pub fn fields(&self) -> Fields<'a> {
        Fields {
            directory: self.directory,
            payload: self.payload,
            index: 0,
        }
    }

    /// Projects this record onto a subset of its fields. See
    /// [`project::project`].
    pub fn project(&self, field_ids: &[u32], options: ProjectOptions) -> Result<RecordBuf> {
        project::project(self, field_ids, options)
    }

    /// Merges another record's fields into this one's. See [`merge::merge`].
    pub fn merge(&self, other: &RecordView<'_>, options: MergeOptions) -> Result<RecordBuf> {
        merge::merge(self, other, options)
    }

    /// Byte range of the value at directory index `index`, located by offset
    /// difference with the next entry (payload end for the last entry).
    ///
    /// This needs no type knowledge, which is what lets the byte-level
    /// operators move values with reserved type codes. For records that
    /// carry dead payload bytes (non-compact merges) the range may extend
    /// past the value's own encoding; the directory rebase keeps that
    /// harmless.
    pub(crate) fn value_range(&self, index: usize) -> Result<(usize, usize)> {
        let start = self.directory[index].offset.get() as usize;
        let end = match self.directory.get(index + 1) {
            Some(next) => next.offset.get() as usize,
            None => self.payload.len(),
        };
        if end > self.payload.len() || start > end {
            return Err(Error::Truncated {
                offset: start.min(self.payload.len()),
                needed: end.saturating_sub(start),
                available: self.payload.len().saturating_sub(start),
            });
        }
        Ok((start, end))
    }
}

/// A resolved directory entry, bound to its record's payload. The type byte
/// is kept raw so that a handle can exist for reserved codes; typed access
/// converts on demand.
#[derive(Debug, Clone, Copy)]
pub struct FieldHandle<'a> {
    id: u32,
    raw_type: u8,
    offset: u32,
    payload: &'a [u8],
}

impl<'a> FieldHandle<'a> {
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Value offset within the payload region.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// The directory's type byte, undecoded.
    pub fn raw_type(&self) -> u8 {
        self.raw_type
    }

    pub fn type_code(&self) -> Result<TypeCode> {
        TypeCode::from_byte(self.raw_type).ok_or(Error::UnknownType {
            offset: self.offset as usize,
            code: self.raw_type,
        })
    }

    /// The validated directory entry.
    pub fn entry(&self) -> Result<DirectoryEntry> {
        Ok(DirectoryEntry {
            field_id: self.id,
            type_code: self.type_code()?,
            offset: self.offset,
        })
    }

    /// The exact byte range of this field's value, measured structurally.
    pub fn bytes(&self) -> Result<&'a [u8]> {
        let start = self.offset as usize;
        if start > self.payload.len() {
            return Err(Error::Truncated {
                offset: self.payload.len(),
                needed: start - self.payload.len(),
                available: 0,
            });
        }
        let rest = &self.payload[start..];
        let size = value::value_size(self.raw_type, rest).map_err(|err| err.rebase(start))?;
        Ok(&rest[..size])
    }

    /// Decodes this field's value.
    pub fn value(&self) -> Result<Value<'a>> {
        let type_code = self.type_code()?;
        let bytes = self.bytes()?;
        let (decoded, _) =
            value::read_value(type_code, bytes).map_err(|err| err.rebase(self.offset as usize))?;
        Ok(decoded)
    }
}

/// Iterator over a record's fields in canonical order. Items fail
/// individually: an unreadable field does not stop iteration.
pub struct Fields<'a> {
    directory: &'a [RawEntry],
    payload: &'a [u8],
    index: usize,
}

impl<'a> Iterator for Fields<'a> {
    type Item = Result<(u32, TypeCode, &'a [u8])>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.directory.get(self.index)?;
        self.index += 1;

        let handle = FieldHandle {
            id: entry.id.get(),
            raw_type: entry.type_code,
            offset: entry.offset.get(),
            payload: self.payload,
        };
        let item = handle
            .type_code()
            .and_then(|type_code| Ok((handle.id(), type_code, handle.bytes()?)));
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.directory.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Fields<'_> {}
