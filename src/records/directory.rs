//! Directory codec: the sorted field index that makes point lookups
//! O(log N).
//!
//! ```text
//! +-----------+-----------------------------------+
//! | Count     | Entries                           |
//! | varint N  | N x (id u32 LE, type u8, off u32) |
//! +-----------+-----------------------------------+
//! ```
//!
//! Entries are strictly ascending by field id, and because payload values
//! are laid out in directory order their offsets are non-decreasing; both
//! orderings are validated when the directory frame is parsed. Offsets are
//! not checked against the payload here — value access validates bounds on
//! demand.
//!
//! The entry table is read in place as a `&[RawEntry]` zerocopy slice, so
//! parsing allocates nothing and binary search runs directly over the wire
//! bytes. The type byte stays raw in `RawEntry`: the byte-slicing operators
//! move fields without ever interpreting their types, and only typed access
//! converts it (failing with `UnknownType` on reserved codes).

use zerocopy::byteorder::{LittleEndian, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::encoding::varint;
use crate::error::{Error, Result};
use crate::records::types::{TypeCode, DIR_ENTRY_LEN};

/// Wire image of one directory entry.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub(crate) struct RawEntry {
    pub id: U32<LittleEndian>,
    pub type_code: u8,
    pub offset: U32<LittleEndian>,
}

const _: () = assert!(std::mem::size_of::<RawEntry>() == DIR_ENTRY_LEN);

impl RawEntry {
    pub(crate) fn new(id: u32, type_code: u8, offset: u32) -> Self {
        Self {
            id: U32::new(id),
            type_code,
            offset: U32::new(offset),
        }
    }
}

/// A validated directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub field_id: u32,
    pub type_code: TypeCode,
    pub offset: u32,
}

/// Parses the directory frame at the front of `data`, returning the entry
/// table and the number of bytes consumed. `base` is the frame's offset
/// within the enclosing record, used only for error reporting.
pub(crate) fn parse(data: &[u8], base: usize) -> Result<(&[RawEntry], usize)> {
    let (count, count_len) = varint::decode_u32(data).map_err(|err| err.rebase(base))?;
    let table_len = count as usize * DIR_ENTRY_LEN;
    let table = data
        .get(count_len..count_len + table_len)
        .ok_or(Error::Truncated {
            offset: base + count_len,
            needed: table_len,
            available: data.len().saturating_sub(count_len),
        })?;

    let entries = <[RawEntry]>::ref_from_bytes(table).map_err(|_| Error::Truncated {
        offset: base + count_len,
        needed: table_len,
        available: table.len(),
    })?;

    for (i, pair) in entries.windows(2).enumerate() {
        let entry_offset = base + count_len + (i + 1) * DIR_ENTRY_LEN;
        if pair[1].id.get() == pair[0].id.get() {
            return Err(Error::DuplicateFieldId {
                field_id: pair[1].id.get(),
            });
        }
        if pair[1].id.get() < pair[0].id.get() || pair[1].offset.get() < pair[0].offset.get() {
            return Err(Error::DirectoryUnsorted {
                offset: entry_offset,
                field_id: pair[1].id.get(),
            });
        }
    }

    Ok((entries, count_len + table_len))
}

/// Binary search by field id. Returns the entry's index in the table.
pub(crate) fn find(entries: &[RawEntry], field_id: u32) -> Option<usize> {
    entries
        .binary_search_by_key(&field_id, |entry| entry.id.get())
        .ok()
}

/// Appends the directory frame (count + entry table) to `buf`.
pub(crate) fn write(entries: &[RawEntry], buf: &mut Vec<u8>) {
    varint::encode_u32(entries.len() as u32, buf);
    buf.extend_from_slice(entries.as_bytes());
}
