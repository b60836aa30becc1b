//! Error types for record parsing, value decoding, and the byte-level
//! operators.
//!
//! The set of failure kinds is closed: every fallible operation in this crate
//! returns one of the variants below. Variants carry the offending byte
//! offset where one exists, measured from the start of the slice being
//! decoded (for nested values this is the offset within the value's own
//! byte range, not the enclosing record).
//!
//! Construction-time parsing (header, directory frame, builder finalize)
//! fails fast. Per-field accessors fail independently without invalidating
//! the reader. Projection and merge are all-or-nothing: no partial output is
//! ever produced.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("bad magic byte {found:#04x} at offset {offset}")]
    BadMagic { offset: usize, found: u8 },

    #[error("unsupported format version {found} at offset {offset}")]
    UnsupportedVersion { offset: usize, found: u8 },

    #[error("reserved flag bits set in {flags:#04x} at offset {offset}")]
    ReservedFlagSet { offset: usize, flags: u8 },

    #[error("malformed varint at offset {offset}")]
    MalformedVarint { offset: usize },

    #[error("directory entry for field {field_id} at offset {offset} is out of order")]
    DirectoryUnsorted { offset: usize, field_id: u32 },

    #[error("duplicate field id {field_id}")]
    DuplicateFieldId { field_id: u32 },

    #[error("truncated input at offset {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("unknown type code {code:#04x} at offset {offset}")]
    UnknownType { offset: usize, code: u8 },

    #[error("invalid utf-8 in string value at offset {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("type code {code:#04x} is not a valid map key type")]
    InvalidMapKeyType { code: u8 },

    #[error("cannot merge records from fieldspace {left} and fieldspace {right}")]
    FieldspaceMismatch { left: u32, right: u32 },

    #[error("field {field_id} has type {left:#04x} on the left and {right:#04x} on the right")]
    TypeMismatch { field_id: u32, left: u8, right: u8 },

    #[error("value nesting exceeds the depth limit of {limit}")]
    DepthLimitExceeded { limit: usize },

    #[error("container elements must share one type: expected {expected:#04x}, found {found:#04x}")]
    MixedContainerTypes { expected: u8, found: u8 },
}

impl Error {
    /// Shifts an offset-carrying error from a nested slice's coordinates
    /// into the enclosing frame's.
    pub(crate) fn rebase(self, base: usize) -> Error {
        match self {
            Error::MalformedVarint { offset } => Error::MalformedVarint {
                offset: base + offset,
            },
            Error::Truncated {
                offset,
                needed,
                available,
            } => Error::Truncated {
                offset: base + offset,
                needed,
                available,
            },
            Error::UnknownType { offset, code } => Error::UnknownType {
                offset: base + offset,
                code,
            },
            Error::InvalidUtf8 { offset } => Error::InvalidUtf8 {
                offset: base + offset,
            },
            Error::BadMagic { offset, found } => Error::BadMagic {
                offset: base + offset,
                found,
            },
            Error::UnsupportedVersion { offset, found } => Error::UnsupportedVersion {
                offset: base + offset,
                found,
            },
            Error::ReservedFlagSet { offset, flags } => Error::ReservedFlagSet {
                offset: base + offset,
                flags,
            },
            Error::DirectoryUnsorted { offset, field_id } => Error::DirectoryUnsorted {
                offset: base + offset,
                field_id,
            },
            other => other,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
