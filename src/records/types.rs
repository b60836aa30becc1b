//! # Core Format Types
//!
//! Shared identifiers and tags for the record wire format:
//!
//! - `TypeCode`: the closed set of value type tags
//! - `Flags`: the header flag byte (bit 0 = field directory present)
//! - `SchemaId`: the `(fieldspace_id, schema_hash)` pair carried by every
//!   record header
//! - `schema_fingerprint`: deterministic CRC-32 over a field layout, for
//!   callers that assign schema hashes
//!
//! ## Type Codes
//!
//! | Code | Type | Width |
//! |------|---------|-----------------------|
//! | 0x0 | null | 0 |
//! | 0x1 | bool | 1 |
//! | 0x2 | int32 | 4 |
//! | 0x3 | int64 | 8 |
//! | 0x4 | float32 | 4 |
//! | 0x5 | float64 | 8 |
//! | 0x6 | bytes | varint length prefix |
//! | 0x7 | string | varint length prefix |
//! | 0x8 | array | count + element type |
//! | 0x9 | map | count + key/value types|
//! | 0xA | row | nested record |
//!
//! Codes `0xB..=0xFF` are reserved and never emitted.

use crc::{Crc, CRC_32_ISCSI};

/// First byte of every record (ASCII 'I').
pub const MAGIC: u8 = 0x49;
/// Format version emitted and accepted by this crate.
pub const VERSION: u8 = 0x01;
/// Fixed header size in bytes.
pub const HEADER_LEN: usize = 15;
/// Fixed directory entry size in bytes.
pub const DIR_ENTRY_LEN: usize = 9;

/// Type tag for an encoded value.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCode {
    Null = 0x0,
    Bool = 0x1,
    Int32 = 0x2,
    Int64 = 0x3,
    Float32 = 0x4,
    Float64 = 0x5,
    Bytes = 0x6,
    String = 0x7,
    Array = 0x8,
    Map = 0x9,
    Row = 0xA,
}

impl TypeCode {
    /// Maps a wire byte to a type code, `None` for reserved codes.
    pub fn from_byte(byte: u8) -> Option<TypeCode> {
        match byte {
            0x0 => Some(TypeCode::Null),
            0x1 => Some(TypeCode::Bool),
            0x2 => Some(TypeCode::Int32),
            0x3 => Some(TypeCode::Int64),
            0x4 => Some(TypeCode::Float32),
            0x5 => Some(TypeCode::Float64),
            0x6 => Some(TypeCode::Bytes),
            0x7 => Some(TypeCode::String),
            0x8 => Some(TypeCode::Array),
            0x9 => Some(TypeCode::Map),
            0xA => Some(TypeCode::Row),
            _ => None,
        }
    }

    /// Encoded width for types whose values occupy a fixed number of bytes.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            TypeCode::Null => Some(0),
            TypeCode::Bool => Some(1),
            TypeCode::Int32 | TypeCode::Float32 => Some(4),
            TypeCode::Int64 | TypeCode::Float64 => Some(8),
            _ => None,
        }
    }

    /// Whether this type may appear as a map key.
    pub fn is_map_key(self) -> bool {
        matches!(
            self,
            TypeCode::Int32 | TypeCode::Int64 | TypeCode::Bytes | TypeCode::String
        )
    }
}

/// Header flag byte. Bit 0 marks a field directory as present; bits 1-7 are
/// reserved and must be zero in version 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags(u8);

impl Flags {
    pub const DIRECTORY: u8 = 0x01;
    pub(crate) const RESERVED: u8 = !Self::DIRECTORY;

    /// Wraps a validated flag byte. Reserved-bit checking happens in the
    /// header codec, which knows the byte's offset.
    pub(crate) fn from_bits(bits: u8) -> Self {
        Flags(bits)
    }

    /// The flag byte as written to the wire.
    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn has_directory(self) -> bool {
        self.0 & Self::DIRECTORY != 0
    }
}

/// Identifies what a record carries: the fieldspace its field ids are drawn
/// from and a hash of the field subset present. Both are opaque to this
/// crate; the pair serves as the directory-cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaId {
    pub fieldspace_id: u32,
    pub schema_hash: u32,
}

impl SchemaId {
    pub fn new(fieldspace_id: u32, schema_hash: u32) -> Self {
        Self {
            fieldspace_id,
            schema_hash,
        }
    }
}

const FINGERPRINT: Crc<u32> = Crc::<u32>::new(&CRC_32_ISCSI);

/// CRC-32 fingerprint of a field layout, fed with `(field_id, type)` pairs in
/// ascending id order.
///
/// The core never assigns schema hashes itself; writers and projection
/// callers can use this to derive one deterministically from the fields a
/// record carries.
pub fn schema_fingerprint<I>(fields: I) -> u32
where
    I: IntoIterator<Item = (u32, TypeCode)>,
{
    let mut digest = FINGERPRINT.digest();
    for (field_id, type_code) in fields {
        digest.update(&field_id.to_le_bytes());
        digest.update(&[type_code as u8]);
    }
    digest.finalize()
}
