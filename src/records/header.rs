//! Fixed 15-byte record header codec.
//!
//! ```text
//! +-------+---------+-------+---------------+-------------+--------------+
//! | Magic | Version | Flags | Fieldspace id | Schema hash | Payload size |
//! | 0x49  | 0x01    | u8    | u32 LE        | u32 LE      | u32 LE       |
//! +-------+---------+-------+---------------+-------------+--------------+
//! ```

use zerocopy::byteorder::{LittleEndian, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::error::{Error, Result};
use crate::records::types::{Flags, SchemaId, HEADER_LEN, MAGIC, VERSION};

/// Wire image of the header.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
struct RawHeader {
    magic: u8,
    version: u8,
    flags: u8,
    fieldspace_id: U32<LittleEndian>,
    schema_hash: U32<LittleEndian>,
    payload_size: U32<LittleEndian>,
}

const _: () = assert!(std::mem::size_of::<RawHeader>() == HEADER_LEN);

/// Parsed record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub flags: Flags,
    pub schema_id: SchemaId,
    pub payload_size: u32,
}

impl Header {
    /// Parses the header at the front of `data`.
    pub fn read(data: &[u8]) -> Result<Header> {
        let (raw, _) =
            RawHeader::read_from_prefix(data).map_err(|_| Error::Truncated {
                offset: 0,
                needed: HEADER_LEN,
                available: data.len(),
            })?;

        if raw.magic != MAGIC {
            return Err(Error::BadMagic {
                offset: 0,
                found: raw.magic,
            });
        }
        if raw.version != VERSION {
            return Err(Error::UnsupportedVersion {
                offset: 1,
                found: raw.version,
            });
        }
        if raw.flags & Flags::RESERVED != 0 {
            return Err(Error::ReservedFlagSet {
                offset: 2,
                flags: raw.flags,
            });
        }

        Ok(Header {
            flags: Flags::from_bits(raw.flags),
            schema_id: SchemaId::new(raw.fieldspace_id.get(), raw.schema_hash.get()),
            payload_size: raw.payload_size.get(),
        })
    }

    /// Appends the 15-byte wire image to `buf`.
    pub fn write(&self, buf: &mut Vec<u8>) {
        let raw = RawHeader {
            magic: MAGIC,
            version: VERSION,
            flags: self.flags.bits(),
            fieldspace_id: U32::new(self.schema_id.fieldspace_id),
            schema_hash: U32::new(self.schema_id.schema_hash),
            payload_size: U32::new(self.payload_size),
        };
        buf.extend_from_slice(raw.as_bytes());
    }
}
