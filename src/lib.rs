//! # Imprint - Self-Describing Binary Row Format
//!
//! Imprint is a row format for stream-processing pipelines where each record
//! is serialized once and then reshaped many times on its way through the
//! topology. The format carries its own field index, so the two operations
//! pipelines perform constantly — selecting a subset of fields and gluing
//! two records together — run as pointer arithmetic over the encoded bytes:
//! no value decoding, no schema registry round-trip.
//!
//! ## Quick Start
//!
//! ```ignore
//! use imprint::{MergeOptions, ProjectOptions, RecordBuilder, RecordView, SchemaId};
//!
//! let mut builder = RecordBuilder::new(SchemaId::new(7, 0xfeed_cafe));
//! builder.set(1, 42i32)?;
//! builder.set(2, "hi")?;
//! let record = builder.finalize()?;
//!
//! let view = record.view()?;
//! assert_eq!(view.get_value(1)?, Some(42i32.into()));
//!
//! // Keep only field 2, by slicing — field 1's bytes are never decoded.
//! let narrowed = view.project(&[2], ProjectOptions::default())?;
//!
//! // Union with another record from the same fieldspace.
//! let merged = view.merge(&other.view()?, MergeOptions::default())?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------+
//! |        Operators (project / merge)               |
//! +--------------------------------------------------+
//! |  RecordBuilder          |  RecordView             |
//! +--------------------------------------------------+
//! |  Value codec (recursive encode/decode/size)      |
//! +--------------------------------------------------+
//! |  Header codec  |  Directory codec  |  Varint     |
//! +--------------------------------------------------+
//! ```
//!
//! Everything is synchronous, allocation-light, and I/O-free. A
//! [`RecordView`] borrows its byte slice immutably and is freely shareable
//! across threads; [`RecordBuilder`] is a single-owner accumulator; the
//! operators are pure functions from byte sequences to fresh owned byte
//! sequences.
//!
//! ## Canonical Form
//!
//! A record is canonical when its directory entries are strictly ascending
//! by field id and the payload holds the values in that same order. Builder
//! output, projection output, and (compact) merge output are all canonical,
//! which gives the format its equality property: two canonical records with
//! the same logical content are byte-identical.

pub mod encoding;
pub mod error;
pub mod records;

pub use error::{Error, Result};
pub use records::{
    merge, project, schema_fingerprint, DirectoryCache, DirectoryEntry, FieldHandle, Fields,
    Flags, MapKey, MergeOptions, ParsedDirectory, ProjectOptions, RecordBuf, RecordBuilder,
    RecordView, SchemaId, TypeCode, Value, MAGIC, MAX_DEPTH, VERSION,
};
