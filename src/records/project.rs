//! Projection: produce a record carrying a chosen subset of another
//! record's fields, by slicing the encoded bytes.
//!
//! The operator walks the source directory and the (sorted, deduplicated)
//! requested ids with two cursors, collects the byte range of each selected
//! value, and emits a fresh canonical record with offsets rebased to the new
//! payload. Value bodies are never decoded, so fields with reserved type
//! codes project fine.
//!
//! Requested ids absent from the source are silently ignored; an empty
//! request yields a valid zero-field record. The fieldspace id is inherited.
//! The schema hash is zeroed unless [`ProjectOptions::preserve_schema_hash`]
//! is set — assigning a meaningful hash for the narrowed field set is the
//! caller's job (see `schema_fingerprint`).

use smallvec::SmallVec;

use crate::error::Result;
use crate::records::builder::RecordBuf;
use crate::records::directory::RawEntry;
use crate::records::types::SchemaId;
use crate::records::view::RecordView;

/// Options for [`project`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectOptions {
    /// Carry the source record's schema hash into the output instead of
    /// zeroing it.
    pub preserve_schema_hash: bool,
}

/// Projects `record` onto the fields named in `field_ids`.
pub fn project(
    record: &RecordView<'_>,
    field_ids: &[u32],
    options: ProjectOptions,
) -> Result<RecordBuf> {
    let mut wanted: SmallVec<[u32; 16]> = SmallVec::from_slice(field_ids);
    wanted.sort_unstable();
    wanted.dedup();

    let directory = record.raw_directory();
    let mut entries: SmallVec<[RawEntry; 16]> = SmallVec::new();
    let mut ranges: SmallVec<[(usize, usize); 16]> = SmallVec::new();

    // Both sequences are sorted; advance them in lockstep and collect the
    // byte range of every match.
    let mut payload_len = 0usize;
    let mut wanted_iter = wanted.iter().copied().peekable();
    for (index, entry) in directory.iter().enumerate() {
        let id = entry.id.get();
        while wanted_iter.peek().is_some_and(|&w| w < id) {
            wanted_iter.next();
        }
        if wanted_iter.peek() != Some(&id) {
            continue;
        }
        wanted_iter.next();

        let (start, end) = record.value_range(index)?;
        entries.push(RawEntry::new(id, entry.type_code, payload_len as u32));
        ranges.push((start, end));
        payload_len += end - start;
    }

    let mut payload = Vec::with_capacity(payload_len);
    let source = record.payload();
    for (start, end) in ranges {
        payload.extend_from_slice(&source[start..end]);
    }

    let schema_hash = if options.preserve_schema_hash {
        record.schema_id().schema_hash
    } else {
        0
    };
    let schema_id = SchemaId::new(record.schema_id().fieldspace_id, schema_hash);
    Ok(RecordBuf::assemble(schema_id, &entries, &payload))
}
