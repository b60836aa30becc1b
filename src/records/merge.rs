//! Merge (composition): combine two records from the same fieldspace into
//! one carrying the union of their fields.
//!
//! A classic two-pointer walk over the two sorted directories. On a field-id
//! collision the left record wins; with the default strict mode the two
//! entries must also agree on their type byte (`TypeMismatch` otherwise),
//! and [`MergeOptions::lenient_types`] relaxes that to a silent left win.
//! Value bytes are copied by range, never decoded, so the operator is
//! O(N_left + N_right) directory work plus one linear payload copy.
//!
//! Collision payload handling is governed by
//! [`MergeOptions::compact_on_collision`]:
//!
//! - `true` (default): the right record's colliding value bytes are dropped;
//!   the output is canonical.
//! - `false`: the right record's colliding value bytes are appended directly
//!   after the left's winning value as dead bytes. The directory never
//!   references them, but byte-range reads of the winning field will span
//!   them, and the output is not canonical.
//!
//! The output schema hash is always zeroed; the merged field set is new, so
//! naming it is the caller's job (see `schema_fingerprint`).

use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::records::builder::RecordBuf;
use crate::records::directory::RawEntry;
use crate::records::types::SchemaId;
use crate::records::view::RecordView;

/// Options for [`merge`].
#[derive(Debug, Clone, Copy)]
pub struct MergeOptions {
    /// Drop the right record's colliding value bytes from the output
    /// payload. When false they are kept as unreferenced dead bytes.
    pub compact_on_collision: bool,
    /// Allow colliding fields to differ in type, silently keeping the left
    /// entry. The default is strict failure.
    pub lenient_types: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            compact_on_collision: true,
            lenient_types: false,
        }
    }
}

/// Merges `right`'s fields into `left`'s, left-biased on collisions.
pub fn merge(
    left: &RecordView<'_>,
    right: &RecordView<'_>,
    options: MergeOptions,
) -> Result<RecordBuf> {
    let left_schema = left.schema_id();
    let right_schema = right.schema_id();
    if left_schema.fieldspace_id != right_schema.fieldspace_id {
        return Err(Error::FieldspaceMismatch {
            left: left_schema.fieldspace_id,
            right: right_schema.fieldspace_id,
        });
    }

    let left_dir = left.raw_directory();
    let right_dir = right.raw_directory();
    let mut entries: SmallVec<[RawEntry; 16]> =
        SmallVec::with_capacity(left_dir.len() + right_dir.len());

    // Copy ranges into each source payload, collected first so the output
    // buffer is allocated once at its exact size.
    let mut left_ranges: SmallVec<[(usize, usize, usize); 16]> = SmallVec::new();
    let mut right_ranges: SmallVec<[(usize, usize, usize); 16]> = SmallVec::new();

    let mut payload_len = 0usize;
    let mut li = 0;
    let mut ri = 0;
    while li < left_dir.len() || ri < right_dir.len() {
        let take_left = match (left_dir.get(li), right_dir.get(ri)) {
            (Some(l), Some(r)) => l.id.get() <= r.id.get(),
            (Some(_), None) => true,
            (None, _) => false,
        };

        if take_left {
            let entry = &left_dir[li];
            let id = entry.id.get();
            let collision = right_dir.get(ri).is_some_and(|r| r.id.get() == id);
            if collision && !options.lenient_types && entry.type_code != right_dir[ri].type_code {
                return Err(Error::TypeMismatch {
                    field_id: id,
                    left: entry.type_code,
                    right: right_dir[ri].type_code,
                });
            }

            entries.push(RawEntry::new(id, entry.type_code, payload_len as u32));
            let (start, end) = left.value_range(li)?;
            left_ranges.push((payload_len, start, end));
            payload_len += end - start;
            li += 1;

            if collision {
                if !options.compact_on_collision {
                    // The loser's bytes ride along as dead payload, directly
                    // after the winning value and unreferenced by any entry.
                    let (start, end) = right.value_range(ri)?;
                    right_ranges.push((payload_len, start, end));
                    payload_len += end - start;
                }
                ri += 1;
            }
        } else {
            let entry = &right_dir[ri];
            entries.push(RawEntry::new(
                entry.id.get(),
                entry.type_code,
                payload_len as u32,
            ));
            let (start, end) = right.value_range(ri)?;
            right_ranges.push((payload_len, start, end));
            payload_len += end - start;
            ri += 1;
        }
    }

    let mut payload = vec![0u8; payload_len];
    for (at, start, end) in left_ranges {
        payload[at..at + (end - start)].copy_from_slice(&left.payload()[start..end]);
    }
    for (at, start, end) in right_ranges {
        payload[at..at + (end - start)].copy_from_slice(&right.payload()[start..end]);
    }

    let schema_id = SchemaId::new(left_schema.fieldspace_id, 0);
    Ok(RecordBuf::assemble(schema_id, &entries, &payload))
}
