//! Fuzz testing for the record parser.
//!
//! Feeds arbitrary byte sequences to RecordView and walks every field with
//! both raw and typed access; malformed input must surface as errors, never
//! as panics.

#![no_main]

use libfuzzer_sys::fuzz_target;

use imprint::{MergeOptions, ProjectOptions, RecordView};

fuzz_target!(|data: &[u8]| {
    let Ok(view) = RecordView::new(data) else {
        return;
    };

    let mut ids = Vec::new();
    for field in view.fields() {
        if let Ok((id, _, _)) = field {
            ids.push(id);
        }
    }
    for &id in &ids {
        let _ = view.get_raw(id);
        let _ = view.get_value(id);
    }

    // The slicing operators must tolerate anything the parser accepted.
    let _ = view.project(&ids, ProjectOptions::default());
    let _ = view.merge(&view, MergeOptions::default());
});
