//! End-to-end scenarios over exact wire images: building, projecting, and
//! merging records, asserted byte for byte.

use imprint::{
    Error, MergeOptions, ProjectOptions, RecordBuilder, RecordView, SchemaId, TypeCode, Value,
};

#[test]
fn primitive_record_matches_reference_wire_image() {
    let mut builder = RecordBuilder::new(SchemaId::new(7, 0));
    builder.set(1, 42i32).unwrap();
    builder.set(2, "hi").unwrap();
    let record = builder.finalize().unwrap();

    #[rustfmt::skip]
    let expected: &[u8] = &[
        // header: magic, version, flags, fieldspace 7, hash 0, payload size 7
        0x49, 0x01, 0x01,
        0x07, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00,
        0x07, 0x00, 0x00, 0x00,
        // directory: count 2
        0x02,
        0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00,
        0x02, 0x00, 0x00, 0x00, 0x07, 0x04, 0x00, 0x00, 0x00,
        // payload: int32 42, then "hi" with varint length 2
        0x2a, 0x00, 0x00, 0x00,
        0x02, 0x68, 0x69,
    ];
    assert_eq!(record.as_bytes(), expected);

    let view = record.view().unwrap();
    assert_eq!(view.schema_id(), SchemaId::new(7, 0));
    assert_eq!(view.get_value(1).unwrap(), Some(Value::Int32(42)));
    assert_eq!(view.get_value(2).unwrap(), Some("hi".into()));
}

#[test]
fn projection_rebases_offsets() {
    let mut builder = RecordBuilder::new(SchemaId::new(7, 0));
    builder.set(1, 42i32).unwrap();
    builder.set(2, "hi").unwrap();
    let record = builder.finalize().unwrap();

    let projected = record
        .view()
        .unwrap()
        .project(&[2], ProjectOptions::default())
        .unwrap();

    #[rustfmt::skip]
    let expected: &[u8] = &[
        0x49, 0x01, 0x01,
        0x07, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00,
        0x03, 0x00, 0x00, 0x00,
        0x01,
        0x02, 0x00, 0x00, 0x00, 0x07, 0x00, 0x00, 0x00, 0x00,
        0x02, 0x68, 0x69,
    ];
    assert_eq!(projected.as_bytes(), expected);
}

#[test]
fn disjoint_merge_concatenates_payloads() {
    let mut a = RecordBuilder::new(SchemaId::new(7, 0));
    a.set(1, 1i32).unwrap();
    let a = a.finalize().unwrap();

    let mut b = RecordBuilder::new(SchemaId::new(7, 0));
    b.set(2, 2i32).unwrap();
    let b = b.finalize().unwrap();

    let merged = a
        .view()
        .unwrap()
        .merge(&b.view().unwrap(), MergeOptions::default())
        .unwrap();
    let view = merged.view().unwrap();

    assert_eq!(view.find(1).unwrap().offset(), 0);
    assert_eq!(view.find(2).unwrap().offset(), 4);
    assert_eq!(
        view.payload(),
        [0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00]
    );
}

#[test]
fn colliding_merge_drops_the_losing_bytes() {
    let mut a = RecordBuilder::new(SchemaId::new(7, 0));
    a.set(1, 1i32).unwrap();
    a.set(3, "a").unwrap();
    let a = a.finalize().unwrap();

    let mut b = RecordBuilder::new(SchemaId::new(7, 0));
    b.set(1, 9i32).unwrap();
    b.set(2, 2i32).unwrap();
    let b = b.finalize().unwrap();

    let merged = a
        .view()
        .unwrap()
        .merge(&b.view().unwrap(), MergeOptions::default())
        .unwrap();
    let view = merged.view().unwrap();

    assert_eq!(view.get_value(1).unwrap(), Some(Value::Int32(1)));
    let ids: Vec<u32> = view.fields().map(|field| field.unwrap().0).collect();
    assert_eq!(ids, [1, 2, 3]);

    // int32(1) + int32(2) + "a"; the losing int32(9) appears nowhere.
    assert_eq!(
        view.payload(),
        [0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x01, 0x61]
    );
}

#[test]
fn wrong_magic_is_rejected() {
    let mut bytes = {
        let mut builder = RecordBuilder::new(SchemaId::new(7, 0));
        builder.set(1, 42i32).unwrap();
        builder.finalize().unwrap().into_vec()
    };
    bytes[0] = 0x4a;
    assert_eq!(
        RecordView::new(&bytes).unwrap_err(),
        Error::BadMagic {
            offset: 0,
            found: 0x4a
        }
    );
}

#[test]
fn nested_row_bytes_feed_back_into_a_view() {
    let mut inner = RecordBuilder::new(SchemaId::new(7, 0));
    inner.set(1, 99i32).unwrap();
    let inner = inner.finalize().unwrap();

    let mut outer = RecordBuilder::new(SchemaId::new(7, 0));
    outer.set(5, &inner).unwrap();
    let outer = outer.finalize().unwrap();

    let view = outer.view().unwrap();
    let (type_code, raw) = view.get_raw(5).unwrap().unwrap();
    assert_eq!(type_code, TypeCode::Row);
    assert_eq!(raw, inner.as_bytes());

    let nested = RecordView::new(raw).unwrap();
    assert_eq!(nested.get_value(1).unwrap(), Some(Value::Int32(99)));
}

#[test]
fn pipeline_of_operators_preserves_values() {
    // enrich-then-narrow, the shape these records exist for
    let mut event = RecordBuilder::new(SchemaId::new(11, 0));
    event.set(1, 1001i64).unwrap();
    event.set(2, "click").unwrap();
    event.set(3, 0.25f64).unwrap();
    let event = event.finalize().unwrap();

    let mut enrichment = RecordBuilder::new(SchemaId::new(11, 0));
    enrichment.set(4, "eu-west").unwrap();
    enrichment.set(5, true).unwrap();
    let enrichment = enrichment.finalize().unwrap();

    let enriched = event
        .view()
        .unwrap()
        .merge(&enrichment.view().unwrap(), MergeOptions::default())
        .unwrap();
    let narrowed = enriched
        .view()
        .unwrap()
        .project(&[1, 4], ProjectOptions::default())
        .unwrap();

    let view = narrowed.view().unwrap();
    assert_eq!(view.field_count(), 2);
    assert_eq!(view.get_value(1).unwrap(), Some(Value::Int64(1001)));
    assert_eq!(view.get_value(4).unwrap(), Some("eu-west".into()));
}
