//! Fuzz testing for record construction.
//!
//! Builds records from arbitrary field sets and reads every field back,
//! checking the canonical-roundtrip property: whatever the builder accepts
//! must parse and decode to the same values.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use imprint::{RecordBuilder, SchemaId, Value};

#[derive(Debug, Arbitrary)]
struct BuilderInput {
    fieldspace_id: u32,
    schema_hash: u32,
    fields: Vec<(u32, FuzzValue)>,
}

#[derive(Debug, Arbitrary)]
enum FuzzValue {
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Bytes(Vec<u8>),
    Text(String),
    Int32Array(Vec<i32>),
    TextMap(Vec<(String, String)>),
}

impl FuzzValue {
    fn has_nan(&self) -> bool {
        match self {
            FuzzValue::Float32(v) => v.is_nan(),
            FuzzValue::Float64(v) => v.is_nan(),
            _ => false,
        }
    }

    fn to_value(&self) -> Value<'_> {
        match self {
            FuzzValue::Null => Value::Null,
            FuzzValue::Bool(v) => Value::Bool(*v),
            FuzzValue::Int32(v) => Value::Int32(*v),
            FuzzValue::Int64(v) => Value::Int64(*v),
            FuzzValue::Float32(v) => Value::Float32(*v),
            FuzzValue::Float64(v) => Value::Float64(*v),
            FuzzValue::Bytes(v) => Value::Bytes(v.as_slice().into()),
            FuzzValue::Text(v) => Value::String(v.as_str().into()),
            FuzzValue::Int32Array(v) => {
                Value::Array(v.iter().map(|&element| Value::Int32(element)).collect())
            }
            FuzzValue::TextMap(v) => Value::Map(
                v.iter()
                    .map(|(key, value)| (key.as_str().into(), Value::String(value.as_str().into())))
                    .collect(),
            ),
        }
    }
}

fuzz_target!(|input: BuilderInput| {
    let mut builder = RecordBuilder::new(SchemaId::new(input.fieldspace_id, input.schema_hash));
    for (field_id, value) in &input.fields {
        builder.set(*field_id, value.to_value()).unwrap();
    }

    let record = builder.finalize().unwrap();
    let view = record.view().unwrap();

    // Last write wins: walk backwards and check the first sighting of each
    // id. NaN payloads roundtrip bytewise but defeat value equality.
    let mut seen = std::collections::HashSet::new();
    for (field_id, value) in input.fields.iter().rev() {
        if !seen.insert(*field_id) || value.has_nan() {
            continue;
        }
        let decoded = view.get_value(*field_id).unwrap().unwrap();
        assert_eq!(decoded, value.to_value());
    }
});
