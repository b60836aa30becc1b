//! Record format benchmarks
//!
//! These benchmarks measure serialization, field access, and the byte-level
//! operators (project/merge) across record widths, since those operators are
//! what the format optimizes for.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use imprint::{MergeOptions, ProjectOptions, RecordBuf, RecordBuilder, RecordView, SchemaId};

fn mock_record(fieldspace_id: u32, first_id: u32, fields: u32) -> RecordBuf {
    let mut builder = RecordBuilder::new(SchemaId::new(fieldspace_id, 0));
    for i in 0..fields {
        let field_id = first_id + i;
        // Key the value shape off the field id so records from the same
        // fieldspace agree on types wherever their ids overlap.
        match field_id % 4 {
            0 => builder.set(field_id, field_id as i64).unwrap(),
            1 => builder.set(field_id, "abcdefghij").unwrap(),
            2 => builder.set(field_id, 0.5f64 * field_id as f64).unwrap(),
            _ => builder
                .set(field_id, vec![0u8; 16 + (field_id as usize % 48)])
                .unwrap(),
        }
    }
    builder.finalize().unwrap()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &fields in &[4u32, 16, 64] {
        group.bench_function(BenchmarkId::from_parameter(fields), |b| {
            b.iter(|| black_box(mock_record(1, 1, black_box(fields))));
        });
    }
    group.finish();
}

fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("read");
    for &fields in &[4u32, 16, 64] {
        let record = mock_record(1, 1, fields);

        group.bench_function(BenchmarkId::new("parse", fields), |b| {
            b.iter(|| black_box(RecordView::new(record.as_bytes()).unwrap()));
        });

        let view = record.view().unwrap();
        let middle = fields / 2 + 1;
        group.bench_function(BenchmarkId::new("get_value", fields), |b| {
            b.iter(|| black_box(view.get_value(black_box(middle)).unwrap()));
        });
        group.bench_function(BenchmarkId::new("get_raw", fields), |b| {
            b.iter(|| black_box(view.get_raw(black_box(middle)).unwrap()));
        });
    }
    group.finish();
}

fn bench_project(c: &mut Criterion) {
    let mut group = c.benchmark_group("project");
    for &fields in &[4u32, 16, 64] {
        let record = mock_record(1, 1, fields);
        let view = record.view().unwrap();
        let wanted: Vec<u32> = (1..=fields).step_by(2).collect();

        group.bench_function(BenchmarkId::from_parameter(fields), |b| {
            b.iter(|| {
                black_box(
                    view.project(black_box(&wanted), ProjectOptions::default())
                        .unwrap(),
                )
            });
        });
    }
    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    for &fields in &[4u32, 16, 64] {
        let left = mock_record(1, 1, fields);
        let right = mock_record(1, fields + 1, fields);
        let left_view = left.view().unwrap();
        let right_view = right.view().unwrap();

        group.bench_function(BenchmarkId::new("disjoint", fields), |b| {
            b.iter(|| black_box(left_view.merge(&right_view, MergeOptions::default()).unwrap()));
        });

        let overlapping = mock_record(1, fields / 2 + 1, fields);
        let overlapping_view = overlapping.view().unwrap();
        group.bench_function(BenchmarkId::new("overlapping", fields), |b| {
            b.iter(|| {
                black_box(
                    left_view
                        .merge(&overlapping_view, MergeOptions::default())
                        .unwrap(),
                )
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_read, bench_project, bench_merge);
criterion_main!(benches);
