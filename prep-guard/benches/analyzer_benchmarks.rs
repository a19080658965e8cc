//! Benchmarks for type inference, sensitive column scanning and MECE checks.

use std::sync::Arc;
use std::time::Duration;

use arrow::array::{ArrayRef, Date32Array, Float64Array, Int64Array, StringArray};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use prep_guard::analyzers::{check_mece, SensitiveColumnScanner, TypeInferenceEngine};
use prep_guard::dataset::Dataset;

fn wide_dataset(rows: usize) -> Dataset {
    let ids: Vec<i64> = (0..rows as i64).map(|i| i / 2).collect();
    let flags: Vec<i64> = (0..rows as i64).map(|i| i % 2).collect();
    let scores: Vec<f64> = (0..rows).map(|i| i as f64 * 0.37).collect();
    let dates: Vec<i32> = (0..rows as i32).map(|i| 19_000 + i % 365).collect();
    let courses: Vec<String> = (0..rows).map(|i| format!("course_{}", i % 12)).collect();
    let notes: Vec<String> = (0..rows)
        .map(|i| format!("free text note number {i} with enough words to exceed the limit"))
        .collect();
    let labels: Vec<&str> = (0..rows).map(|i| ["A", "B", "C"][i % 3]).collect();

    Dataset::try_from_columns(vec![
        ("record_id", Arc::new(Int64Array::from(ids)) as ArrayRef),
        ("flag", Arc::new(Int64Array::from(flags)) as ArrayRef),
        ("score", Arc::new(Float64Array::from(scores)) as ArrayRef),
        ("enrolled_on", Arc::new(Date32Array::from(dates)) as ArrayRef),
        ("course", Arc::new(StringArray::from(courses)) as ArrayRef),
        ("note", Arc::new(StringArray::from(notes)) as ArrayRef),
        ("label", Arc::new(StringArray::from(labels)) as ArrayRef),
    ])
    .unwrap()
}

fn bench_type_inference(c: &mut Criterion) {
    let mut group = c.benchmark_group("type_inference");
    group.measurement_time(Duration::from_secs(8));

    for rows in [1_000, 10_000, 100_000] {
        let dataset = wide_dataset(rows);
        let engine = TypeInferenceEngine::new();
        group.bench_with_input(BenchmarkId::new("rows", rows), &dataset, |b, dataset| {
            b.iter(|| engine.infer_types(std::hint::black_box(dataset), Some("label")));
        });
    }

    group.finish();
}

fn bench_sensitive_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("sensitive_scan");
    let keywords = ["gender", "age", "ethnicity", "religion", "nationality"];

    for columns in [10, 100, 1_000] {
        let names: Vec<String> = (0..columns)
            .map(|i| format!("feature_{i}_{}", keywords[i % keywords.len()]))
            .collect();
        let scanner = SensitiveColumnScanner::new();
        group.bench_with_input(BenchmarkId::new("columns", columns), &names, |b, names| {
            b.iter(|| scanner.scan(std::hint::black_box(names), &keywords));
        });
    }

    group.finish();
}

fn bench_mece_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("mece_check");

    for rows in [1_000, 100_000] {
        let dataset = wide_dataset(rows).set_index("record_id").unwrap();
        group.bench_with_input(BenchmarkId::new("rows", rows), &dataset, |b, dataset| {
            b.iter(|| check_mece(std::hint::black_box(dataset), "label"));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_type_inference,
    bench_sensitive_scan,
    bench_mece_check
);
criterion_main!(benches);
