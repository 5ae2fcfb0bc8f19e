//! Criterion benchmarks for synmerge.
//!
//! Covers the three linkage stages on a synthetic table:
//! - Synonym index construction
//! - Cluster resolution
//! - Record merging

use std::hint::black_box;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use synmerge::linkage::index::SynonymIndexBuilder;
use synmerge::linkage::merger::RecordMerger;
use synmerge::linkage::resolver::ClusterResolver;
use synmerge::progress::NoProgress;
use synmerge::table::Table;

/// Generate a table where every `link_every`-th row shares a synonym with
/// its predecessor, producing chains of linked rows.
fn generate_test_table(rows: usize, link_every: usize) -> Table {
    let data: Vec<Vec<String>> = (0..rows)
        .map(|i| {
            let shared = if i % link_every == 0 {
                format!("compound_{i}")
            } else {
                format!("compound_{}", i - 1)
            };
            vec![
                format!("HMDB{i:07}"),
                shared,
                format!("synonym_a_{i}"),
                format!("synonym_b_{}", i % 97),
            ]
        })
        .collect();

    Table::from_strings(data).unwrap()
}

/// Benchmark the individual linkage stages.
fn bench_linkage(c: &mut Criterion) {
    let mut group = c.benchmark_group("linkage");
    let table = generate_test_table(10_000, 3);

    group.throughput(Throughput::Elements(table.len() as u64));
    group.bench_function("build_synonym_index", |b| {
        let builder = SynonymIndexBuilder::new(3);
        b.iter(|| black_box(builder.build(black_box(&table), &mut NoProgress)))
    });

    let index = SynonymIndexBuilder::new(3).build(&table, &mut NoProgress);
    group.bench_function("resolve_clusters", |b| {
        let resolver = ClusterResolver::new();
        b.iter(|| black_box(resolver.resolve(black_box(&index), &mut NoProgress)))
    });

    let clusters = ClusterResolver::new().resolve(&index, &mut NoProgress);
    group.bench_function("merge_records", |b| {
        let merger = RecordMerger::new(3);
        b.iter(|| black_box(merger.merge(black_box(&table), &clusters, &mut NoProgress)))
    });

    group.finish();
}

/// Benchmark end-to-end linkage as the table grows.
fn bench_scalability(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalability");
    group.sample_size(20);

    for rows in [1_000, 10_000, 50_000] {
        let table = generate_test_table(rows, 4);
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_function(format!("full_linkage_{rows}"), |b| {
            b.iter(|| {
                let index = SynonymIndexBuilder::new(3).build(&table, &mut NoProgress);
                let clusters = ClusterResolver::new().resolve(&index, &mut NoProgress);
                let records = RecordMerger::new(3).merge(&table, &clusters, &mut NoProgress);
                black_box(records)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_linkage, bench_scalability);

criterion_main!(benches);
