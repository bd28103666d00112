//! Performance benchmarks for index construction and decomposition
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ransom::{CorpusIndex, FragmentDecomposer, SourceRecord};
use tempfile::TempDir;

const WORDS: &[&str] = &[
    "ratchet", "bomb", "please", "wait", "counter", "charge", "creature", "target",
    "player", "sacrifice", "destroy", "artifact", "enchantment", "library", "graveyard",
];

/// Synthetic card-like corpus with `count` records
fn corpus(count: usize) -> Vec<SourceRecord> {
    (0..count)
        .map(|i| {
            let name = format!("{} {}", WORDS[i % WORDS.len()], WORDS[(i * 7) % WORDS.len()]);
            let text: Vec<&str> = (0..12).map(|j| WORDS[(i * 3 + j * 5) % WORDS.len()]).collect();
            SourceRecord::new()
                .with_field("name", name)
                .with_field("oracle_text", text.join(" "))
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    group.sample_size(10);

    for count in [1_000, 10_000] {
        let records = corpus(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &records, |b, records| {
            b.iter(|| CorpusIndex::build(black_box(records), &["name", "oracle_text"]))
        });
    }
    group.finish();
}

fn bench_decompose(c: &mut Criterion) {
    let index = CorpusIndex::build(&corpus(5_000), &["name", "oracle_text"]).unwrap();
    let decomposer = FragmentDecomposer::new(&index, 20).unwrap();

    let targets = [
        "wait",
        "pls chet",
        "the quick brown fox",
        "a ransom note assembled from clippings",
    ];

    let mut group = c.benchmark_group("decompose");
    for target in targets {
        group.bench_with_input(BenchmarkId::from_parameter(target), &target, |b, &t| {
            b.iter(|| decomposer.decompose(black_box(t)))
        });
    }
    group.finish();
}

fn bench_index_loading(c: &mut Criterion) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("index.bin");
    let index = CorpusIndex::build(&corpus(5_000), &["name", "oracle_text"]).unwrap();
    index.save(&path).expect("Failed to save index");

    c.bench_function("open_index", |b| {
        b.iter(|| CorpusIndex::open(black_box(&path), &["name", "oracle_text"]))
    });
}

criterion_group!(benches, bench_build, bench_decompose, bench_index_loading);
criterion_main!(benches);
