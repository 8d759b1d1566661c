//! Transliteration Benchmarks
//!
//! Throughput of the built-in engine across the three conversion paths:
//! Brahmic to Brahmic, Brahmic to Roman and Roman to Brahmic.
//!
//! Run with: `cargo bench --bench transliteration`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use bharat_server::translit::{BrahmicTransliterator, Transliterator};

const DEVANAGARI_LINE: &str = "नमस्ते, भारत। धन्यवाद प्रेम ज्ञान शांति संस्कृतम् ";
const IAST_LINE: &str = "namaste, bhārata| dhanyavāda prema jñāna śāṃti saṃskṛtam ";

fn repeated(line: &str, times: usize) -> String {
    line.repeat(times)
}

fn bench_paths(c: &mut Criterion) {
    let engine = BrahmicTransliterator::new();
    let mut group = c.benchmark_group("transliterate");

    for lines in [1usize, 16, 256] {
        let devanagari = repeated(DEVANAGARI_LINE, lines);
        let iast = repeated(IAST_LINE, lines);
        group.throughput(Throughput::Bytes(devanagari.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("devanagari_to_tamil", lines),
            &devanagari,
            |b, text| b.iter(|| engine.transliterate(black_box(text), "Devanagari", "Tamil")),
        );
        group.bench_with_input(
            BenchmarkId::new("devanagari_to_iast", lines),
            &devanagari,
            |b, text| b.iter(|| engine.transliterate(black_box(text), "Devanagari", "IAST")),
        );
        group.bench_with_input(
            BenchmarkId::new("iast_to_devanagari", lines),
            &iast,
            |b, text| b.iter(|| engine.transliterate(black_box(text), "IAST", "Devanagari")),
        );
    }

    group.finish();
}

fn bench_engine_construction(c: &mut Criterion) {
    c.bench_function("engine_new", |b| b.iter(BrahmicTransliterator::new));
}

criterion_group!(benches, bench_paths, bench_engine_construction);
criterion_main!(benches);
