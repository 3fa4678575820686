//! Diff resolver benchmark: classify targets as they grow.
//!
//! Target: classification stays linear in the shared prefix, well under
//! a frame budget for multi-kilobyte responses.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use inkflow::classify;
use inkflow::text::diff::common_prefix_len;

/// Build a resume-like paragraph of roughly `len` bytes.
fn create_text(len: usize, seed: u8) -> String {
    let words = ["shipped", "latency", "pipeline", "Rust", "team", "résumé", "owned", "p99"];
    let mut text = String::with_capacity(len + 16);
    let mut i = usize::from(seed);
    while text.len() < len {
        text.push_str(words[i % words.len()]);
        text.push(' ');
        i += 1;
    }
    text
}

fn classify_append(c: &mut Criterion) {
    let prev = create_text(4096, 0);
    let next = format!("{prev}and then some more tokens");

    c.bench_function("classify_4k_append", |b| {
        b.iter(|| classify(black_box(&prev), black_box(&next)));
    });
}

fn classify_identical(c: &mut Criterion) {
    let prev = create_text(4096, 0);
    let next = prev.clone();

    c.bench_function("classify_4k_identical", |b| {
        b.iter(|| classify(black_box(&prev), black_box(&next)));
    });
}

fn classify_divergent_tail(c: &mut Criterion) {
    let prev = create_text(4096, 0);
    let mut next = prev[..prev.len() / 2].to_string();
    next.push_str(&create_text(2048, 3));

    c.bench_function("classify_4k_divergent_tail", |b| {
        b.iter(|| classify(black_box(&prev), black_box(&next)));
    });
}

fn prefix_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("common_prefix_by_size");

    for len in [256, 1024, 4096, 16384] {
        let a = create_text(len, 0);
        let mut b = a.clone();
        b.push('!');

        group.bench_with_input(BenchmarkId::new("shared", len), &(a, b), |bench, (a, b)| {
            bench.iter(|| common_prefix_len(black_box(a), black_box(b)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    classify_append,
    classify_identical,
    classify_divergent_tail,
    prefix_by_size,
);
criterion_main!(benches);
