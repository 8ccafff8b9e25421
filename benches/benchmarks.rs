// benches/benchmarks.rs — Performance benchmarks (criterion)
//
// Both hot paths run on every request before any backend call:
//   1. Repetition transforms — pure string rewriting per mode
//   2. Rate limiting — one locked upsert per request, plus the sweep

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tokio::time::Instant;

use promptrepeat::core::anchor::anchor;
use promptrepeat::core::repetition::transform;
use promptrepeat::core::types::{RepetitionMode, TaskType};
use promptrepeat::security::rate_limit::RateLimiter;

// ─── Helpers ────────────────────────────────────────────────────────────────

fn prompt_of(chars: usize) -> String {
    "Extract every invoice number and due date from the text below. "
        .chars()
        .cycle()
        .take(chars)
        .collect()
}

fn marked_prompt(markers: usize) -> String {
    let mut prompt = String::from("Review the contract. ");
    for i in 0..markers {
        prompt.push_str(&format!("Then [[check clause {i} for liability]]. "));
    }
    prompt
}

// ─── Benchmarks ─────────────────────────────────────────────────────────────

fn bench_transforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");
    let short = prompt_of(200);
    let long = prompt_of(8_000);
    let marked = marked_prompt(20);
    let segments: Vec<String> = (0..10).map(|i| format!("constraint {i}")).collect();

    group.bench_function("x2_short", |b| {
        b.iter(|| transform(black_box(&short), RepetitionMode::X2, &[], TaskType::Unknown))
    });
    group.bench_function("x3_long", |b| {
        b.iter(|| transform(black_box(&long), RepetitionMode::X3, &[], TaskType::Unknown))
    });
    group.bench_function("selective_20_markers", |b| {
        b.iter(|| {
            transform(
                black_box(&marked),
                RepetitionMode::Selective,
                &[],
                TaskType::Unknown,
            )
        })
    });
    group.bench_function("selective_10_segments", |b| {
        b.iter(|| {
            transform(
                black_box(&long),
                RepetitionMode::Selective,
                &segments,
                TaskType::Unknown,
            )
        })
    });
    group.bench_function("adaptive_extraction_long", |b| {
        b.iter(|| {
            transform(
                black_box(&long),
                RepetitionMode::Adaptive,
                &[],
                TaskType::Extraction,
            )
        })
    });
    group.bench_function("anchor_then_x2", |b| {
        b.iter(|| {
            transform(
                &anchor(black_box(&short)),
                RepetitionMode::X2,
                &[],
                TaskType::Unknown,
            )
        })
    });
    group.finish();
}

fn bench_rate_limit(c: &mut Criterion) {
    let mut group = c.benchmark_group("rate_limit");

    group.bench_function("check_single_key", |b| {
        let limiter = RateLimiter::new();
        let now = Instant::now();
        b.iter(|| limiter.check_at(black_box("optimize:203.0.113.1"), 20, 60, now))
    });

    group.bench_function("check_10k_keys", |b| {
        let limiter = RateLimiter::new();
        let now = Instant::now();
        let keys: Vec<String> = (0..10_000).map(|i| format!("optimize:10.0.{}.{}", i / 256, i % 256)).collect();
        let mut i = 0;
        b.iter(|| {
            i = (i + 1) % keys.len();
            limiter.check_at(black_box(&keys[i]), 20, 60, now)
        })
    });

    group.bench_function("sweep_10k_expired", |b| {
        let start = Instant::now();
        b.iter_batched(
            || {
                let limiter = RateLimiter::new();
                for i in 0..10_000 {
                    limiter.check_at(&format!("k{i}"), 20, 1, start);
                }
                limiter
            },
            |limiter| limiter.sweep_at(start + Duration::from_secs(2)),
            criterion::BatchSize::LargeInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_transforms, bench_rate_limit);
criterion_main!(benches);
