//! Performance benchmarks for timeframe expression resolution.
//!
//! Run with: `cargo bench --bench resolve_perf`

use chrono::{NaiveDate, NaiveDateTime};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use timeframe::{DateDialect, EnglishDateParser, Resolver};

fn reference() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 11)
        .and_then(|d| d.and_hms_opt(9, 30, 0))
        .expect("valid reference instant")
}

// ============================================================================
// Rule Benchmarks
// ============================================================================

fn bench_quarter_rule(c: &mut Criterion) {
    let resolver = Resolver::new();
    let reference = reference();
    let mut group = c.benchmark_group("resolve_quarter");

    for input in ["q1 2024", "third quarter of 2024", "4th quarter in 1999"] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(input), input, |b, input| {
            b.iter(|| black_box(resolver.resolve_at(black_box(input), reference)));
        });
    }

    group.finish();
}

fn bench_keyword_rules(c: &mut Criterion) {
    let resolver = Resolver::new();
    let reference = reference();
    let mut group = c.benchmark_group("resolve_keyword");

    for input in ["yesterday", "today", "last week", "this week", "last month", "this month"] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(input), input, |b, input| {
            b.iter(|| black_box(resolver.resolve_at(black_box(input), reference)));
        });
    }

    group.finish();
}

fn bench_fallback(c: &mut Criterion) {
    let reference = reference();
    let mut group = c.benchmark_group("resolve_fallback");

    for dialect in [DateDialect::Us, DateDialect::Uk] {
        let resolver = Resolver::with_fallback(EnglishDateParser::new(dialect));
        group.bench_function(format!("absolute_{dialect}"), |b| {
            b.iter(|| black_box(resolver.resolve_at(black_box("10 July 2025"), reference)));
        });
    }

    let resolver = Resolver::new();
    group.bench_function("unparseable", |b| {
        b.iter(|| black_box(resolver.resolve_at(black_box("not a real date at all"), reference)));
    });

    group.finish();
}

// ============================================================================
// Criterion Groups
// ============================================================================

criterion_group!(
    name = rule_benches;
    config = Criterion::default().significance_level(0.05).noise_threshold(0.02);
    targets =
        bench_quarter_rule,
        bench_keyword_rules
);

criterion_group!(
    name = fallback_benches;
    config = Criterion::default().significance_level(0.05);
    targets = bench_fallback
);

criterion_main!(rule_benches, fallback_benches);
