//! OHLCV aggregation benchmarks.
//!
//! Run with: `cargo bench --package tickfill-bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use tickfill_bench::synthetic_day;
use tickfill_lib::{Interval, aggregate};

fn aggregate_benchmark(c: &mut Criterion) {
    let day = synthetic_day("BTC", 250);

    let mut group = c.benchmark_group("aggregate");
    group.throughput(Throughput::Elements(day.len() as u64));

    for interval in [Interval::SECOND, Interval::MINUTE, Interval::HOUR] {
        group.bench_with_input(BenchmarkId::from_parameter(interval), &interval, |b, &interval| {
            b.iter(|| aggregate(black_box(&day), interval));
        });
    }

    group.finish();
}

criterion_group!(benches, aggregate_benchmark);
criterion_main!(benches);
