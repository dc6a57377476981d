//! Criterion benchmarks for fanlog

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use fanlog::prelude::*;
use fanlog::BulkQueue;

// ============================================================================
// Staging queue benchmarks
// ============================================================================

fn bench_bulk_queue(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk_queue");
    group.throughput(Throughput::Elements(1));

    let queue = BulkQueue::new();
    group.bench_function("push", |b| {
        b.iter(|| {
            queue.push(black_box(42u64));
        });
    });

    let mut scratch = Vec::new();
    group.bench_function("swap_drain", |b| {
        b.iter(|| {
            queue.push(black_box(42u64));
            if queue.try_swap(&mut scratch) {
                scratch.clear();
            }
        });
    });

    group.finish();
}

// ============================================================================
// End-to-end pipeline benchmarks
// ============================================================================

fn bench_log_to_null_sink(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Elements(1));

    let manager = Manager::new(2).unwrap();
    let sink = manager
        .new_sink("null", Box::new(NullModule::new()))
        .unwrap();
    let logger = manager.new_logger("bench").unwrap();
    logger.add_sink(sink).unwrap();

    group.bench_function("log_enqueue", |b| {
        b.iter(|| {
            logger.info(black_box("benchmark message")).unwrap();
        });
    });
    manager.wait_until_idle();

    group.bench_function("log_and_drain_1000", |b| {
        b.iter(|| {
            for i in 0..1000 {
                logger.info(black_box(format!("message {i}"))).unwrap();
            }
            manager.wait_until_idle();
        });
    });

    group.finish();
}

fn bench_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_out");
    group.throughput(Throughput::Elements(1));

    let manager = Manager::new(2).unwrap();
    let logger = manager.new_logger("bench").unwrap();
    for index in 0..4 {
        let sink = manager
            .new_sink(&format!("null-{index}"), Box::new(NullModule::new()))
            .unwrap();
        logger.add_sink(sink).unwrap();
    }

    group.bench_function("four_sinks", |b| {
        b.iter(|| {
            logger.info(black_box("fanned out")).unwrap();
        });
    });
    manager.wait_until_idle();

    group.finish();
}

criterion_group!(benches, bench_bulk_queue, bench_log_to_null_sink, bench_fan_out);
criterion_main!(benches);
