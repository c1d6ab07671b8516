//! Throughput of `add_N` across the two shapes spec scenarios actually
//! exercise: a fully-matching two-channel stream (every arrival completes
//! immediately) versus a stream where a steady fraction of arrivals never
//! find their match and age out via watermark eviction instead. Mirrors the
//! complete-vs-partial-vs-dropped distinction the teacher draws between its
//! `throughput` and `slow_consumer` benches.

use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use synchro::synchronizer2;

const TOTAL: i64 = 20_000;

fn fully_matching(c: &mut Criterion) {
    c.bench_function("add_n/fully_matching", |b| {
        b.iter(|| {
            let sync = synchronizer2::<i64, i64>(
                0,
                Box::new(|m: &i64| (*m).into()),
                Box::new(|m: &i64| (*m).into()),
            );
            let _h = sync.register_callback(|_| {});
            for k in 0..TOTAL {
                sync.add_0(Arc::new(k));
                sync.add_1(Arc::new(k));
            }
        });
    });
}

fn partial_with_eviction(c: &mut Criterion) {
    c.bench_function("add_n/partial_with_eviction", |b| {
        b.iter(|| {
            let sync = synchronizer2::<i64, i64>(
                64,
                Box::new(|m: &i64| (*m).into()),
                Box::new(|m: &i64| (*m).into()),
            );
            let _out = sync.register_callback(|_| {});
            let _drop = sync.register_drop_callback(|_| {});
            for k in 0..TOTAL {
                sync.add_0(Arc::new(k));
                if k % 3 == 0 {
                    sync.add_1(Arc::new(k));
                }
            }
        });
    });
}

criterion_group!(benches, fully_matching, partial_with_eviction);
criterion_main!(benches);
