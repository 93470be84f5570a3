//! Criterion micro-benchmarks for the step scheduler and raw engines.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use aureole_bench::reference_store;
use aureole_engine::{StepScheduler, DEFAULT_BATCH_SIZE};
use aureole_sort::{SortKind, Step};

fn bench_notify(c: &mut Criterion) {
    c.bench_function("scheduler_notify_10k", |b| {
        b.iter(|| {
            let mut scheduler = StepScheduler::new(DEFAULT_BATCH_SIZE);
            for _ in 0..10_000 {
                black_box(scheduler.notify());
            }
            black_box(scheduler.end());
        });
    });
}

fn bench_engine_steps(c: &mut Criterion) {
    for kind in SortKind::ALL {
        c.bench_function(&format!("{}_engine_512", kind.name()), |b| {
            b.iter_batched(
                || (reference_store(512, 7), kind.engine()),
                |(mut store, mut engine)| {
                    while let Step::Access(access) = engine.step(&mut store) {
                        black_box(access);
                    }
                },
                BatchSize::SmallInput,
            );
        });
    }
}

criterion_group!(benches, bench_notify, bench_engine_steps);
criterion_main!(benches);
