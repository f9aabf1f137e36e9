use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use std::collections::BTreeMap;
use threaded_map::ThreadedMap;

const SIZE: u64 = 1000;

/// A fixed scramble of `0..SIZE`; sorted input would degenerate the threaded tree.
fn scrambled_keys() -> Vec<u64> {
    (0..SIZE).map(|i| (i * 7919) % SIZE).collect()
}

fn bench_insert(c: &mut Criterion) {
    let keys = scrambled_keys();
    let mut group = c.benchmark_group("insert_random");
    group.throughput(Throughput::Elements(SIZE));

    group.bench_function("std", |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for &k in &keys {
                map.insert(black_box(k), black_box(k));
            }
            map
        });
    });

    group.bench_function("threaded", |b| {
        b.iter(|| {
            let mut map = ThreadedMap::new();
            for &k in &keys {
                map.insert(black_box(k), black_box(k));
            }
            map
        });
    });

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let keys = scrambled_keys();
    let mut group = c.benchmark_group("lookup");
    group.throughput(Throughput::Elements(SIZE));

    group.bench_function("std", |b| {
        let map: BTreeMap<u64, u64> = keys.iter().map(|&k| (k, k)).collect();
        b.iter(|| {
            for k in 0..SIZE {
                black_box(map.get(&k));
            }
        });
    });

    group.bench_function("threaded", |b| {
        let map: ThreadedMap<u64, u64> = keys.iter().map(|&k| (k, k)).collect();
        b.iter(|| {
            for k in 0..SIZE {
                black_box(map.get(&k));
            }
        });
    });

    group.finish();
}

fn bench_erase(c: &mut Criterion) {
    let keys = scrambled_keys();
    let mut group = c.benchmark_group("erase");
    group.throughput(Throughput::Elements(SIZE));

    group.bench_function("std", |b| {
        b.iter_batched(
            || keys.iter().map(|&k| (k, k)).collect::<BTreeMap<u64, u64>>(),
            |mut map| {
                for k in 0..SIZE {
                    black_box(map.remove(&k));
                }
                map
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("threaded", |b| {
        b.iter_batched(
            || keys.iter().map(|&k| (k, k)).collect::<ThreadedMap<u64, u64>>(),
            |mut map| {
                for k in 0..SIZE {
                    black_box(map.erase(&k));
                }
                map
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_iterate(c: &mut Criterion) {
    let keys = scrambled_keys();
    let mut group = c.benchmark_group("iterate");
    group.throughput(Throughput::Elements(SIZE));

    group.bench_function("std", |b| {
        let map: BTreeMap<u64, u64> = keys.iter().map(|&k| (k, k)).collect();
        b.iter(|| map.values().sum::<u64>());
    });

    group.bench_function("threaded", |b| {
        let map: ThreadedMap<u64, u64> = keys.iter().map(|&k| (k, k)).collect();
        b.iter(|| map.values().sum::<u64>());
    });

    group.bench_function("threaded_positions", |b| {
        let map: ThreadedMap<u64, u64> = keys.iter().map(|&k| (k, k)).collect();
        b.iter(|| {
            let mut total = 0u64;
            let mut pos = map.begin();
            while let Some((_, v)) = map.get_at(pos) {
                total += v;
                pos = map.next(pos);
            }
            total
        });
    });

    group.finish();
}

criterion_group!(benches, bench_insert, bench_lookup, bench_erase, bench_iterate);
criterion_main!(benches);
