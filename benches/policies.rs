use std::hint::black_box;
use std::time::{Duration, Instant};

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use evictkit::builder::{CacheBuilder, CachePolicy};
use evictkit::policy::arc::ArcCore;
use evictkit::policy::lfu::LfuCore;
use evictkit::policy::lru::LruCore;
use evictkit::policy::simple::SimpleStore;
use evictkit::traits::{CacheCore, ConcurrentCache};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const CAPACITY: usize = 1024;
const OPS: usize = 4096;

/// Skewed key stream: 80% of requests go to the first 20% of the key space.
fn hotset_keys(seed: u64, universe: u64) -> Vec<u64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let hot = universe / 5;
    (0..OPS)
        .map(|_| {
            if rng.gen_bool(0.8) {
                rng.gen_range(0..hot)
            } else {
                rng.gen_range(hot..universe)
            }
        })
        .collect()
}

fn run_mixed<C: CacheCore<u64, u64>>(cache: &mut C, keys: &[u64], now: Instant) {
    for &key in keys {
        if cache.get(&key, now).is_none() {
            cache.set(black_box(key), key, Duration::ZERO, now);
        }
    }
}

fn bench_core_mixed(c: &mut Criterion) {
    let keys = hotset_keys(7, 8 * CAPACITY as u64);
    let now = Instant::now();
    let mut group = c.benchmark_group("core_get_or_set");

    group.bench_function(BenchmarkId::from_parameter("simple"), |b| {
        b.iter_batched(
            SimpleStore::<u64, u64>::new,
            |mut cache| run_mixed(&mut cache, &keys, now),
            BatchSize::SmallInput,
        )
    });
    group.bench_function(BenchmarkId::from_parameter("lru"), |b| {
        b.iter_batched(
            || LruCore::<u64, u64>::new(CAPACITY),
            |mut cache| run_mixed(&mut cache, &keys, now),
            BatchSize::SmallInput,
        )
    });
    group.bench_function(BenchmarkId::from_parameter("lfu"), |b| {
        b.iter_batched(
            || LfuCore::<u64, u64>::new(CAPACITY),
            |mut cache| run_mixed(&mut cache, &keys, now),
            BatchSize::SmallInput,
        )
    });
    group.bench_function(BenchmarkId::from_parameter("arc"), |b| {
        b.iter_batched(
            || ArcCore::<u64, u64>::new(CAPACITY),
            |mut cache| run_mixed(&mut cache, &keys, now),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_eviction_churn(c: &mut Criterion) {
    let now = Instant::now();
    let mut group = c.benchmark_group("eviction_churn");

    fn churn<C: CacheCore<u64, u64>>(mut cache: C, now: Instant) {
        for i in 0..OPS as u64 {
            cache.set(black_box(10_000 + i), i, Duration::ZERO, now);
        }
    }

    group.bench_function("lru", |b| {
        b.iter_batched(
            || LruCore::<u64, u64>::new(CAPACITY),
            |cache| churn(cache, now),
            BatchSize::SmallInput,
        )
    });
    group.bench_function("lfu", |b| {
        b.iter_batched(
            || LfuCore::<u64, u64>::new(CAPACITY),
            |cache| churn(cache, now),
            BatchSize::SmallInput,
        )
    });
    group.bench_function("arc", |b| {
        b.iter_batched(
            || ArcCore::<u64, u64>::new(CAPACITY),
            |cache| churn(cache, now),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_synchronized_hit_rate(c: &mut Criterion) {
    let keys = hotset_keys(11, 8 * CAPACITY as u64);
    let mut group = c.benchmark_group("synchronized_get_or_set");

    for policy in [CachePolicy::Lru, CachePolicy::Lfu, CachePolicy::Arc] {
        group.bench_with_input(BenchmarkId::from_parameter(policy), &policy, |b, &policy| {
            b.iter_batched(
                || CacheBuilder::new(CAPACITY).build::<u64, u64>(policy).unwrap(),
                |cache| {
                    for &key in &keys {
                        if cache.get(&key).is_none() {
                            cache.set(key, key, Duration::ZERO);
                        }
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_core_mixed,
    bench_eviction_churn,
    bench_synchronized_hit_rate
);
criterion_main!(benches);
