use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use hashtables::{
    ChainingTableBuilder, HashFunction, OpenAddressingTableBuilder, ProbingMethod,
};
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SIZES: [usize; 3] = [100, 1_000, 10_000];
const KEY_LENGTH: usize = 10;

/// Random `(key, value)` pairs: alphanumeric keys of `key_length` characters, values `value_{i}`.
fn generate_test_data(num_items: usize, key_length: usize, seed: u64) -> Vec<(String, String)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..num_items)
        .map(|i| {
            let key: String = (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(key_length)
                .map(char::from)
                .collect();
            (key, format!("value_{i}"))
        })
        .collect()
}

/// Keys sharing a long common prefix, which stresses the weaker hash functions.
fn generate_collision_data(base_key: &str, num_variants: usize) -> Vec<(String, String)> {
    (0..num_variants)
        .map(|i| (format!("{base_key}{i}"), format!("value_{i}")))
        .collect()
}

fn bench_chaining_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("chaining_insert");
    for &n in &SIZES {
        let data = generate_test_data(n, KEY_LENGTH, 42);
        group.throughput(Throughput::Elements(n as u64));
        for function in HashFunction::ALL {
            group.bench_with_input(BenchmarkId::new(function.name(), n), &data, |b, data| {
                b.iter_batched(
                    || data.clone(),
                    |data| {
                        let mut table = ChainingTableBuilder::new()
                            .with_size(n * 2)
                            .with_hash_function(function)
                            .build::<String, String>()
                            .unwrap();
                        for (k, v) in data {
                            table.insert(k, v);
                        }
                        black_box(table)
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }
    group.finish();
}

fn bench_open_addressing_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("open_addressing_insert");
    for &n in &SIZES {
        let data = generate_test_data(n, KEY_LENGTH, 42);
        group.throughput(Throughput::Elements(n as u64));
        for probing in ProbingMethod::ALL {
            for function in HashFunction::ALL {
                let id = BenchmarkId::new(format!("{probing}/{function}"), n);
                group.bench_with_input(id, &data, |b, data| {
                    b.iter_batched(
                        || data.clone(),
                        |data| {
                            let mut table = OpenAddressingTableBuilder::new()
                                .with_size(n * 2)
                                .with_hash_function(function)
                                .with_probing_method(probing)
                                .build::<String, String>()
                                .unwrap();
                            for (k, v) in data {
                                table.insert(k, v);
                            }
                            black_box(table)
                        },
                        BatchSize::SmallInput,
                    )
                });
            }
        }
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_hit");
    let n = 10_000;
    let data = generate_test_data(n, KEY_LENGTH, 7);
    group.throughput(Throughput::Elements(n as u64));

    for function in HashFunction::ALL {
        let mut chained = ChainingTableBuilder::new()
            .with_size(n * 2)
            .with_hash_function(function)
            .build::<String, String>()
            .unwrap();
        for (k, v) in &data {
            chained.insert(k.clone(), v.clone());
        }
        group.bench_function(BenchmarkId::new("chaining", function), |b| {
            b.iter(|| {
                for (k, _) in &data {
                    black_box(chained.search(k.as_str()));
                }
            })
        });

        for probing in ProbingMethod::ALL {
            let mut open = OpenAddressingTableBuilder::new()
                .with_size(n * 2)
                .with_hash_function(function)
                .with_probing_method(probing)
                .build::<String, String>()
                .unwrap();
            for (k, v) in &data {
                open.insert(k.clone(), v.clone());
            }
            let id = BenchmarkId::new(format!("open_addressing/{probing}"), function);
            group.bench_function(id, |b| {
                b.iter(|| {
                    for (k, _) in &data {
                        black_box(open.search(k.as_str()));
                    }
                })
            });
        }
    }
    group.finish();
}

fn bench_collision_heavy(c: &mut Criterion) {
    let mut group = c.benchmark_group("collision_heavy_insert");
    let data = generate_collision_data("user_", 1_000);
    for function in HashFunction::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(function), &data, |b, data| {
            b.iter_batched(
                || data.clone(),
                |data| {
                    let mut table = ChainingTableBuilder::new()
                        .with_hash_function(function)
                        .build::<String, String>()
                        .unwrap();
                    for (k, v) in data {
                        table.insert(k, v);
                    }
                    black_box(table.collision_stats())
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_chaining_insert,
    bench_open_addressing_insert,
    bench_search,
    bench_collision_heavy
);
criterion_main!(benches);
