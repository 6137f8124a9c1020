use core::hint::black_box;

use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::HashMap as HashbrownMap;
use prime_probe::ChainingMap;
use prime_probe::OpenAddressingMap;
use prime_probe::find_mode;
use rand::Rng;
use rand::SeedableRng;
use rand::TryRngCore;
use rand::distr::Distribution;
use rand::rngs::OsRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Zipf;

const SIZES: &[usize] = &[(1 << 8), (1 << 10), (1 << 12), (1 << 14), (1 << 16)];

fn random_keys(count: usize) -> Vec<String> {
    let mut rng = OsRng;
    (0..count)
        .map(|_| format!("key_{:016X}", rng.try_next_u64().unwrap()))
        .collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = random_keys(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("open_addressing/{}", size), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut map = OpenAddressingMap::new();
                    for (i, key) in keys.into_iter().enumerate() {
                        map.put(key, i);
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("chaining/{}", size), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut map = ChainingMap::with_capacity(size);
                    for (i, key) in keys.into_iter().enumerate() {
                        map.put(key, i);
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{}", size), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut map = HashbrownMap::new();
                    for (i, key) in keys.into_iter().enumerate() {
                        map.insert(key, i);
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_find_hit_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_hit_miss");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = random_keys(size);
        let mut probes: Vec<String> = keys.iter().step_by(2).cloned().collect();
        probes.extend(random_keys(size / 2));
        probes.shuffle(&mut SmallRng::from_os_rng());

        let open: OpenAddressingMap<usize> = keys
            .iter()
            .enumerate()
            .map(|(i, k)| (k.as_str(), i))
            .collect();
        let mut chained = ChainingMap::with_capacity(size);
        chained.extend(keys.iter().enumerate().map(|(i, k)| (k.as_str(), i)));
        let brown: HashbrownMap<String, usize> = keys
            .iter()
            .enumerate()
            .map(|(i, k)| (k.clone(), i))
            .collect();

        group.throughput(Throughput::Elements(probes.len() as u64));
        group.bench_function(format!("open_addressing/{}", size), |b| {
            b.iter(|| {
                for probe in &probes {
                    black_box(open.get(probe));
                }
            })
        });
        group.bench_function(format!("chaining/{}", size), |b| {
            b.iter(|| {
                for probe in &probes {
                    black_box(chained.get(probe));
                }
            })
        });
        group.bench_function(format!("hashbrown/{}", size), |b| {
            b.iter(|| {
                for probe in &probes {
                    black_box(brown.get(probe));
                }
            })
        });
    }

    group.finish();
}

/// Alternating inserts and removes over a fixed key space, which leaves the
/// open-addressing table full of tombstones between resizes.
fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");

    for &size in SIZES {
        let keys = random_keys(size);
        let mut rng = SmallRng::from_os_rng();
        let operations: Vec<(bool, usize)> = (0..size * 4)
            .map(|_| (rng.random_bool(0.5), rng.random_range(0..size)))
            .collect();

        group.throughput(Throughput::Elements(operations.len() as u64));
        group.bench_function(format!("open_addressing/{}", size), |b| {
            b.iter_batched(
                OpenAddressingMap::new,
                |mut map| {
                    for &(insert, k) in &operations {
                        if insert {
                            map.put(keys[k].as_str(), k);
                        } else {
                            black_box(map.remove(&keys[k]));
                        }
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("chaining/{}", size), |b| {
            b.iter_batched(
                || ChainingMap::with_capacity(size),
                |mut map| {
                    for &(insert, k) in &operations {
                        if insert {
                            map.put(keys[k].as_str(), k);
                        } else {
                            black_box(map.remove(&keys[k]));
                        }
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("hashbrown/{}", size), |b| {
            b.iter_batched(
                HashbrownMap::new,
                |mut map| {
                    for &(insert, k) in &operations {
                        if insert {
                            map.insert(keys[k].clone(), k);
                        } else {
                            black_box(map.remove(&keys[k]));
                        }
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_find_mode_zipf(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_mode_zipf");

    for &size in SIZES {
        let mut rng = SmallRng::from_os_rng();
        let distr = Zipf::new(size as f32 - 1.0, 1.0).unwrap();
        let words: Vec<String> = (0..size)
            .map(|_| format!("word{}", distr.sample(&mut rng) as usize))
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("{}", size), |b| {
            b.iter(|| black_box(find_mode(black_box(&words))))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_find_hit_miss,
    bench_churn,
    bench_find_mode_zipf,
);

criterion_main!(benches);
