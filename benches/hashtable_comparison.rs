use core::hash::BuildHasher;
use core::hint::black_box;

use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::HashMap as HashbrownHashMap;
use rand::Rng;
use rand::SeedableRng;
use rand::TryRngCore;
use rand::rngs::OsRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Zipf;
use robin_hash::HashTable as RobinHashTable;
use siphasher::sip::SipHasher;

#[derive(Clone, Copy, Default)]
struct SipBuildHasher;

impl BuildHasher for SipBuildHasher {
    type Hasher = SipHasher;

    fn build_hasher(&self) -> SipHasher {
        SipHasher::new()
    }
}

type Hashbrown<const V: usize> = HashbrownHashMap<Box<[u8]>, [u8; V], SipBuildHasher>;

fn make_key(key: u64) -> Box<[u8]> {
    black_box(format!("key_{:016X}", key).into_bytes().into_boxed_slice())
}

fn make_value<const V: usize>(key: u64) -> [u8; V] {
    let mut value = [0u8; V];
    for (i, byte) in value.iter_mut().enumerate() {
        *byte = ((key >> ((i % 8) * 8)) & 0xFF) as u8;
    }
    value
}

fn robin_table<const V: usize>(capacity: usize) -> RobinHashTable<SipBuildHasher> {
    RobinHashTable::with_capacity_and_hasher(V, capacity, SipBuildHasher)
}

fn random_keys(count: usize) -> Vec<(Box<[u8]>, u64)> {
    let mut rng = OsRng;
    (0..count)
        .map(|_| {
            let raw = rng.try_next_u64().unwrap();
            (make_key(raw), raw)
        })
        .collect()
}

const SIZES: &[usize] = &[
    (1 << 10),
    (1 << 11),
    (1 << 12),
    (1 << 13),
    (1 << 14),
    (1 << 15),
    (1 << 16),
    (1 << 17),
];

fn bench_insert_random<const V: usize, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("insert_random_{}b", V));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_keys(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("robin_hash/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut keys = keys.clone();
                    keys.shuffle(&mut SmallRng::from_os_rng());
                    keys
                },
                |keys| {
                    let mut table = robin_table::<V>(0);
                    for (key, raw) in keys {
                        black_box(table.insert(&key, &make_value::<V>(raw)).unwrap());
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut keys = keys.clone();
                    keys.shuffle(&mut SmallRng::from_os_rng());
                    keys
                },
                |keys| {
                    let mut table = Hashbrown::<V>::with_hasher(SipBuildHasher);
                    for (key, raw) in keys {
                        black_box(table.insert(key, make_value::<V>(raw)));
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_find_hit_miss<const V: usize, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("find_hit_miss_{}b", V));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES[..=MAX_SIZE].iter() {
        let present = random_keys(size);
        let mut probes = present
            .iter()
            .map(|(key, _)| key.clone())
            .chain(random_keys(size).into_iter().map(|(key, _)| key))
            .collect::<Vec<_>>();
        probes.shuffle(&mut SmallRng::from_os_rng());

        let mut robin = robin_table::<V>(0);
        let mut hashbrown = Hashbrown::<V>::with_hasher(SipBuildHasher);
        for (key, raw) in present.iter() {
            robin.insert(key, &make_value::<V>(*raw)).unwrap();
            hashbrown.insert(key.clone(), make_value::<V>(*raw));
        }

        group.throughput(Throughput::Elements(probes.len() as u64));
        group.bench_function(format!("robin_hash/{size}"), |b| {
            b.iter(|| {
                for key in probes.iter() {
                    black_box(robin.get(key));
                }
            })
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                for key in probes.iter() {
                    black_box(hashbrown.get(&key[..]));
                }
            })
        });
    }

    group.finish();
}

fn bench_remove<const V: usize, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("remove_{}b", V));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_keys(size);

        let mut robin = robin_table::<V>(0);
        let mut hashbrown = Hashbrown::<V>::with_hasher(SipBuildHasher);
        for (key, raw) in keys.iter() {
            robin.insert(key, &make_value::<V>(*raw)).unwrap();
            hashbrown.insert(key.clone(), make_value::<V>(*raw));
        }

        let mut order = keys.into_iter().map(|(key, _)| key).collect::<Vec<_>>();
        order.shuffle(&mut SmallRng::from_os_rng());

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("robin_hash/{size}"), |b| {
            b.iter_batched(
                || robin.clone(),
                |mut table| {
                    for key in order.iter() {
                        black_box(table.remove(key).unwrap());
                    }
                    black_box(table)
                },
                BatchSize::LargeInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || hashbrown.clone(),
                |mut table| {
                    for key in order.iter() {
                        black_box(table.remove(&key[..]));
                    }
                    black_box(table)
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

fn bench_iteration<const V: usize, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("iteration_{}b", V));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES[..=MAX_SIZE].iter() {
        let mut robin = robin_table::<V>(0);
        let mut hashbrown = Hashbrown::<V>::with_hasher(SipBuildHasher);
        for (key, raw) in random_keys(size) {
            robin.insert(&key, &make_value::<V>(raw)).unwrap();
            hashbrown.insert(key, make_value::<V>(raw));
        }

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("robin_hash/{size}"), |b| {
            b.iter(|| {
                for entry in robin.iter() {
                    black_box(entry);
                }
            })
        });

        group.bench_function(format!("robin_hash_cursor/{size}"), |b| {
            b.iter(|| {
                let mut slot = robin.begin();
                while slot != robin.end() {
                    black_box(robin.value_at(slot));
                    slot = robin.next_slot(slot);
                }
            })
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                for entry in hashbrown.iter() {
                    black_box(entry);
                }
            })
        });
    }

    group.finish();
}

#[derive(Clone, Copy)]
enum Operation {
    Insert,
    Remove,
    Find,
}

fn bench_mixed_probabilistic_zipf<const V: usize, const MAX_SIZE: usize>(c: &mut Criterion) {
    for exponent in [1.0, 1.3] {
        let mut group = c.benchmark_group(format!("mixed_probabilistic_zipf_{:.01}_{}b", exponent, V));
        group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

        const KEY_SPACE_MULTIPLIER: u64 = 2;

        for &size in SIZES[..=MAX_SIZE].iter() {
            let mut rng = SmallRng::from_os_rng();
            let op_distr = Zipf::new(3.0, exponent).unwrap();

            let operations = (0..size * 3)
                .map(|_| {
                    let op_choice: f64 = rng.sample(op_distr);
                    if op_choice <= 1.0 {
                        Operation::Find
                    } else if op_choice <= 2.0 {
                        Operation::Insert
                    } else {
                        Operation::Remove
                    }
                })
                .collect::<Vec<Operation>>();

            let insert_distr = Zipf::new(size as f32 - 1.0, 1.0).unwrap();
            let find_remove_distr =
                Zipf::new(size as f32 * KEY_SPACE_MULTIPLIER as f32 - 1.0, 1.0).unwrap();

            // Pre-draw keys so both tables see the same sequence.
            let script = operations
                .into_iter()
                .map(|operation| {
                    let raw = match operation {
                        Operation::Insert => rng.sample(insert_distr) as u64,
                        Operation::Remove | Operation::Find => {
                            rng.sample(find_remove_distr) as u64
                        }
                    };
                    (operation, make_key(raw), raw)
                })
                .collect::<Vec<_>>();

            group.throughput(Throughput::Elements(script.len() as u64));
            group.bench_function(format!("robin_hash/{size}"), |b| {
                b.iter(|| {
                    let mut table = robin_table::<V>(0);
                    for (operation, key, raw) in script.iter() {
                        match operation {
                            Operation::Insert => {
                                let value = make_value::<V>(*raw);
                                match table.get_mut(key) {
                                    Some(slot) => slot.copy_from_slice(&value),
                                    None => {
                                        black_box(table.insert(key, &value).unwrap());
                                    }
                                }
                            }
                            Operation::Remove => {
                                let _ = black_box(table.remove(key));
                            }
                            Operation::Find => {
                                black_box(table.get(key));
                            }
                        }
                    }
                    black_box(table)
                })
            });

            group.bench_function(format!("hashbrown/{size}"), |b| {
                b.iter(|| {
                    let mut table = Hashbrown::<V>::with_hasher(SipBuildHasher);
                    for (operation, key, raw) in script.iter() {
                        match operation {
                            Operation::Insert => {
                                black_box(table.insert(key.clone(), make_value::<V>(*raw)));
                            }
                            Operation::Remove => {
                                black_box(table.remove(&key[..]));
                            }
                            Operation::Find => {
                                black_box(table.get(&key[..]));
                            }
                        }
                    }
                    black_box(table)
                })
            });
        }

        group.finish();
    }
}

criterion_group!(
    benches,
    bench_insert_random::<8, 7>,
    bench_insert_random::<256, 4>,
    bench_find_hit_miss::<8, 7>,
    bench_find_hit_miss::<256, 4>,
    bench_remove::<8, 7>,
    bench_remove::<256, 4>,
    bench_iteration::<8, 7>,
    bench_iteration::<256, 4>,
    bench_mixed_probabilistic_zipf::<8, 7>,
    bench_mixed_probabilistic_zipf::<256, 4>,
);

criterion_main!(benches);
