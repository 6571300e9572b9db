// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use understory_rtree3d::{Aabb3D, Point3D, RTree3D, TreeConfig, Triangle3D};

/// Small triangles scattered through a cube of side `extent`.
fn gen_random_triangles(count: usize, extent: f32, seed: u64) -> Vec<Triangle3D> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let base = Point3D::new(
                rng.random_range(0.0..extent),
                rng.random_range(0.0..extent),
                rng.random_range(0.0..extent),
            );
            let mut corner = || {
                Point3D::new(
                    base.x + rng.random_range(0.0..2.0),
                    base.y + rng.random_range(0.0..2.0),
                    base.z + rng.random_range(0.0..2.0),
                )
            };
            let (b, c) = (corner(), corner());
            Triangle3D::new(base, b, c)
        })
        .collect()
}

fn gen_queries(count: usize, extent: f32, size: f32, seed: u64) -> Vec<Aabb3D> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let x = rng.random_range(0.0..extent - size);
            let y = rng.random_range(0.0..extent - size);
            let z = rng.random_range(0.0..extent - size);
            Aabb3D::new(Point3D::new(x, y, z), Point3D::new(x + size, y + size, z + size))
        })
        .collect()
}

const CONFIGS: [(usize, usize); 3] = [(1, 3), (2, 8), (4, 16)];

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree3d_build");
    for &n in &[1_000_usize, 10_000] {
        let tris = gen_random_triangles(n, 1000.0, 42);
        group.throughput(Throughput::Elements(n as u64));
        for (min, max) in CONFIGS {
            let config = TreeConfig::new(min, max).unwrap();

            group.bench_function(format!("insert_m{min}_M{max}_n{n}"), |b| {
                b.iter_batched(
                    || RTree3D::new(config),
                    |mut tree| {
                        for t in &tris {
                            tree.insert(*t);
                        }
                        black_box(tree.len());
                    },
                    BatchSize::SmallInput,
                );
            });

            group.bench_function(format!("bulk_M{max}_n{n}"), |b| {
                b.iter(|| {
                    let tree = RTree3D::bulk_load(config, &tris);
                    black_box(tree.len());
                });
            });
        }
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree3d_query");
    let n = 10_000_usize;
    let tris = gen_random_triangles(n, 1000.0, 7);
    let queries = gen_queries(256, 1000.0, 50.0, 8);
    group.throughput(Throughput::Elements(queries.len() as u64));
    for (min, max) in CONFIGS {
        let config = TreeConfig::new(min, max).unwrap();
        let mut incremental = RTree3D::new(config);
        for t in &tris {
            incremental.insert(*t);
        }
        let packed = RTree3D::bulk_load(config, &tris);

        for (label, tree) in [("insert", &incremental), ("bulk", &packed)] {
            group.bench_function(format!("{label}_m{min}_M{max}_n{n}"), |b| {
                b.iter(|| {
                    let hits: usize = queries.iter().map(|q| tree.find(q).len()).sum();
                    black_box(hits);
                });
            });
        }
    }
    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree3d_remove");
    let n = 5_000_usize;
    let tris = gen_random_triangles(n, 1000.0, 9);
    group.throughput(Throughput::Elements(n as u64));
    for (min, max) in CONFIGS {
        let config = TreeConfig::new(min, max).unwrap();
        let mut tree = RTree3D::new(config);
        for t in &tris {
            tree.insert(*t);
        }
        group.bench_function(format!("remove_all_m{min}_M{max}_n{n}"), |b| {
            b.iter_batched(
                || tree.clone(),
                |mut tree| {
                    for t in &tris {
                        black_box(tree.remove(t));
                    }
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_query, bench_remove);
criterion_main!(benches);
