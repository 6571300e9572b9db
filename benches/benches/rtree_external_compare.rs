// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_rtree3d::{Aabb3D, Point3D, RTree3D, TreeConfig, Triangle3D};

use rstar::primitives::Rectangle;
use rstar::{AABB, RTree};

/// One flat triangle per cell of an `n x n x n` grid.
fn gen_grid_triangles(n: usize, cell: f32) -> Vec<Triangle3D> {
    let mut out = Vec::with_capacity(n * n * n);
    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                let p = Point3D::new(x as f32 * cell, y as f32 * cell, z as f32 * cell);
                out.push(Triangle3D::new(
                    p,
                    Point3D::new(p.x + cell, p.y, p.z),
                    Point3D::new(p.x, p.y + cell, p.z + cell),
                ));
            }
        }
    }
    out
}

fn to_rstar_rects(v: &[Triangle3D]) -> Vec<Rectangle<[f32; 3]>> {
    v.iter()
        .map(|t| {
            let b = t.bbox();
            Rectangle::from_corners([b.min.x, b.min.y, b.min.z], [b.max.x, b.max.y, b.max.z])
        })
        .collect()
}

fn bench_rtree_external_compare_f32(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree3d_external_compare_f32");
    let config = TreeConfig::new(2, 6).unwrap();
    for &n in &[16_usize, 24] {
        let tris = gen_grid_triangles(n, 10.0);
        let query = Aabb3D::new(Point3D::new(30.0, 30.0, 30.0), Point3D::new(90.0, 90.0, 90.0));
        group.throughput(Throughput::Elements((n * n * n) as u64));

        group.bench_function(format!("understory_build_query_n{n}"), |b| {
            b.iter_batched(
                || RTree3D::new(config),
                |mut tree| {
                    for t in &tris {
                        tree.insert(*t);
                    }
                    black_box(tree.find(&query).len());
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("understory_build_query_bulk_n{n}"), |b| {
            b.iter(|| {
                let tree = RTree3D::bulk_load(config, &tris);
                black_box(tree.find(&query).len());
            });
        });

        group.bench_function(format!("rstar_build_query_bulk_n{n}"), |b| {
            b.iter_batched(
                || to_rstar_rects(&tris),
                |rectangles| {
                    let tree = RTree::bulk_load(rectangles);
                    let aabb = AABB::from_corners(
                        [query.min.x, query.min.y, query.min.z],
                        [query.max.x, query.max.y, query.max.z],
                    );
                    black_box(tree.locate_in_envelope_intersecting(&aabb).count());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rtree_external_compare_f32);
criterion_main!(benches);
