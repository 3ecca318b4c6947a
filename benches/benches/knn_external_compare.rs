// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use canopy_tree::{Aabb, BoundsDistance, Quadtree, QueryCache};
use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use glam::Vec2;
use rstar::RTree;

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn next_f32(&mut self) -> f32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        (x >> 40) as f32 / (1u64 << 24) as f32
    }
}

fn gen_points(count: usize, extent: f32) -> Vec<[f32; 2]> {
    let mut rng = Rng(0xFACE_FEED_CAFE_BABE);
    (0..count)
        .map(|_| {
            [
                (rng.next_f32() * 2.0 - 1.0) * extent,
                (rng.next_f32() * 2.0 - 1.0) * extent,
            ]
        })
        .collect()
}

fn bench_knn_external_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("knn_external_compare");
    for &n in &[10_000usize, 100_000] {
        let points = gen_points(n, 1_000.0);
        let queries = gen_points(256, 1_000.0);
        group.throughput(Throughput::Elements(queries.len() as u64));

        let bounds = Aabb::new(Vec2::splat(-1_000.0), Vec2::splat(1_000.0));
        let mut tree = Quadtree::with_capacity(bounds, 8, 10, n).unwrap();
        for (i, p) in points.iter().enumerate() {
            tree.insert_point(i as u32, Vec2::from_array(*p));
        }

        group.bench_function(format!("canopy_first_16_n{}", n), |b| {
            let mut cache = QueryCache::new();
            b.iter(|| {
                let mut total = 0usize;
                for q in &queries {
                    let mut taken = 0usize;
                    tree.nearest_with(
                        Vec2::from_array(*q),
                        200.0,
                        &mut |_: &u32| {
                            taken += 1;
                            taken < 16
                        },
                        &mut BoundsDistance,
                        &mut cache,
                    );
                    total += taken;
                }
                black_box(total)
            })
        });

        let rtree = RTree::bulk_load(points.clone());
        group.bench_function(format!("rstar_first_16_n{}", n), |b| {
            b.iter(|| {
                let mut total = 0usize;
                for q in &queries {
                    total += rtree.nearest_neighbor_iter(q).take(16).count();
                }
                black_box(total)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_knn_external_compare);
criterion_main!(benches);
