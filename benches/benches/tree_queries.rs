// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_tree::{
    Aabb, BoundsDistance, BoundsIntersecter, Octree, Quadtree, QueryCache, Ray,
};
use criterion::{
    BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use glam::{Vec2, Vec3};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    fn in_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }
}

fn gen_points_3d(count: usize, extent: f32) -> Vec<Vec3> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|_| {
            Vec3::new(
                rng.in_range(-extent, extent),
                rng.in_range(-extent, extent),
                rng.in_range(-extent, extent),
            )
        })
        .collect()
}

fn gen_boxes_2d(count: usize, extent: f32, half: f32) -> Vec<Aabb<Vec2>> {
    let mut rng = Rng::new(0xBADC_0FFE_1234_5678);
    (0..count)
        .map(|_| {
            let center = Vec2::new(
                rng.in_range(-extent + half, extent - half),
                rng.in_range(-extent + half, extent - half),
            );
            Aabb::from_center_half_extents(center, Vec2::splat(half))
        })
        .collect()
}

fn build_octree(points: &[Vec3], extent: f32) -> Octree<u32> {
    let bounds = Aabb::new(Vec3::splat(-extent), Vec3::splat(extent));
    let mut tree = Octree::with_capacity(bounds, 8, 8, points.len()).unwrap();
    for (i, &p) in points.iter().enumerate() {
        tree.insert_point(i as u32, p);
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &n in &[1_000usize, 10_000, 100_000] {
        let points = gen_points_3d(n, 1_000.0);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("octree_points_n{}", n), |b| {
            b.iter_batched(
                || points.clone(),
                |points| black_box(build_octree(&points, 1_000.0)),
                BatchSize::SmallInput,
            )
        });
    }
    let boxes = gen_boxes_2d(10_000, 1_000.0, 4.0);
    group.throughput(Throughput::Elements(boxes.len() as u64));
    group.bench_function("quadtree_boxes_n10000", |b| {
        b.iter_batched(
            || boxes.clone(),
            |boxes| {
                let bounds = Aabb::new(Vec2::splat(-1_000.0), Vec2::splat(1_000.0));
                let mut tree = Quadtree::with_capacity(bounds, 8, 8, boxes.len()).unwrap();
                for (i, b) in boxes.into_iter().enumerate() {
                    tree.insert(i as u32, b);
                }
                black_box(tree)
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_raycast(c: &mut Criterion) {
    let mut group = c.benchmark_group("raycast");
    let points = gen_points_3d(100_000, 1_000.0);
    let tree = build_octree(&points, 1_000.0);
    let mut rng = Rng::new(0x0123_4567_89AB_CDEF);
    let rays: Vec<Ray<Vec3>> = (0..256)
        .map(|_| {
            let origin = Vec3::new(
                rng.in_range(-2_000.0, -1_000.0),
                rng.in_range(-500.0, 500.0),
                rng.in_range(-500.0, 500.0),
            );
            Ray::new(origin, Vec3::new(1.0, rng.in_range(-0.2, 0.2), rng.in_range(-0.2, 0.2)))
        })
        .collect();

    group.throughput(Throughput::Elements(rays.len() as u64));
    group.bench_function("octree_100k_points", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for ray in &rays {
                if tree.raycast(ray, &mut BoundsIntersecter).is_some() {
                    hits += 1;
                }
            }
            black_box(hits)
        })
    });
    group.finish();
}

fn bench_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("range");
    let boxes = gen_boxes_2d(50_000, 1_000.0, 4.0);
    let bounds = Aabb::new(Vec2::splat(-1_000.0), Vec2::splat(1_000.0));
    let mut tree = Quadtree::with_capacity(bounds, 8, 8, boxes.len()).unwrap();
    for (i, b) in boxes.iter().enumerate() {
        tree.insert(i as u32, *b);
    }

    group.bench_function("quadtree_50k_boxes_256_queries", |b| {
        b.iter(|| {
            let mut total = 0usize;
            for q in 0..256 {
                let x = (q % 16) as f32 * 120.0 - 960.0;
                let y = (q / 16) as f32 * 120.0 - 960.0;
                let query = Aabb::new(Vec2::new(x, y), Vec2::new(x + 100.0, y + 100.0));
                tree.range(&query, &mut |_: &u32, bounds: &Aabb<Vec2>, query: &Aabb<Vec2>| {
                    if bounds.overlaps(query) {
                        total += 1;
                    }
                    true
                });
            }
            black_box(total)
        })
    });
    group.finish();
}

fn bench_nearest(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest");
    let points = gen_points_3d(100_000, 1_000.0);
    let tree = build_octree(&points, 1_000.0);
    let mut rng = Rng::new(0x5555_AAAA_5555_AAAA);
    let queries: Vec<Vec3> = (0..256)
        .map(|_| {
            Vec3::new(
                rng.in_range(-1_000.0, 1_000.0),
                rng.in_range(-1_000.0, 1_000.0),
                rng.in_range(-1_000.0, 1_000.0),
            )
        })
        .collect();

    group.throughput(Throughput::Elements(queries.len() as u64));
    group.bench_function("first_8_cached_scratch", |b| {
        let mut cache = QueryCache::new();
        b.iter(|| {
            let mut total = 0usize;
            for &q in &queries {
                let mut taken = 0usize;
                tree.nearest_with(
                    q,
                    100.0,
                    &mut |_: &u32| {
                        taken += 1;
                        taken < 8
                    },
                    &mut BoundsDistance,
                    &mut cache,
                );
                total += taken;
            }
            black_box(total)
        })
    });
    group.bench_function("first_8_one_shot", |b| {
        b.iter(|| {
            let mut total = 0usize;
            for &q in &queries {
                let mut taken = 0usize;
                tree.nearest(
                    q,
                    100.0,
                    &mut |_: &u32| {
                        taken += 1;
                        taken < 8
                    },
                    &mut BoundsDistance,
                );
                total += taken;
            }
            black_box(total)
        })
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_raycast, bench_range, bench_nearest);
criterion_main!(benches);
