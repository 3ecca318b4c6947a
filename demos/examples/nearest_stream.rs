// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Streaming nearest neighbors.
//!
//! Insert points into an octree and stream the closest few to a query
//! point, reusing one scratch cache across queries.
//!
//! Run:
//! - `cargo run -p canopy_demos --example nearest_stream`

use canopy_tree::{Aabb, BoundsDistance, Octree, QueryCache};
use glam::Vec3;

fn main() {
    let bounds = Aabb::new(Vec3::splat(-100.0), Vec3::splat(100.0));
    let mut tree = Octree::new(bounds, 8, 6).unwrap();

    // A deterministic swirl of points.
    for i in 0..2_000u32 {
        let a = i as f32 * 0.37;
        let r = 10.0 + (i % 90) as f32;
        let p = Vec3::new(r * a.cos(), (i % 120) as f32 - 60.0, r * a.sin());
        tree.insert_point(i, p);
    }

    let mut cache = QueryCache::new();
    for query in [Vec3::ZERO, Vec3::new(40.0, 10.0, -25.0)] {
        println!("nearest to {query:?}:");
        let mut taken = 0usize;
        tree.nearest_with(
            query,
            50.0,
            &mut |payload: &u32| {
                println!("  #{payload}");
                taken += 1;
                taken < 5
            },
            &mut BoundsDistance,
            &mut cache,
        );
        if taken == 0 {
            println!("  (nothing within 50 units)");
        }
    }
}
