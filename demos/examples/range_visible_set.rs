// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visible set from a range query.
//!
//! Insert a grid of boxes into a quadtree and use `range` to compute the
//! set intersecting a moving viewport, a building block for culling and
//! virtualization.
//!
//! Run:
//! - `cargo run -p canopy_demos --example range_visible_set`

use canopy_tree::{Aabb, Quadtree};
use glam::Vec2;

fn main() {
    let world = Aabb::new(Vec2::splat(-500.0), Vec2::splat(500.0));
    let mut tree = Quadtree::new(world, 8, 8).unwrap();

    let mut id = 0u32;
    for y in 0..40 {
        for x in 0..40 {
            let center = Vec2::new(x as f32 * 25.0 - 487.5, y as f32 * 25.0 - 487.5);
            tree.insert(id, Aabb::from_center_half_extents(center, Vec2::splat(10.0)));
            id += 1;
        }
    }

    for step in 0..4 {
        let x0 = step as f32 * 200.0 - 400.0;
        let viewport = Aabb::new(Vec2::new(x0, -60.0), Vec2::new(x0 + 120.0, 60.0));
        let mut visible = Vec::new();
        tree.range(&viewport, &mut |payload: &u32,
                                    bounds: &Aabb<Vec2>,
                                    query: &Aabb<Vec2>| {
            // Exact check and dedup both belong to the visitor.
            if bounds.overlaps(query) && !visible.contains(payload) {
                visible.push(*payload);
            }
            true
        });
        visible.sort_unstable();
        println!("viewport at x={x0:>6.1}: {} boxes visible", visible.len());
    }
}
