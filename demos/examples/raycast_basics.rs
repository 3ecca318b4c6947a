// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raycast basics.
//!
//! Build a small octree, cast a few rays, and print what they hit.
//!
//! Run:
//! - `cargo run -p canopy_demos --example raycast_basics`

use canopy_tree::{Aabb, BoundsIntersecter, Octree, Ray};
use glam::Vec3;

fn main() {
    let bounds = Aabb::new(Vec3::splat(-32.0), Vec3::splat(32.0));
    let mut tree = Octree::new(bounds, 4, 6).unwrap();

    // A few labelled crates scattered through the world.
    let labels = ["red", "green", "blue", "yellow"];
    let centers = [
        Vec3::new(8.0, 0.0, 0.0),
        Vec3::new(20.0, 2.0, 0.0),
        Vec3::new(-12.0, -6.0, 4.0),
        Vec3::new(0.0, 15.0, -10.0),
    ];
    for (label, center) in labels.iter().zip(centers) {
        tree.insert(
            *label,
            Aabb::from_center_half_extents(center, Vec3::splat(1.5)),
        );
    }

    let rays = [
        Ray::new(Vec3::new(-40.0, 0.0, 0.0), Vec3::X),
        Ray::new(Vec3::new(0.0, 40.0, -10.0), Vec3::NEG_Y),
        Ray::new(Vec3::new(-40.0, 30.0, 0.0), Vec3::X),
    ];
    for ray in rays {
        match tree.raycast(&ray, &mut BoundsIntersecter) {
            Some(hit) => println!(
                "ray from {:?} hits {:?} at t={:.2}, point {:?}",
                ray.origin, hit.payload, hit.distance, hit.point
            ),
            None => println!("ray from {:?} hits nothing", ray.origin),
        }
    }
}
