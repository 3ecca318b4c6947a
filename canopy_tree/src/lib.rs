// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Tree: sparse octree and quadtree indices for AABB-keyed values.
//!
//! Canopy Tree is a reusable building block for spatial queries over many
//! boxed or point-like objects: broad-phase collision sets, picking, and
//! proximity streams.
//!
//! - Insert values under axis-aligned bounding boxes (AABBs) or points into
//!   an [`Octree`] (3D) or [`Quadtree`] (2D).
//! - Raycast to the nearest stored value, enumerate a query box, or stream
//!   values in ascending distance from a point.
//! - Queries are driven by caller-supplied callbacks ([`Intersecter`],
//!   [`RangeVisitor`], [`NearestVisitor`], [`DistanceProvider`]) with
//!   closure shorthands, so the core never interprets payloads.
//!
//! Both trees are one implementation, [`Tree`], generic over a
//! [`CellVector`] (the dimension seam; [`glam`] vectors implement it) and an
//! opaque `Copy` payload. Only occupied nodes are stored: node identifiers
//! encode the root-to-node path in an integer, and a pair of hash maps keyed
//! by those identifiers form the entire structure. Child selection during
//! insertion and range descent is a bit-mask test rather than per-child box
//! intersection, which keeps the hot paths branch-light and SIMD-friendly.
//!
//! # Example
//!
//! ```rust
//! use canopy_tree::{Aabb, BoundsIntersecter, Octree, Ray};
//! use glam::Vec3;
//!
//! let bounds = Aabb::new(Vec3::splat(-16.0), Vec3::splat(16.0));
//! let mut tree = Octree::new(bounds, 8, 6)?;
//! tree.insert(
//!     1u32,
//!     Aabb::new(Vec3::new(2.0, -1.0, -1.0), Vec3::new(4.0, 1.0, 1.0)),
//! );
//! tree.insert_point(2, Vec3::new(8.0, 0.0, 0.0));
//!
//! // Cast a ray through both; the box is hit first.
//! let ray = Ray::new(Vec3::new(-10.0, 0.0, 0.0), Vec3::X);
//! let hit = tree.raycast(&ray, &mut BoundsIntersecter).unwrap();
//! assert_eq!(hit.payload, 1);
//! assert_eq!(hit.distance, 12.0);
//! # Ok::<(), canopy_tree::TreeError>(())
//! ```
//!
//! Range queries hand every candidate to a visitor, which applies its own
//! exact overlap test (delivery is at cell granularity, and objects spanning
//! several cells arrive once per cell):
//!
//! ```rust
//! use canopy_tree::{Aabb, Quadtree};
//! use glam::Vec2;
//!
//! let world = Aabb::new(Vec2::splat(-100.0), Vec2::splat(100.0));
//! let mut tree = Quadtree::new(world, 8, 6)?;
//! for i in 0..32u32 {
//!     let at = Vec2::new(i as f32 * 6.0 - 90.0, 0.0);
//!     tree.insert(i, Aabb::from_center_half_extents(at, Vec2::splat(1.0)));
//! }
//!
//! let query = Aabb::new(Vec2::new(-10.0, -5.0), Vec2::new(10.0, 5.0));
//! let mut inside = Vec::new();
//! tree.range(&query, &mut |payload: &u32, bounds: &Aabb<Vec2>, query: &Aabb<Vec2>| {
//!     if bounds.overlaps(query) && !inside.contains(payload) {
//!         inside.push(*payload);
//!     }
//!     true
//! });
//! assert_eq!(inside.len(), 3);
//! # Ok::<(), canopy_tree::TreeError>(())
//! ```
//!
//! Nearest-neighbor queries stream values in ascending distance until the
//! visitor stops or the cutoff radius is exhausted:
//!
//! ```rust
//! use canopy_tree::{Aabb, BoundsDistance, Quadtree};
//! use glam::Vec2;
//!
//! let mut tree = Quadtree::new(Aabb::new(Vec2::splat(-8.0), Vec2::splat(8.0)), 4, 5)?;
//! for i in 0..8u32 {
//!     tree.insert_point(i, Vec2::new(i as f32 - 4.0, 0.5));
//! }
//!
//! let mut order = Vec::new();
//! tree.nearest(
//!     Vec2::new(0.6, 0.5),
//!     3.0,
//!     &mut |payload: &u32| {
//!         order.push(*payload);
//!         true
//!     },
//!     &mut BoundsDistance,
//! );
//! assert_eq!(order.first(), Some(&5));
//! # Ok::<(), canopy_tree::TreeError>(())
//! ```
//!
//! ## Choosing parameters
//!
//! - `objects_per_node`: how many objects a leaf holds before it splits.
//!   Small values make deep, selective trees (good for skewed data); larger
//!   values favor flat trees and cheap insertion.
//! - `max_depth`: caps subdivision. The 32-bit path identifiers allow up to
//!   10 levels for the octree and 15 for the quadtree; co-located objects
//!   that can never separate simply pile up in a max-depth leaf.
//! - Batched nearest-neighbor callers should keep a [`QueryCache`] per
//!   thread and use [`Tree::nearest_with`] to amortize scratch allocation.
//!
//! ## Float semantics
//!
//! Coordinates are finite `f32`; construction rejects non-finite root
//! bounds and debug-free paths assume no NaNs thereafter. Rays may have
//! zero direction components (their reciprocal is ±∞; the slab test handles
//! it). A ray grazing a box face exactly can report a false-positive entry,
//! which the object-level intersecter is free to reject.
//!
//! Mutation (`insert`, `insert_point`, `clear`, `copy_from`) must not
//! overlap with any other use of the same tree; queries take `&self` and
//! may run concurrently with each other, each with its own cache.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod error;
mod heap;
pub mod nearest;
mod node;
mod range;
pub mod raycast;
pub mod tree;
pub mod types;
pub mod visit;

pub use error::TreeError;
pub use nearest::QueryCache;
pub use raycast::RayHit;
pub use tree::{Octree, Quadtree, Tree};
pub use types::{Aabb, CellVector, Ray};
pub use visit::{
    BoundsDistance, BoundsIntersecter, DistanceProvider, Intersecter, NearestVisitor, RangeVisitor,
};
