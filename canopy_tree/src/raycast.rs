// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raycast traversal: plane-ordered descent to the nearest hit.

use crate::node::{NodeId, point_child_index};
use crate::tree::Tree;
use crate::types::{Aabb, CellVector, Ray};
use crate::visit::Intersecter;

/// The nearest object a raycast hit.
#[derive(Clone, Copy, Debug)]
pub struct RayHit<V, P> {
    /// The stored payload.
    pub payload: P,
    /// Hit position on the query ray.
    pub point: V,
    /// Ray parameter of the hit, in units of the query ray's direction.
    pub distance: f32,
}

impl<V: CellVector, P: Copy> Tree<V, P> {
    /// Find the stored object the ray hits first.
    ///
    /// What "hits" means is the `intersecter`'s call: it is handed every
    /// object of each visited leaf and reports the hit parameter, so it can
    /// test stored bounds ([`BoundsIntersecter`](crate::BoundsIntersecter))
    /// or exact geometry. Leaves are visited in ray-entry order and the
    /// first leaf hit wins, so the intersecter runs on a small fraction of
    /// the tree.
    pub fn raycast<I>(&self, ray: &Ray<V>, intersecter: &mut I) -> Option<RayHit<V, P>>
    where
        I: Intersecter<V, P>,
    {
        self.raycast_within(ray, f32::INFINITY, intersecter)
    }

    /// Like [`raycast`](Self::raycast), ignoring hits at parameters of
    /// `max_distance` or more.
    pub fn raycast_within<I>(
        &self,
        ray: &Ray<V>,
        max_distance: f32,
        intersecter: &mut I,
    ) -> Option<RayHit<V, P>>
    where
        I: Intersecter<V, P>,
    {
        if self.counts.is_empty() {
            return None;
        }
        let entry_t = self.bounds.intersects_ray(ray)?;
        if entry_t >= max_distance {
            return None;
        }
        // Re-origin to the root entry point so all descent arithmetic works
        // in local parameter units.
        let local = ray.advanced(entry_t);
        let (payload, t) = self.cast_node(
            NodeId::ROOT,
            0,
            self.center,
            self.half_size,
            &local,
            max_distance - entry_t,
            intersecter,
        )?;
        let distance = entry_t + t;
        Some(RayHit {
            payload,
            point: ray.at(distance),
            distance,
        })
    }

    /// Descend into `id` (described by `center`/`half` at `depth`) with a
    /// ray origined at the node's entry point. Returns the nearest hit and
    /// its parameter relative to that origin.
    fn cast_node<I>(
        &self,
        id: NodeId,
        depth: u32,
        center: V,
        half: V,
        ray: &Ray<V>,
        max_distance: f32,
        intersecter: &mut I,
    ) -> Option<(P, f32)>
    where
        I: Intersecter<V, P>,
    {
        if self.is_leaf(id, depth) {
            let mut best = None;
            let mut closest = max_distance;
            if let Some(bucket) = self.buckets.get(&id) {
                for entry in bucket {
                    if let Some(t) = intersecter.intersect(ray, &entry.payload, &entry.bounds)
                        && t < closest
                    {
                        closest = t;
                        best = Some((entry.payload, t));
                    }
                }
            }
            return best;
        }

        let cell = Aabb::from_center_half_extents(center, half);
        let child_half = half * 0.5;
        // The child holding the entry point, then neighbors in the order the
        // ray crosses the axis planes through the node center.
        let mut child = point_child_index(ray.origin, center);
        let mut plane_t = (center - ray.origin) * ray.inv_dir;
        let mut advanced = 0.0_f32;

        // A ray enters at most DIM + 1 children of one node: the first, plus
        // one per axis plane crossed inside the cell.
        for _ in 0..=V::DIM {
            let child_id = id.child::<V>(child);
            if self.counts.contains_key(&child_id) {
                let child_center = center + V::CHILD_OFFSETS[child as usize] * child_half;
                let local = ray.advanced(advanced);
                if let Some((payload, t)) = self.cast_node(
                    child_id,
                    depth + 1,
                    child_center,
                    child_half,
                    &local,
                    max_distance - advanced,
                    intersecter,
                ) {
                    // Entry order guarantees later children cannot hold a
                    // closer hit.
                    return Some((payload, advanced + t));
                }
            }

            // Next axis plane crossed inside this cell. Consumed planes are
            // parked at +∞; zero direction components never qualify (their
            // crossings sit at ±∞ or NaN).
            let mut next_axis = usize::MAX;
            let mut next_t = f32::INFINITY;
            for axis in 0..V::DIM {
                let t = plane_t.axis(axis);
                if t >= 0.0 && t < next_t && cell.contains_point(ray.at(t)) {
                    next_axis = axis;
                    next_t = t;
                }
            }
            if next_axis == usize::MAX || next_t >= max_distance {
                return None;
            }
            child ^= 1 << next_axis;
            plane_t = plane_t.with_axis(next_axis, f32::INFINITY);
            advanced = next_t;
        }
        None
    }
}
