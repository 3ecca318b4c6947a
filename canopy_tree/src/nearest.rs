// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nearest-neighbor traversal: best-first descent over squared distances.

use alloc::vec::Vec;

use crate::heap::{HeapOrder, MinHeap};
use crate::node::NodeId;
use crate::tree::{Entry, Tree};
use crate::types::{Aabb, CellVector};
use crate::visit::{DistanceProvider, NearestVisitor};

/// A node pending expansion, referenced from the heap by index.
#[derive(Clone, Copy)]
struct NodeSlot<V> {
    id: NodeId,
    depth: u32,
    count: u32,
    cell: Aabb<V>,
}

/// A heap entry: squared distance plus an index into one of the two scratch
/// vectors. Kept small on purpose; heap swaps dominate the traversal cost,
/// so the bulky node and object records live in the side vectors.
#[derive(Clone, Copy)]
struct QueueEntry {
    dist_sq: f32,
    slot: u32,
    is_node: bool,
}

impl HeapOrder for QueueEntry {
    fn comes_before(&self, other: &Self) -> bool {
        self.dist_sq < other.dist_sq
    }
}

/// Reusable scratch storage for nearest-neighbor queries.
///
/// Holds the traversal's node wrappers, promoted object records, and the
/// priority queue. One-shot queries build one internally; batched callers
/// keep one per thread and pass it to
/// [`nearest_with`](Tree::nearest_with) to amortize allocations.
pub struct QueryCache<V: CellVector, P: Copy> {
    nodes: Vec<NodeSlot<V>>,
    objects: Vec<Entry<V, P>>,
    heap: MinHeap<QueueEntry>,
}

impl<V: CellVector, P: Copy> QueryCache<V, P> {
    /// Create an empty cache.
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            objects: Vec::new(),
            heap: MinHeap::new(),
        }
    }

    fn reset(&mut self) {
        self.nodes.clear();
        self.objects.clear();
        self.heap.clear();
    }
}

impl<V: CellVector, P: Copy> Default for QueryCache<V, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: CellVector, P: Copy> Tree<V, P> {
    /// Visit stored objects in ascending distance from `point`, up to
    /// `max_distance`.
    ///
    /// The `distance` provider measures each candidate object (squared);
    /// when it returns true distances the visitor sees objects in exact
    /// non-decreasing order. Node cells are pruned with the point-to-cell
    /// squared distance, a lower bound on anything the cell contains, which
    /// is what makes the best-first order correct. Return `false` from the
    /// visitor to stop.
    pub fn nearest<N, D>(&self, point: V, max_distance: f32, visitor: &mut N, distance: &mut D)
    where
        N: NearestVisitor<P>,
        D: DistanceProvider<V, P>,
    {
        let mut cache = QueryCache::new();
        self.nearest_with(point, max_distance, visitor, distance, &mut cache);
    }

    /// Like [`nearest`](Self::nearest), reusing a caller-owned
    /// [`QueryCache`]. Sharing one cache between concurrent queries is not
    /// allowed; one per thread is.
    pub fn nearest_with<N, D>(
        &self,
        point: V,
        max_distance: f32,
        visitor: &mut N,
        distance: &mut D,
        cache: &mut QueryCache<V, P>,
    ) where
        N: NearestVisitor<P>,
        D: DistanceProvider<V, P>,
    {
        cache.reset();
        let limit = max_distance * max_distance;

        self.push_children(NodeId::ROOT, 1, self.center, self.quarter_size, point, limit, cache);

        while let Some(entry) = cache.heap.try_pop() {
            if !entry.is_node {
                let object = &cache.objects[entry.slot as usize];
                if !visitor.visit(&object.payload) {
                    return;
                }
                continue;
            }

            let node = cache.nodes[entry.slot as usize];
            if node.depth >= self.max_depth || node.count <= self.objects_per_node {
                // Leaf: measure the objects and promote survivors.
                if let Some(bucket) = self.buckets.get(&node.id) {
                    for object in bucket {
                        let d = distance.distance_squared(point, &object.payload, &object.bounds);
                        if d <= limit {
                            let slot = cache.objects.len() as u32;
                            cache.objects.push(*object);
                            cache.heap.push(QueueEntry {
                                dist_sq: d,
                                slot,
                                is_node: false,
                            });
                        }
                    }
                }
            } else {
                let center = node.cell.center();
                let quarter = node.cell.half_extents() * 0.5;
                self.push_children(node.id, node.depth + 1, center, quarter, point, limit, cache);
            }
        }
    }

    /// Queue every existing child of `id` whose cell lies within the
    /// cutoff. `center`/`quarter` describe the parent; `depth` the
    /// children.
    fn push_children(
        &self,
        id: NodeId,
        depth: u32,
        center: V,
        quarter: V,
        point: V,
        limit: f32,
        cache: &mut QueryCache<V, P>,
    ) {
        for index in 0..V::CHILD_COUNT {
            let child = id.child::<V>(index as u32);
            let Some(&count) = self.counts.get(&child) else {
                continue;
            };
            let child_center = center + V::CHILD_OFFSETS[index] * quarter;
            let cell = Aabb::from_center_half_extents(child_center, quarter);
            let d = cell.distance_squared(point);
            if d <= limit {
                let slot = cache.nodes.len() as u32;
                cache.nodes.push(NodeSlot {
                    id: child,
                    depth,
                    count,
                    cell,
                });
                cache.heap.push(QueueEntry {
                    dist_sq: d,
                    slot,
                    is_node: true,
                });
            }
        }
    }
}
