// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree core: construction, insertion, subdivision, and storage.

use alloc::vec::Vec;
use hashbrown::HashMap;

use crate::error::TreeError;
use crate::node::{NodeId, point_child_index};
use crate::types::{Aabb, CellVector};

/// A stored object: the payload together with the bounds it was inserted
/// under. Copied into every leaf bucket whose cell the bounds overlap.
#[derive(Clone, Copy)]
pub(crate) struct Entry<V, P> {
    pub(crate) payload: P,
    pub(crate) bounds: Aabb<V>,
}

/// A sparse spatial tree storing values keyed by axis-aligned bounding
/// boxes.
///
/// `V` selects the dimension ([`glam::Vec2`] for a quadtree, [`glam::Vec3`]
/// or [`glam::Vec3A`] for an octree); `P` is an opaque copyable payload.
/// Only occupied nodes exist in storage: the backbone is a pair of hash
/// maps keyed by path-encoded node identifiers, one holding per-node object
/// counts and one holding leaf object buckets.
///
/// A node subdivides when its count exceeds `objects_per_node`, unless it
/// sits at `max_depth`. Objects spanning several child cells are replicated
/// into each; queries that need uniqueness deduplicate at the visitor (see
/// [`RangeVisitor`](crate::RangeVisitor)).
///
/// Mutation must not overlap with any other use of the same tree. Queries
/// take `&self`, mutate only their own [`QueryCache`](crate::QueryCache),
/// and may run concurrently with each other.
pub struct Tree<V: CellVector, P: Copy> {
    pub(crate) bounds: Aabb<V>,
    pub(crate) center: V,
    pub(crate) half_size: V,
    pub(crate) quarter_size: V,
    pub(crate) objects_per_node: u32,
    pub(crate) max_depth: u32,
    pub(crate) len: usize,
    /// Object count per occupied node. A count above `objects_per_node` on
    /// a node below `max_depth` marks it as subdivided.
    pub(crate) counts: HashMap<NodeId, u32>,
    /// Object records per leaf node.
    pub(crate) buckets: HashMap<NodeId, Vec<Entry<V, P>>>,
}

/// Sparse quadtree over [`glam::Vec2`].
pub type Quadtree<P> = Tree<glam::Vec2, P>;

/// Sparse octree over [`glam::Vec3`].
pub type Octree<P> = Tree<glam::Vec3, P>;

impl<V: CellVector, P: Copy> core::fmt::Debug for Tree<V, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tree")
            .field("bounds", &self.bounds)
            .field("objects_per_node", &self.objects_per_node)
            .field("max_depth", &self.max_depth)
            .field("len", &self.len)
            .field("nodes", &self.counts.len())
            .finish_non_exhaustive()
    }
}

impl<V: CellVector, P: Copy> Tree<V, P> {
    /// Create an empty tree covering `bounds`.
    ///
    /// `objects_per_node` is the per-leaf threshold above which a node
    /// subdivides; `max_depth` caps subdivision and must be in
    /// `2..=V::MAX_DEPTH` (10 for an octree, 15 for a quadtree, from the
    /// 32-bit identifier width).
    pub fn new(bounds: Aabb<V>, objects_per_node: u32, max_depth: u32) -> Result<Self, TreeError> {
        Self::with_capacity(bounds, objects_per_node, max_depth, 0)
    }

    /// Like [`new`](Self::new), pre-allocating the node maps for roughly
    /// `capacity` occupied nodes.
    pub fn with_capacity(
        bounds: Aabb<V>,
        objects_per_node: u32,
        max_depth: u32,
        capacity: usize,
    ) -> Result<Self, TreeError> {
        if !bounds.is_valid() {
            return Err(TreeError::InvalidBounds);
        }
        if max_depth <= 1 || max_depth > V::MAX_DEPTH {
            return Err(TreeError::DepthOutOfRange {
                requested: max_depth,
                limit: V::MAX_DEPTH,
            });
        }
        if objects_per_node == 0 {
            return Err(TreeError::InvalidObjectsPerNode);
        }
        let half_size = bounds.half_extents();
        Ok(Self {
            bounds,
            center: bounds.center(),
            half_size,
            quarter_size: half_size * 0.5,
            objects_per_node,
            max_depth,
            len: 0,
            counts: HashMap::with_capacity(capacity),
            buckets: HashMap::with_capacity(capacity),
        })
    }

    /// The root bounds this tree was constructed with.
    pub fn bounds(&self) -> Aabb<V> {
        self.bounds
    }

    /// The per-leaf subdivision threshold.
    pub fn objects_per_node(&self) -> u32 {
        self.objects_per_node
    }

    /// The configured maximum depth.
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Number of objects inserted since the last clear.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a value under an axis-aligned bounding box.
    ///
    /// Descends from the root, replicating the record into every child cell
    /// the box reaches. Never fails: bounds outside the root are clamped
    /// into the nearest cells by the side-mask test at the root.
    pub fn insert(&mut self, payload: P, bounds: Aabb<V>) {
        let entry = Entry { payload, bounds };
        self.insert_into(NodeId::ROOT, 0, self.center, self.quarter_size, &entry);
        self.len += 1;
    }

    /// Insert a value at a single point (stored as a degenerate box).
    ///
    /// Fast path that walks one child per level instead of masking all of
    /// them, since a point lands in exactly one cell per level.
    pub fn insert_point(&mut self, payload: P, point: V) {
        let entry = Entry {
            payload,
            bounds: Aabb::new(point, point),
        };
        let mut id = NodeId::ROOT;
        let mut center = self.center;
        let mut quarter = self.quarter_size;
        for depth in 1..=self.max_depth {
            let index = point_child_index(point, center);
            id = id.child::<V>(index);
            center = center + V::CHILD_OFFSETS[index as usize] * quarter;
            quarter = quarter * 0.5;
            if self.try_insert(id, depth, center, quarter, &entry) {
                break;
            }
        }
        self.len += 1;
    }

    /// Remove every stored object. Bounds and shape parameters are kept,
    /// as is map capacity.
    pub fn clear(&mut self) {
        self.counts.clear();
        self.buckets.clear();
        self.len = 0;
    }

    /// Replace this tree's contents with a copy of `other`'s.
    ///
    /// Both trees must have identical bounds, `objects_per_node`, and
    /// `max_depth`; on mismatch the destination is left unchanged.
    pub fn copy_from(&mut self, other: &Self) -> Result<(), TreeError> {
        if self.bounds != other.bounds
            || self.objects_per_node != other.objects_per_node
            || self.max_depth != other.max_depth
        {
            return Err(TreeError::ShapeMismatch);
        }
        self.counts.clone_from(&other.counts);
        self.buckets.clone_from(&other.buckets);
        self.len = other.len;
        Ok(())
    }

    /// Leaf predicate: at `max_depth`, or holding no more objects than the
    /// threshold. The root has no count entry and reads as internal.
    pub(crate) fn is_leaf(&self, id: NodeId, depth: u32) -> bool {
        depth >= self.max_depth
            || self
                .counts
                .get(&id)
                .is_some_and(|&count| count <= self.objects_per_node)
    }

    /// Recursive insertion step for box-keyed records. `center` and
    /// `quarter` describe the node `id` at `depth`.
    fn insert_into(&mut self, id: NodeId, depth: u32, center: V, quarter: V, entry: &Entry<V, P>) {
        let mask = entry.bounds.side_mask(center);
        for index in 0..V::CHILD_COUNT {
            let child_mask = V::CHILD_MASKS[index];
            if mask & child_mask != child_mask {
                continue;
            }
            let child = id.child::<V>(index as u32);
            let child_center = center + V::CHILD_OFFSETS[index] * quarter;
            let child_quarter = quarter * 0.5;
            if !self.try_insert(child, depth + 1, child_center, child_quarter, entry) {
                self.insert_into(child, depth + 1, child_center, child_quarter, entry);
            }
        }
    }

    /// Append `entry` to `id` if it is (or becomes) a leaf, subdividing
    /// when the new count crosses the threshold. Returns false if `id` is
    /// already subdivided and the caller must recurse.
    fn try_insert(
        &mut self,
        id: NodeId,
        depth: u32,
        center: V,
        quarter: V,
        entry: &Entry<V, P>,
    ) -> bool {
        let count = self.counts.get(&id).copied().unwrap_or(0);
        if count > self.objects_per_node && depth < self.max_depth {
            return false;
        }
        self.buckets.entry(id).or_default().push(*entry);
        let count = count + 1;
        self.counts.insert(id, count);
        if count > self.objects_per_node && depth < self.max_depth {
            self.subdivide(id, depth, center, quarter);
        }
        true
    }

    /// Push an over-threshold node's objects down into its children.
    ///
    /// The bucket is snapshotted and removed; each record is re-masked
    /// against this node's center and appended to every matching child.
    /// The node's own count stays above the threshold as the subdivided
    /// marker. Children that end up over the threshold subdivide in turn.
    fn subdivide(&mut self, id: NodeId, depth: u32, center: V, quarter: V) {
        let Some(objects) = self.buckets.remove(&id) else {
            return;
        };
        let mut child_counts = [0u32; 8];
        for entry in &objects {
            let mask = entry.bounds.side_mask(center);
            for index in 0..V::CHILD_COUNT {
                let child_mask = V::CHILD_MASKS[index];
                if mask & child_mask == child_mask {
                    let child = id.child::<V>(index as u32);
                    debug_assert!(!self.counts.contains_key(&child));
                    self.buckets.entry(child).or_default().push(*entry);
                    child_counts[index] += 1;
                }
            }
        }
        for index in 0..V::CHILD_COUNT {
            let count = child_counts[index];
            if count == 0 {
                continue;
            }
            let child = id.child::<V>(index as u32);
            self.counts.insert(child, count);
            if count > self.objects_per_node && depth + 1 < self.max_depth {
                let child_center = center + V::CHILD_OFFSETS[index] * quarter;
                self.subdivide(child, depth + 1, child_center, quarter * 0.5);
            }
        }
    }
}
