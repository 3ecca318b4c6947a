// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Range traversal: masked descent over a query box.

use crate::node::NodeId;
use crate::tree::Tree;
use crate::types::{Aabb, CellVector};
use crate::visit::RangeVisitor;

impl<V: CellVector, P: Copy> Tree<V, P> {
    /// Visit every stored object whose leaf cell overlaps `query`.
    ///
    /// The overlap test is at node-cell granularity: the visitor receives
    /// each candidate with its stored bounds and the query box, and applies
    /// its own exact test if it needs one. Objects spanning several leaves
    /// are delivered once per overlapping leaf; deduplicate in the visitor
    /// when uniqueness matters. Returning `false` stops the traversal at
    /// once.
    pub fn range<R>(&self, query: &Aabb<V>, visitor: &mut R)
    where
        R: RangeVisitor<V, P>,
    {
        self.range_node(
            NodeId::ROOT,
            0,
            self.center,
            self.quarter_size,
            query,
            visitor,
        );
    }

    fn range_node<R>(
        &self,
        id: NodeId,
        depth: u32,
        center: V,
        quarter: V,
        query: &Aabb<V>,
        visitor: &mut R,
    ) -> bool
    where
        R: RangeVisitor<V, P>,
    {
        let mask = query.side_mask(center);
        for index in 0..V::CHILD_COUNT {
            let child_mask = V::CHILD_MASKS[index];
            if mask & child_mask != child_mask {
                continue;
            }
            let child = id.child::<V>(index as u32);
            let Some(&count) = self.counts.get(&child) else {
                continue;
            };
            if depth + 1 >= self.max_depth || count <= self.objects_per_node {
                if let Some(bucket) = self.buckets.get(&child) {
                    for entry in bucket {
                        if !visitor.visit(&entry.payload, &entry.bounds, query) {
                            return false;
                        }
                    }
                }
            } else {
                let child_center = center + V::CHILD_OFFSETS[index] * quarter;
                if !self.range_node(child, depth + 1, child_center, quarter * 0.5, query, visitor) {
                    return false;
                }
            }
        }
        true
    }
}
