// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node identifiers: bit-packed root-to-node paths.

use crate::types::CellVector;

/// Identifier of a tree node.
///
/// The root is the literal `1` (never `0`); a child appends its index by
/// shifting `DIM` bits and OR-ing. The identifier therefore encodes the full
/// root-to-node path, and the leading set bit doubles as a depth marker,
/// which caps the depth at `(32 - 1) / DIM` levels. Identifiers are an
/// internal detail and never escape the crate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) const ROOT: Self = Self(1);

    /// Identifier of child `index` under this node.
    #[inline]
    pub(crate) fn child<V: CellVector>(self, index: u32) -> Self {
        Self(self.0 << V::DIM | index)
    }
}

/// Index of the child whose cell contains `point`, relative to a node
/// centered at `center`. Bit `i` is set iff `point[i] >= center[i]`, so a
/// coordinate exactly on the center plane lands on the positive side.
#[inline]
pub(crate) fn point_child_index<V: CellVector>(point: V, center: V) -> u32 {
    point.cmpge_mask(center)
}
