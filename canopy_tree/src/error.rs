// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by tree construction and copying.

use thiserror::Error;

/// Why a tree could not be constructed or copied.
///
/// Construction and [`copy_from`](crate::Tree::copy_from) validate up front
/// and leave state untouched on failure; insertion, clearing, and queries
/// are infallible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The root bounds are not a valid finite box.
    #[error("root bounds are not a valid finite box")]
    InvalidBounds,
    /// The requested maximum depth is outside what a node identifier can
    /// encode for this dimension.
    #[error("max depth must be in 2..={limit}, got {requested}")]
    DepthOutOfRange {
        /// The depth that was asked for.
        requested: u32,
        /// The deepest level the identifier width supports.
        limit: u32,
    },
    /// The per-node object threshold must be at least one.
    #[error("objects per node must be at least 1")]
    InvalidObjectsPerNode,
    /// Copy source and destination differ in bounds or shape parameters.
    #[error("tree bounds or shape parameters do not match")]
    ShapeMismatch,
}
