// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural self-checks for [`RTree3D`].

use thiserror::Error;

use crate::node::NodeRef;
use crate::tree::RTree3D;
use crate::types::Aabb3D;

/// The first structural invariant a tree was found to violate.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum InvariantError {
    /// A node holds more than `max_children` entries.
    #[error("node at depth {depth} holds {len} entries, more than max_children {max}")]
    Overfull {
        /// Depth of the node (root is 0).
        depth: usize,
        /// Entries found.
        len: usize,
        /// Configured maximum.
        max: usize,
    },

    /// A non-root node holds fewer than `min_children` entries.
    #[error("node at depth {depth} holds {len} entries, fewer than min_children {min}")]
    Underfull {
        /// Depth of the node.
        depth: usize,
        /// Entries found.
        len: usize,
        /// Configured minimum.
        min: usize,
    },

    /// A cached bounding box differs from the one its contents produce.
    #[error("node at depth {depth} caches {cached:?} but its contents bound {actual:?}")]
    StaleBounds {
        /// Depth of the node.
        depth: usize,
        /// Box stored in the node.
        cached: Aabb3D,
        /// Box recomputed from the node's contents.
        actual: Aabb3D,
    },

    /// Leaves were found at different depths.
    #[error("leaf at depth {found}, expected every leaf at depth {expected}")]
    UnevenDepth {
        /// Depth of the first leaf visited.
        expected: usize,
        /// Depth of the offending leaf.
        found: usize,
    },

    /// The triangle counter disagrees with the stored triangles.
    #[error("tree reports {reported} triangles but stores {stored}")]
    LenMismatch {
        /// Value of [`RTree3D::len`].
        reported: usize,
        /// Triangles actually reachable from the root.
        stored: usize,
    },

    /// An inner node has no children.
    #[error("inner node at depth {depth} has no children")]
    EmptyInner {
        /// Depth of the node.
        depth: usize,
    },
}

struct Walk {
    min: usize,
    max: usize,
    check_min: bool,
    leaf_depth: Option<usize>,
    stored: usize,
}

impl RTree3D {
    /// Check every structural invariant maintained by insert and remove.
    ///
    /// Every non-root node holds between `min_children` and `max_children`
    /// entries, the root at most `max_children`, every cached box is tight,
    /// all leaves share one depth, and [`len`](Self::len) is accurate.
    pub fn validate(&self) -> Result<(), InvariantError> {
        self.validate_with(true)
    }

    /// Like [`validate`](Self::validate) but without the minimum-fill check,
    /// which packed trees from [`build`](Self::build) need not satisfy.
    pub fn validate_bulk(&self) -> Result<(), InvariantError> {
        self.validate_with(false)
    }

    fn validate_with(&self, check_min: bool) -> Result<(), InvariantError> {
        let cfg = self.config();
        let mut walk = Walk {
            min: cfg.min_children(),
            max: cfg.max_children(),
            check_min,
            leaf_depth: None,
            stored: 0,
        };
        walk.visit(self.root(), 0)?;
        if walk.stored != self.len() {
            return Err(InvariantError::LenMismatch {
                reported: self.len(),
                stored: walk.stored,
            });
        }
        Ok(())
    }
}

impl Walk {
    fn visit(&mut self, node: NodeRef<'_>, depth: usize) -> Result<(), InvariantError> {
        let len = node.len();
        if len > self.max {
            return Err(InvariantError::Overfull {
                depth,
                len,
                max: self.max,
            });
        }
        if self.check_min && depth > 0 && len < self.min {
            return Err(InvariantError::Underfull {
                depth,
                len,
                min: self.min,
            });
        }

        let actual = if node.is_leaf() {
            Aabb3D::from_triangles(node.triangles())
        } else {
            node.children()
                .fold(Aabb3D::EMPTY, |acc, c| acc.union(&c.bbox()))
        };
        if actual != node.bbox() {
            return Err(InvariantError::StaleBounds {
                depth,
                cached: node.bbox(),
                actual,
            });
        }

        if node.is_leaf() {
            self.stored += len;
            let expected = *self.leaf_depth.get_or_insert(depth);
            if expected != depth {
                return Err(InvariantError::UnevenDepth {
                    expected,
                    found: depth,
                });
            }
            return Ok(());
        }
        if len == 0 {
            return Err(InvariantError::EmptyInner { depth });
        }
        for child in node.children() {
            self.visit(child, depth + 1)?;
        }
        Ok(())
    }
}
