// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fan-out configuration fixed at tree creation.

use thiserror::Error;

/// Fan-out bounds for every node of an [`RTree3D`](crate::RTree3D).
///
/// Every node other than the root holds between `min_children` and
/// `max_children` entries (triangles for a leaf, child nodes for an inner node).
/// The root may hold fewer than `min_children`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TreeConfig {
    min_children: usize,
    max_children: usize,
}

impl TreeConfig {
    /// Default minimum fan-out.
    pub const DEFAULT_MIN_CHILDREN: usize = 1;
    /// Default maximum fan-out.
    pub const DEFAULT_MAX_CHILDREN: usize = 3;

    /// Validate and create a configuration.
    ///
    /// A split distributes `max_children + 1` entries into two nodes, so
    /// `max_children` must be at least 2 and `2 * min_children` may not exceed
    /// `max_children + 1`.
    pub const fn new(min_children: usize, max_children: usize) -> Result<Self, ConfigError> {
        if min_children == 0 {
            return Err(ConfigError::ZeroMinChildren);
        }
        if max_children < 2 {
            return Err(ConfigError::MaxChildrenTooSmall { max_children });
        }
        if 2 * min_children > max_children + 1 {
            return Err(ConfigError::MinChildrenTooLarge {
                min_children,
                max_children,
            });
        }
        Ok(Self {
            min_children,
            max_children,
        })
    }

    /// Minimum number of entries in a non-root node.
    #[inline]
    pub const fn min_children(&self) -> usize {
        self.min_children
    }

    /// Maximum number of entries in any node.
    #[inline]
    pub const fn max_children(&self) -> usize {
        self.max_children
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            min_children: Self::DEFAULT_MIN_CHILDREN,
            max_children: Self::DEFAULT_MAX_CHILDREN,
        }
    }
}

/// Rejected [`TreeConfig`] parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `min_children` was zero.
    #[error("min_children must be at least 1")]
    ZeroMinChildren,

    /// `max_children` cannot hold the two halves of a split.
    #[error("max_children must be at least 2, got {max_children}")]
    MaxChildrenTooSmall {
        /// The rejected maximum.
        max_children: usize,
    },

    /// Both halves of a split cannot reach `min_children`.
    #[error(
        "min_children {min_children} is too large for max_children {max_children} (need 2 * min <= max + 1)"
    )]
    MinChildrenTooLarge {
        /// The rejected minimum.
        min_children: usize,
        /// The maximum it was paired with.
        max_children: usize,
    },
}
