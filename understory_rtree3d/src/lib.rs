// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_rtree3d --heading-base-level=0

//! Understory R-tree 3D: a dynamic R-tree over triangles in 3D space.
//!
//! Each triangle is indexed by its axis-aligned minimum bounding box.
//!
//! - Insert triangles one at a time; overflowing nodes are split with the
//!   quadratic split heuristic.
//! - Remove triangles; nodes left underfull are dissolved and their triangles
//!   reinserted, and the root shrinks when it is left with a single child.
//! - Query every triangle whose bounding box intersects a box.
//! - Bulk load a static set by sorting along the longest axis and slicing.
//!
//! Triangles are compared by value, under cyclic rotation of their vertices.
//! The tree stores copies; duplicates are allowed and removed one at a time.
//!
//! Fan-out is set once with [`TreeConfig`]. The default, one to three entries
//! per node, produces deep trees that are easy to inspect; larger fan-outs
//! such as `TreeConfig::new(4, 16)` suit bigger data sets.
//!
//! # Example
//!
//! ```rust
//! use understory_rtree3d::{Aabb3D, Point3D, RTree3D, Triangle3D};
//!
//! let tri = |x: f32| {
//!     Triangle3D::new(
//!         Point3D::new(x, 0.0, 0.0),
//!         Point3D::new(x + 1.0, 0.0, 0.0),
//!         Point3D::new(x, 1.0, 0.0),
//!     )
//! };
//!
//! let mut tree = RTree3D::default();
//! for x in [0.0, 5.0, 10.0, 15.0] {
//!     tree.insert(tri(x));
//! }
//! // Four triangles overflow a leaf of three, so the root split.
//! assert_eq!(tree.height(), 2);
//!
//! let query = Aabb3D::new(Point3D::new(4.0, 0.0, 0.0), Point3D::new(11.0, 1.0, 0.0));
//! assert_eq!(tree.find(&query).len(), 2);
//!
//! assert!(tree.remove(&tri(5.0)));
//! assert_eq!(tree.find(&query), [tri(10.0)]);
//! assert_eq!(tree.validate(), Ok(()));
//! ```
//!
//! Packing a static set in one pass:
//!
//! ```rust
//! use understory_rtree3d::{Point3D, RTree3D, TreeConfig, Triangle3D};
//!
//! let tris: Vec<Triangle3D> = (0..100)
//!     .map(|i| {
//!         let x = i as f32;
//!         Triangle3D::new(
//!             Point3D::new(x, 0.0, 0.0),
//!             Point3D::new(x, 1.0, 0.0),
//!             Point3D::new(x, 0.0, 1.0),
//!         )
//!     })
//!     .collect();
//! let config = TreeConfig::new(2, 8).unwrap();
//! let tree = RTree3D::bulk_load(config, &tris);
//! assert_eq!(tree.len(), 100);
//! assert_eq!(tree.validate_bulk(), Ok(()));
//! ```
//!
//! The tree is not synchronized. Wrap it in a lock to share it between
//! threads.
//!
//! This crate is `no_std` and uses `alloc`. Structural events (splits, root
//! growth and collapse, reinsertion, bulk builds) are reported through
//! [`tracing`] at `debug` and `trace` level.

#![no_std]

extern crate alloc;

mod bulk;
pub mod config;
pub mod node;
mod split;
pub mod tree;
pub mod types;
pub mod validate;

pub use config::{ConfigError, TreeConfig};
pub use node::NodeRef;
pub use tree::RTree3D;
pub use types::{Aabb3D, Axis, Point3D, Triangle3D};
pub use validate::InvariantError;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn tri(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Triangle3D {
        Triangle3D::new(a.into(), b.into(), c.into())
    }

    /// The thirteen-triangle scene used by the demos.
    fn scene() -> Vec<Triangle3D> {
        alloc::vec![
            tri([-5.6, 6.8, 0.0], [-4.0, 8.0, 0.0], [-5.6, 8.0, 0.0]),
            tri([0.0, 6.0, 0.0], [2.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            tri([3.0, 2.0, 0.0], [4.0, 3.0, 0.0], [4.0, 2.0, 0.0]),
            tri([-4.0, 6.0, 0.0], [-3.2, 6.8, 0.0], [-3.6, 5.2, 0.0]),
            tri([5.0, 2.0, 0.0], [5.0, 3.0, 0.0], [6.0, 2.0, 0.0]),
            tri([-4.0, 4.0, 0.0], [-6.0, 4.0, 0.0], [-6.0, 6.0, 0.0]),
            tri([6.0, -1.0, 0.0], [6.0, -2.0, 0.0], [5.0, -2.0, 0.0]),
            tri([4.6, -2.0, 0.0], [4.0, -2.5, 0.0], [4.8, -3.0, 0.0]),
            tri([3.0, 3.0, 0.0], [4.5, 3.0, 0.0], [3.0, 5.0, 0.0]),
            tri([7.0, 1.0, 0.0], [7.0, -3.0, 0.0], [6.0, -3.0, 0.0]),
            tri([-6.0, -4.0, 0.0], [-6.0, -2.0, 0.0], [-4.0, -4.0, 0.0]),
            tri([-0.8, 0.4, 0.0], [-0.8, -2.0, 0.0], [-4.0, -2.0, 0.0]),
            tri([6.0, 7.0, 0.0], [6.4, 4.4, 0.0], [7.0, 6.0, 0.0]),
        ]
    }

    #[test]
    fn scene_insert_remove_query() {
        let scene = scene();
        let mut tree = RTree3D::bulk_load(TreeConfig::default(), &scene);
        assert_eq!(tree.len(), 13);
        assert_eq!(tree.height(), 3);

        let extra = tri([-3.0, 1.0, 0.0], [-4.0, 1.0, 0.0], [-3.0, 0.0, 0.0]);
        tree.insert(extra);
        assert!(tree.contains(&extra));
        assert_eq!(tree.len(), 14);
        assert!(tree.remove(&extra));
        assert_eq!(tree.len(), 13);
        assert_eq!(tree.validate_bulk(), Ok(()));

        let query = Aabb3D::new(Point3D::new(0.0, 0.0, 0.0), Point3D::new(3.0, 3.0, 3.0));
        let mut hits = tree.find(&query);
        let expected: Vec<Triangle3D> = scene
            .iter()
            .copied()
            .filter(|t| query.intersects(&t.bbox()))
            .collect();
        assert_eq!(hits.len(), expected.len());
        hits.retain(|t| !expected.contains(t));
        assert!(hits.is_empty(), "unexpected hits: {hits:?}");
        // Triangles 2 and 8 only touch the query box.
        assert_eq!(expected, [scene[1], scene[2], scene[8]]);
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert_eq!(TreeConfig::new(0, 3), Err(ConfigError::ZeroMinChildren));
        assert!(TreeConfig::new(3, 4).is_err());
    }
}
