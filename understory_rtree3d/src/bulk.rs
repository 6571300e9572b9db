// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sort-and-slice bulk loader.
//!
//! A packed tree is built top-down from a static set in one pass. With `n`
//! triangles and fan-out `m`, the tree gets `ceil(log_m(n))` levels. A node at
//! level `l` (leaves' parents are level 0) sorts its triangles by centroid
//! along the longest axis of their bounds and slices them into contiguous
//! groups of at most `m^(l+1)` triangles (`m` at level 0), at most
//! `ceil(n^(1/(l+2)))` of them. Each group becomes a child subtree.
//!
//! All leaves end up at the same depth and no node exceeds `m` entries. The
//! last group of a slice may be short, so nodes can be underfull.

use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::node::{Arena, Node, NodeIdx};
use crate::types::{Aabb3D, Triangle3D};

/// Build a packed tree over `triangles` into `arena` and return its root.
///
/// `triangles` is reordered in place.
pub(crate) fn bulk_build(
    arena: &mut Arena,
    triangles: &mut [Triangle3D],
    max_children: usize,
) -> NodeIdx {
    let n = triangles.len();
    if n <= max_children {
        return arena.alloc(Node::leaf(triangles.to_vec()));
    }
    let levels = ceil_log(n, max_children) - 1;
    tracing::debug!(count = n, levels, max_children, "bulk build");
    build_node(arena, levels - 1, triangles, max_children)
}

fn build_node(
    arena: &mut Arena,
    level: usize,
    triangles: &mut [Triangle3D],
    max_children: usize,
) -> NodeIdx {
    let n = triangles.len();
    let cap = if level == 0 {
        max_children
    } else {
        pow_saturating(max_children, level + 1)
    };
    debug_assert!(
        n.div_ceil(cap) <= ceil_root(n, level + 2),
        "group budget too small for {n} triangles at level {level}"
    );

    sort_along_longest_axis(triangles);
    let mut children = Vec::with_capacity(n.div_ceil(cap));
    for group in triangles.chunks_mut(cap) {
        let child = if level == 0 {
            arena.alloc(Node::leaf(group.to_vec()))
        } else {
            build_node(arena, level - 1, group, max_children)
        };
        children.push(child);
    }
    arena.alloc_inner(children)
}

fn sort_along_longest_axis(triangles: &mut [Triangle3D]) {
    let axis = Aabb3D::from_triangles(&*triangles).longest_axis();
    triangles.sort_by(|a, b| {
        a.centroid_on(axis)
            .partial_cmp(&b.centroid_on(axis))
            .unwrap_or(Ordering::Equal)
    });
}

/// Smallest `k` with `base^k >= n`. `base` must be at least 2.
fn ceil_log(n: usize, base: usize) -> usize {
    let mut k = 0;
    let mut p = 1_usize;
    while p < n {
        p = p.saturating_mul(base);
        k += 1;
    }
    k
}

/// Smallest `c` with `c^k >= n`.
fn ceil_root(n: usize, k: usize) -> usize {
    let mut c = 1_usize;
    while pow_saturating(c, k) < n {
        c += 1;
    }
    c
}

fn pow_saturating(base: usize, exp: usize) -> usize {
    (0..exp).fold(1_usize, |acc, _| acc.saturating_mul(base))
}
