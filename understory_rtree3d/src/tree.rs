// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The R-tree engine: insertion, removal, range search, and bulk loading.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::bulk::bulk_build;
use crate::config::TreeConfig;
use crate::node::{Arena, Kind, Node, NodeIdx, NodeRef};
use crate::split::quadratic_split;
use crate::types::{Aabb3D, Triangle3D};

/// A mutable R-tree over triangles in 3D.
///
/// The tree owns all of its nodes. Every node other than the root holds
/// between [`TreeConfig::min_children`] and [`TreeConfig::max_children`]
/// entries after any sequence of [`insert`](Self::insert) and
/// [`remove`](Self::remove) calls, and all leaves sit at the same depth.
///
/// Not synchronized: callers serialize mutation against queries themselves.
#[derive(Clone)]
pub struct RTree3D {
    config: TreeConfig,
    root: NodeIdx,
    arena: Arena,
    len: usize,
}

impl Default for RTree3D {
    fn default() -> Self {
        Self::new(TreeConfig::default())
    }
}

impl RTree3D {
    /// Create an empty tree (a single empty leaf).
    pub fn new(config: TreeConfig) -> Self {
        let mut arena = Arena::default();
        let root = arena.alloc(Node::empty_leaf());
        Self {
            config,
            root,
            arena,
            len: 0,
        }
    }

    /// Create a tree packed from `triangles` with [`build`](Self::build).
    pub fn bulk_load(config: TreeConfig, triangles: &[Triangle3D]) -> Self {
        let mut tree = Self::new(config);
        tree.build(triangles);
        tree
    }

    /// The fan-out bounds fixed at creation.
    pub const fn config(&self) -> TreeConfig {
        self.config
    }

    /// Number of stored triangles, duplicates included.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree stores no triangles.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels; a tree whose root is a leaf has height 1.
    pub fn height(&self) -> usize {
        self.arena.height(self.root)
    }

    /// Bounds of every stored triangle; [`Aabb3D::EMPTY`] for an empty tree.
    pub fn bbox(&self) -> Aabb3D {
        self.arena.bbox(self.root)
    }

    /// Read-only handle to the root node, for walking the structure.
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::new(&self.arena, self.root)
    }

    /// Every stored triangle, depth-first in child order.
    pub fn triangles(&self) -> Vec<Triangle3D> {
        let mut out = Vec::with_capacity(self.len);
        self.arena.collect_triangles(self.root, &mut out);
        out
    }

    /// Drop every triangle, leaving an empty leaf root.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = self.arena.alloc(Node::empty_leaf());
        self.len = 0;
    }

    /// Replace the whole tree with one packed from `triangles`.
    ///
    /// Triangles are sorted along the longest axis and sliced into contiguous
    /// groups level by level, so leaves all sit at the same depth. Slicing is
    /// greedy and nodes may hold fewer than `min_children` entries.
    pub fn build(&mut self, triangles: &[Triangle3D]) {
        let mut items = triangles.to_vec();
        self.arena.clear();
        self.root = bulk_build(&mut self.arena, &mut items, self.config.max_children());
        self.len = items.len();
    }

    /// Insert a triangle.
    ///
    /// Descends toward the child needing the least volume enlargement (the
    /// first such child on ties), splits overflowing nodes on the way back
    /// up, and grows a new root when the old one splits.
    pub fn insert(&mut self, triangle: Triangle3D) {
        let bbox = triangle.bbox();
        if let Some(sibling) = self.insert_node(self.root, triangle, &bbox) {
            let old = self.root;
            self.root = self.arena.alloc_inner(vec![old, sibling]);
            tracing::debug!(height = self.height(), "root split; tree grew");
        }
        self.len += 1;
    }

    /// Remove one stored triangle equal to `target` (under rotation).
    ///
    /// Returns `false` and leaves the tree untouched if none is stored.
    /// Nodes left underfull are detached and their triangles reinserted, then
    /// a root with a single child is replaced by that child.
    ///
    /// Descent follows children whose box contains `target`'s box. Every
    /// cached box encloses its contents, so a stored triangle's leaf is always
    /// reachable this way.
    pub fn remove(&mut self, target: &Triangle3D) -> bool {
        let bbox = target.bbox();
        let mut reinserts = Vec::new();
        if !self.remove_node(self.root, target, &bbox, &mut reinserts) {
            return false;
        }
        self.len -= 1 + reinserts.len();

        if matches!(&self.arena.get(self.root).kind, Kind::Inner(c) if c.is_empty()) {
            self.arena.release(self.root);
            self.root = self.arena.alloc(Node::empty_leaf());
        }
        if !reinserts.is_empty() {
            tracing::debug!(count = reinserts.len(), "reinserting orphaned triangles");
        }
        for t in reinserts {
            self.insert(t);
        }

        while let Some(only) = self.sole_child(self.root) {
            self.arena.release(self.root);
            self.root = only;
            tracing::debug!(height = self.height(), "root collapsed");
        }
        true
    }

    /// Whether a triangle equal to `target` (under rotation) is stored.
    pub fn contains(&self, target: &Triangle3D) -> bool {
        let bbox = target.bbox();
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            match &self.arena.get(idx).kind {
                Kind::Leaf(triangles) => {
                    if triangles.iter().any(|t| t == target) {
                        return true;
                    }
                }
                Kind::Inner(children) => stack.extend(
                    children
                        .iter()
                        .rev()
                        .filter(|c| self.arena.bbox(**c).contains(&bbox)),
                ),
            }
        }
        false
    }

    /// Every stored triangle whose bounding box intersects `query`.
    ///
    /// Results come in depth-first child order.
    pub fn find(&self, query: &Aabb3D) -> Vec<Triangle3D> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            match &self.arena.get(idx).kind {
                Kind::Leaf(triangles) => out.extend(
                    triangles
                        .iter()
                        .filter(|t| query.intersects(&t.bbox()))
                        .copied(),
                ),
                Kind::Inner(children) => stack.extend(
                    children
                        .iter()
                        .rev()
                        .filter(|c| self.arena.bbox(**c).intersects(query)),
                ),
            }
        }
        out
    }

    fn sole_child(&self, idx: NodeIdx) -> Option<NodeIdx> {
        match self.arena.get(idx).children() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// The child needing the least enlargement to cover `bbox`; first wins ties.
    fn choose_child(&self, children: &[NodeIdx], bbox: &Aabb3D) -> NodeIdx {
        let mut best: Option<(f64, NodeIdx)> = None;
        for c in children {
            let cost = self.arena.bbox(*c).enlargement(bbox);
            if best.is_none_or(|(bc, _)| cost < bc) {
                best = Some((cost, *c));
            }
        }
        best.map(|(_, c)| c).unwrap_or(children[0])
    }

    /// Insert below `idx`; returns a new sibling of `idx` if it split.
    fn insert_node(&mut self, idx: NodeIdx, triangle: Triangle3D, bbox: &Aabb3D) -> Option<NodeIdx> {
        let node = self.arena.get(idx);
        if !node.is_leaf() {
            let best = self.choose_child(node.children(), bbox);
            let split = self
                .insert_node(best, triangle, bbox)
                .and_then(|sibling| self.adopt(idx, sibling));
            self.arena.recompute_bbox(idx);
            return split;
        }
        if node.len() >= self.config.max_children() {
            return Some(self.split_leaf(idx, triangle));
        }
        let node = self.arena.get_mut(idx);
        if let Kind::Leaf(triangles) = &mut node.kind {
            triangles.push(triangle);
        }
        node.bbox.expand_to_include(bbox);
        None
    }

    /// Attach `child` to inner node `idx`, splitting it if full.
    fn adopt(&mut self, idx: NodeIdx, child: NodeIdx) -> Option<NodeIdx> {
        let max = self.config.max_children();
        if let Kind::Inner(children) = &mut self.arena.get_mut(idx).kind
            && children.len() < max
        {
            children.push(child);
            return None;
        }
        Some(self.split_inner(idx, child))
    }

    fn split_leaf(&mut self, idx: NodeIdx, extra: Triangle3D) -> NodeIdx {
        let node = self.arena.get_mut(idx);
        let mut entries = match core::mem::replace(&mut node.kind, Kind::Leaf(Vec::new())) {
            Kind::Leaf(triangles) => triangles,
            Kind::Inner(_) => unreachable!("split_leaf on inner node"),
        };
        entries.push(extra);

        let (keep, moved) = quadratic_split(entries, self.config.min_children(), Triangle3D::bbox);
        tracing::trace!(kept = keep.entries.len(), moved = moved.entries.len(), "leaf split");
        let node = self.arena.get_mut(idx);
        node.kind = Kind::Leaf(keep.entries);
        node.bbox = keep.bbox;
        self.arena.alloc(Node {
            bbox: moved.bbox,
            kind: Kind::Leaf(moved.entries),
        })
    }

    fn split_inner(&mut self, idx: NodeIdx, extra: NodeIdx) -> NodeIdx {
        let node = self.arena.get_mut(idx);
        let mut entries = match core::mem::replace(&mut node.kind, Kind::Inner(Vec::new())) {
            Kind::Inner(children) => children,
            Kind::Leaf(_) => unreachable!("split_inner on leaf"),
        };
        entries.push(extra);

        let arena = &self.arena;
        let (keep, moved) = quadratic_split(entries, self.config.min_children(), |c| arena.bbox(*c));
        tracing::trace!(kept = keep.entries.len(), moved = moved.entries.len(), "inner split");
        let node = self.arena.get_mut(idx);
        node.kind = Kind::Inner(keep.entries);
        node.bbox = keep.bbox;
        self.arena.alloc(Node {
            bbox: moved.bbox,
            kind: Kind::Inner(moved.entries),
        })
    }

    /// Remove `target` below `idx`. Underfull children are detached and their
    /// triangles appended to `reinserts`.
    fn remove_node(
        &mut self,
        idx: NodeIdx,
        target: &Triangle3D,
        bbox: &Aabb3D,
        reinserts: &mut Vec<Triangle3D>,
    ) -> bool {
        let count = match &mut self.arena.get_mut(idx).kind {
            Kind::Leaf(triangles) => {
                let Some(pos) = triangles.iter().position(|t| t == target) else {
                    return false;
                };
                triangles.remove(pos);
                self.arena.recompute_bbox(idx);
                return true;
            }
            Kind::Inner(children) => children.len(),
        };

        for slot in 0..count {
            let child = self.arena.get(idx).children()[slot];
            if !self.arena.bbox(child).contains(bbox) {
                continue;
            }
            if !self.remove_node(child, target, bbox, reinserts) {
                continue;
            }
            if self.arena.get(child).len() < self.config.min_children() {
                self.arena.collect_triangles(child, reinserts);
                if let Kind::Inner(children) = &mut self.arena.get_mut(idx).kind {
                    children.remove(slot);
                }
                self.arena.release_subtree(child);
                tracing::trace!(pending = reinserts.len(), "detached underfull node");
            } else {
                self.arena.recompute_bbox(child);
            }
            self.arena.recompute_bbox(idx);
            return true;
        }
        false
    }
}

impl Debug for RTree3D {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RTree3D")
            .field("min_children", &self.config.min_children())
            .field("max_children", &self.config.max_children())
            .field("len", &self.len)
            .field("height", &self.height())
            .field("arena_nodes", &self.arena.live())
            .finish_non_exhaustive()
    }
}
