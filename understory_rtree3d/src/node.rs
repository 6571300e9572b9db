// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena-backed node storage and the read-only traversal handle.
//!
//! Nodes live in a flat arena and refer to their children by [`NodeIdx`].
//! Each node caches the tight bounding box of its contents. Slots released
//! by splits and removals go on a free list and are reused.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::types::{Aabb3D, Triangle3D};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeIdx(usize);

impl NodeIdx {
    const fn new(i: usize) -> Self {
        Self(i)
    }

    const fn get(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Kind {
    Leaf(Vec<Triangle3D>),
    Inner(Vec<NodeIdx>),
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) bbox: Aabb3D,
    pub(crate) kind: Kind,
}

impl Node {
    pub(crate) fn leaf(triangles: Vec<Triangle3D>) -> Self {
        let bbox = Aabb3D::from_triangles(&triangles);
        Self {
            bbox,
            kind: Kind::Leaf(triangles),
        }
    }

    pub(crate) const fn empty_leaf() -> Self {
        Self {
            bbox: Aabb3D::EMPTY,
            kind: Kind::Leaf(Vec::new()),
        }
    }

    pub(crate) const fn is_leaf(&self) -> bool {
        matches!(self.kind, Kind::Leaf(_))
    }

    /// Number of entries: triangles for a leaf, children for an inner node.
    pub(crate) fn len(&self) -> usize {
        match &self.kind {
            Kind::Leaf(triangles) => triangles.len(),
            Kind::Inner(children) => children.len(),
        }
    }

    pub(crate) fn children(&self) -> &[NodeIdx] {
        match &self.kind {
            Kind::Inner(children) => children,
            Kind::Leaf(_) => &[],
        }
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Arena {
    nodes: Vec<Node>,
    free_list: Vec<NodeIdx>,
}

impl Arena {
    pub(crate) fn alloc(&mut self, node: Node) -> NodeIdx {
        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx.get()] = node;
            idx
        } else {
            self.nodes.push(node);
            NodeIdx::new(self.nodes.len() - 1)
        }
    }

    /// Allocate an inner node over `children` with its bbox computed from them.
    pub(crate) fn alloc_inner(&mut self, children: Vec<NodeIdx>) -> NodeIdx {
        let bbox = self.bbox_of_children(&children);
        self.alloc(Node {
            bbox,
            kind: Kind::Inner(children),
        })
    }

    /// Return a single node's slot to the free list. Its children are left alone.
    pub(crate) fn release(&mut self, idx: NodeIdx) {
        self.nodes[idx.get()] = Node::empty_leaf();
        self.free_list.push(idx);
    }

    /// Return a node and everything below it to the free list.
    pub(crate) fn release_subtree(&mut self, idx: NodeIdx) {
        let mut stack = alloc::vec![idx];
        while let Some(i) = stack.pop() {
            stack.extend_from_slice(self.get(i).children());
            self.release(i);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
    }

    #[inline]
    pub(crate) fn get(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx.get()]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, idx: NodeIdx) -> &mut Node {
        &mut self.nodes[idx.get()]
    }

    #[inline]
    pub(crate) fn bbox(&self, idx: NodeIdx) -> Aabb3D {
        self.nodes[idx.get()].bbox
    }

    /// Number of live (not freed) nodes.
    pub(crate) fn live(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    pub(crate) fn bbox_of_children(&self, children: &[NodeIdx]) -> Aabb3D {
        children
            .iter()
            .fold(Aabb3D::EMPTY, |acc, c| acc.union(&self.bbox(*c)))
    }

    /// The bbox a node should have given its current contents.
    pub(crate) fn computed_bbox(&self, idx: NodeIdx) -> Aabb3D {
        match &self.get(idx).kind {
            Kind::Leaf(triangles) => Aabb3D::from_triangles(triangles),
            Kind::Inner(children) => self.bbox_of_children(children),
        }
    }

    /// Recompute a node's cached bbox from its contents.
    pub(crate) fn recompute_bbox(&mut self, idx: NodeIdx) {
        let bbox = self.computed_bbox(idx);
        self.get_mut(idx).bbox = bbox;
    }

    /// Append every triangle under `idx` to `out`, depth-first in child order.
    pub(crate) fn collect_triangles(&self, idx: NodeIdx, out: &mut Vec<Triangle3D>) {
        match &self.get(idx).kind {
            Kind::Leaf(triangles) => out.extend_from_slice(triangles),
            Kind::Inner(children) => {
                for c in children {
                    self.collect_triangles(*c, out);
                }
            }
        }
    }

    /// Number of levels from `idx` down to its leaves (a leaf has height 1).
    pub(crate) fn height(&self, idx: NodeIdx) -> usize {
        let mut h = 1;
        let mut cur = idx;
        while let Some(first) = self.get(cur).children().first() {
            cur = *first;
            h += 1;
        }
        h
    }
}

/// Read-only handle to a node of an [`RTree3D`](crate::RTree3D).
///
/// Obtained from [`RTree3D::root`](crate::RTree3D::root). A handle borrows the
/// tree, so it cannot outlive a mutation.
#[derive(Copy, Clone)]
pub struct NodeRef<'a> {
    arena: &'a Arena,
    idx: NodeIdx,
}

impl<'a> NodeRef<'a> {
    pub(crate) const fn new(arena: &'a Arena, idx: NodeIdx) -> Self {
        Self { arena, idx }
    }

    #[inline]
    fn node(&self) -> &'a Node {
        self.arena.get(self.idx)
    }

    /// Whether this node stores triangles rather than child nodes.
    pub fn is_leaf(&self) -> bool {
        self.node().is_leaf()
    }

    /// The cached bounding box of everything under this node.
    pub fn bbox(&self) -> Aabb3D {
        self.node().bbox
    }

    /// Number of entries (triangles for a leaf, children for an inner node).
    pub fn len(&self) -> usize {
        self.node().len()
    }

    /// Whether the node holds no entries. Only an empty tree's root can.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Triangles stored in this leaf. Empty for inner nodes.
    pub fn triangles(&self) -> &'a [Triangle3D] {
        match &self.node().kind {
            Kind::Leaf(triangles) => triangles,
            Kind::Inner(_) => &[],
        }
    }

    /// Children of this inner node in order. Empty for leaves.
    pub fn children(&self) -> impl ExactSizeIterator<Item = NodeRef<'a>> + 'a {
        let arena = self.arena;
        self.node()
            .children()
            .iter()
            .map(move |c| NodeRef::new(arena, *c))
    }

    /// Number of levels from this node down to its leaves.
    pub fn height(&self) -> usize {
        self.arena.height(self.idx)
    }
}

impl Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NodeRef")
            .field("is_leaf", &self.is_leaf())
            .field("len", &self.len())
            .field("bbox", &self.bbox())
            .finish_non_exhaustive()
    }
}
