// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadratic split for overflowing nodes.
//!
//! The entries of an overflowing node (its own plus the one that did not fit)
//! are dealt into two groups:
//!
//! 1. **Seeds**: over all pairs, pick the pair whose combined box wastes the
//!    most volume, `volume(a ∪ b) - volume(a) - volume(b)`. Each seeds a group.
//! 2. **Next**: repeatedly pick the remaining entry whose enlargement cost
//!    differs most between the two groups and give it to the group that grows
//!    less. Equal growth goes to the smaller group.
//! 3. **Forced fill**: once a group can only reach `min_fill` by taking every
//!    remaining entry, it takes them all.
//!
//! All tie-breaks keep the first candidate in entry order. Cost is quadratic in
//! the entry count, which is always `max_children + 1`.

use alloc::vec::Vec;

use crate::types::Aabb3D;

/// One side of a split: its entries and their bounding box.
#[derive(Debug)]
pub(crate) struct Group<E> {
    pub(crate) entries: Vec<E>,
    pub(crate) bbox: Aabb3D,
}

impl<E> Group<E> {
    fn seeded(entry: E, bbox: Aabb3D) -> Self {
        Self {
            entries: alloc::vec![entry],
            bbox,
        }
    }

    fn push(&mut self, entry: E, bbox: &Aabb3D) {
        self.entries.push(entry);
        self.bbox.expand_to_include(bbox);
    }

    fn absorb(&mut self, rest: Vec<E>, bbox_of: &impl Fn(&E) -> Aabb3D) {
        for e in rest {
            let bb = bbox_of(&e);
            self.push(e, &bb);
        }
    }
}

/// Split `entries` (at least two) into two groups of at least `min_fill` each
/// when `entries.len() >= 2 * min_fill`.
///
/// The first group is meant to stay in the overflowing node, the second
/// becomes its new sibling.
pub(crate) fn quadratic_split<E>(
    mut entries: Vec<E>,
    min_fill: usize,
    bbox_of: impl Fn(&E) -> Aabb3D,
) -> (Group<E>, Group<E>) {
    debug_assert!(entries.len() >= 2, "split requires at least two entries");
    let (i, j) = pick_seeds(&entries, &bbox_of);
    // i < j, so removing j first keeps i valid.
    let second = entries.remove(j);
    let first = entries.remove(i);
    let (bb_first, bb_second) = (bbox_of(&first), bbox_of(&second));
    let mut a = Group::seeded(first, bb_first);
    let mut b = Group::seeded(second, bb_second);

    while !entries.is_empty() {
        let remaining = entries.len();
        if a.entries.len() + remaining <= min_fill {
            a.absorb(entries, &bbox_of);
            break;
        }
        if b.entries.len() + remaining <= min_fill {
            b.absorb(entries, &bbox_of);
            break;
        }

        let k = pick_next(&entries, &a.bbox, &b.bbox, &bbox_of);
        let next = entries.remove(k);
        let bb = bbox_of(&next);
        let d1 = a.bbox.enlargement(&bb);
        let d2 = b.bbox.enlargement(&bb);
        if d1 < d2 || (d1 == d2 && a.entries.len() < b.entries.len()) {
            a.push(next, &bb);
        } else {
            b.push(next, &bb);
        }
    }
    (a, b)
}

/// Indices `(i, j)`, `i < j`, of the pair with the largest wasted volume.
fn pick_seeds<E>(entries: &[E], bbox_of: &impl Fn(&E) -> Aabb3D) -> (usize, usize) {
    let boxes: Vec<Aabb3D> = entries.iter().map(bbox_of).collect();
    let mut best: Option<(f64, usize, usize)> = None;
    for i in 0..boxes.len() {
        for j in (i + 1)..boxes.len() {
            let waste = boxes[i].union(&boxes[j]).volume() - boxes[i].volume() - boxes[j].volume();
            if best.is_none_or(|(w, _, _)| waste > w) {
                best = Some((waste, i, j));
            }
        }
    }
    best.map(|(_, i, j)| (i, j)).unwrap_or((0, 1))
}

/// Index of the entry with the strongest preference for one group.
fn pick_next<E>(
    entries: &[E],
    a: &Aabb3D,
    b: &Aabb3D,
    bbox_of: &impl Fn(&E) -> Aabb3D,
) -> usize {
    let mut best: Option<(f64, usize)> = None;
    for (k, e) in entries.iter().enumerate() {
        let bb = bbox_of(e);
        let d1 = a.enlargement(&bb);
        let d2 = b.enlargement(&bb);
        let diff = if d1 > d2 { d1 - d2 } else { d2 - d1 };
        if best.is_none_or(|(d, _)| diff > d) {
            best = Some((diff, k));
        }
    }
    best.map(|(_, k)| k).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point3D;
    use alloc::vec;

    fn cube(x: f32, y: f32, z: f32, s: f32) -> Aabb3D {
        Aabb3D::new(Point3D::new(x, y, z), Point3D::new(x + s, y + s, z + s))
    }

    fn ids<E: Copy>(g: &Group<E>) -> Vec<E> {
        g.entries.clone()
    }

    #[test]
    fn seeds_are_the_most_wasteful_pair() {
        let boxes = [
            cube(0.0, 0.0, 0.0, 1.0),
            cube(1.0, 0.0, 0.0, 1.0),
            cube(20.0, 20.0, 20.0, 1.0),
            cube(0.5, 0.5, 0.5, 1.0),
        ];
        let idx: Vec<usize> = (0..boxes.len()).collect();
        let (i, j) = pick_seeds(&idx, &|k: &usize| boxes[*k]);
        // Box 2 is far from everything; its partner is whichever maximizes the
        // union, the first such in order being box 0.
        assert_eq!((i, j), (0, 2));
    }

    #[test]
    fn seeds_use_true_maximum_for_overlapping_entries() {
        // Every pair has negative waste; the least negative one must still win.
        let boxes = [
            cube(0.0, 0.0, 0.0, 4.0),
            cube(0.0, 0.0, 0.0, 4.0),
            cube(0.0, 0.0, 0.0, 1.0),
        ];
        let idx: Vec<usize> = (0..boxes.len()).collect();
        let (i, j) = pick_seeds(&idx, &|k: &usize| boxes[*k]);
        assert_eq!((i, j), (0, 2));
    }

    #[test]
    fn split_separates_two_clusters() {
        let boxes = [
            cube(0.0, 0.0, 0.0, 1.0),
            cube(100.0, 0.0, 0.0, 1.0),
            cube(1.0, 1.0, 1.0, 1.0),
            cube(101.0, 1.0, 1.0, 1.0),
        ];
        let (a, b) = quadratic_split(vec![0_usize, 1, 2, 3], 1, |k| boxes[*k]);
        let mut left = ids(&a);
        let mut right = ids(&b);
        left.sort_unstable();
        right.sort_unstable();
        assert_eq!(left, vec![0, 2]);
        assert_eq!(right, vec![1, 3]);
        assert_eq!(a.bbox, boxes[0].union(&boxes[2]));
        assert_eq!(b.bbox, boxes[1].union(&boxes[3]));
    }

    #[test]
    fn forced_fill_honors_min() {
        // One far outlier and four tightly clustered boxes: without forced fill
        // the outlier's group would stay at size one.
        let boxes = [
            cube(0.0, 0.0, 0.0, 1.0),
            cube(0.1, 0.0, 0.0, 1.0),
            cube(0.2, 0.0, 0.0, 1.0),
            cube(0.3, 0.0, 0.0, 1.0),
            cube(500.0, 500.0, 500.0, 1.0),
        ];
        let (a, b) = quadratic_split(vec![0_usize, 1, 2, 3, 4], 2, |k| boxes[*k]);
        assert!(a.entries.len() >= 2, "first group underfull: {:?}", a.entries);
        assert!(b.entries.len() >= 2, "second group underfull: {:?}", b.entries);
        assert_eq!(a.entries.len() + b.entries.len(), 5);
    }

    #[test]
    fn flat_entries_balance_by_group_size() {
        // All volumes are zero, so every comparison ties and assignment
        // alternates toward the smaller group.
        let flat = |x: f32| Aabb3D::new(Point3D::new(x, 0.0, 0.0), Point3D::new(x + 1.0, 1.0, 0.0));
        let entries: Vec<f32> = vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0];
        let (a, b) = quadratic_split(entries, 1, |x| flat(*x));
        assert_eq!(a.entries.len(), 3);
        assert_eq!(b.entries.len(), 3);
        assert_eq!(a.entries[0], 0.0, "first seed is the first pair");
        assert_eq!(b.entries[0], 2.0);
    }
}
