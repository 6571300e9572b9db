// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use core::cmp::Ordering;

/// A point in 3D space.
///
/// Equality is exact floating-point comparison with no tolerance.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point3D {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
    /// Z coordinate.
    pub z: f32,
}

impl Point3D {
    /// Create a new point.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// The coordinate along `axis`.
    #[inline]
    pub const fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

impl From<[f32; 3]> for Point3D {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

/// A triangle given by three vertices.
///
/// Two triangles are equal when one is a cyclic rotation of the other:
/// `(a, b, c) == (b, c, a) == (c, a, b)`. Reflections such as `(a, c, b)`
/// are a different triangle. This is the identity used by
/// [`RTree3D::remove`](crate::RTree3D::remove) and
/// [`RTree3D::contains`](crate::RTree3D::contains).
#[derive(Copy, Clone, Debug, Default)]
pub struct Triangle3D {
    /// First vertex.
    pub a: Point3D,
    /// Second vertex.
    pub b: Point3D,
    /// Third vertex.
    pub c: Point3D,
}

impl Triangle3D {
    /// Create a new triangle from its vertices.
    pub const fn new(a: Point3D, b: Point3D, c: Point3D) -> Self {
        Self { a, b, c }
    }

    /// The vertices in stored order.
    pub const fn vertices(&self) -> [Point3D; 3] {
        [self.a, self.b, self.c]
    }

    /// Mean of the three vertices.
    pub fn centroid(&self) -> Point3D {
        Point3D::new(
            self.centroid_on(Axis::X),
            self.centroid_on(Axis::Y),
            self.centroid_on(Axis::Z),
        )
    }

    /// Centroid coordinate along a single axis (used for bulk-load ordering).
    #[inline]
    pub(crate) fn centroid_on(&self, axis: Axis) -> f32 {
        (self.a.get(axis) + self.b.get(axis) + self.c.get(axis)) / 3.0
    }

    /// The minimum bounding box of this triangle.
    #[inline]
    pub fn bbox(&self) -> Aabb3D {
        Aabb3D::from_triangle(self)
    }
}

impl PartialEq for Triangle3D {
    fn eq(&self, other: &Self) -> bool {
        (self.a == other.a && self.b == other.b && self.c == other.c)
            || (self.a == other.b && self.b == other.c && self.c == other.a)
            || (self.a == other.c && self.b == other.a && self.c == other.b)
    }
}

/// A coordinate axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The X axis.
    X,
    /// The Y axis.
    Y,
    /// The Z axis.
    Z,
}

impl Axis {
    /// All axes in order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];
}

/// Axis-aligned minimum bounding box (MBR) in 3D.
///
/// A non-empty box has `min <= max` on every axis. [`Aabb3D::EMPTY`] is the
/// identity for [`union`](Self::union) and the expand operations: it has
/// `min = +inf` and `max = -inf`, so expanding it by any geometry yields
/// exactly that geometry's bounds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3D {
    /// Minimum corner.
    pub min: Point3D,
    /// Maximum corner.
    pub max: Point3D,
}

impl Default for Aabb3D {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Aabb3D {
    /// The empty box, identity for union.
    pub const EMPTY: Self = Self {
        min: Point3D::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
        max: Point3D::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
    };

    /// Create a new box from min/max corners.
    pub const fn new(min: Point3D, max: Point3D) -> Self {
        Self { min, max }
    }

    /// The bounds of a single triangle.
    pub fn from_triangle(t: &Triangle3D) -> Self {
        Self {
            min: Point3D::new(
                min_t(min_t(t.a.x, t.b.x), t.c.x),
                min_t(min_t(t.a.y, t.b.y), t.c.y),
                min_t(min_t(t.a.z, t.b.z), t.c.z),
            ),
            max: Point3D::new(
                max_t(max_t(t.a.x, t.b.x), t.c.x),
                max_t(max_t(t.a.y, t.b.y), t.c.y),
                max_t(max_t(t.a.z, t.b.z), t.c.z),
            ),
        }
    }

    /// The bounds of every vertex of every triangle. Empty input yields [`Aabb3D::EMPTY`].
    pub fn from_triangles<'a>(triangles: impl IntoIterator<Item = &'a Triangle3D>) -> Self {
        triangles.into_iter().fold(Self::EMPTY, |mut acc, t| {
            acc.expand_to_include_triangle(t);
            acc
        })
    }

    /// The bounds of a set of points. Empty input yields [`Aabb3D::EMPTY`].
    pub fn from_points(points: impl IntoIterator<Item = Point3D>) -> Self {
        points.into_iter().fold(Self::EMPTY, |mut acc, p| {
            acc.expand_to_include_point(&p);
            acc
        })
    }

    /// Return true if the box is inverted on any axis (holds no point). Assumes no NaN.
    pub fn is_empty(&self) -> bool {
        lt(self.max.x, self.min.x) || lt(self.max.y, self.min.y) || lt(self.max.z, self.min.z)
    }

    /// Length of the box along `axis`, clamped at zero.
    #[inline]
    pub fn extent(&self, axis: Axis) -> f64 {
        max_t(
            f64::from(self.max.get(axis)) - f64::from(self.min.get(axis)),
            0.0,
        )
    }

    /// Product of the three extents, accumulated in `f64`.
    ///
    /// Flat boxes have volume zero; inverted (empty) boxes also report zero.
    #[inline]
    pub fn volume(&self) -> f64 {
        Axis::ALL.iter().map(|a| self.extent(*a)).product()
    }

    /// Center of the box.
    pub fn center(&self) -> Point3D {
        Point3D::new(
            0.5 * (self.min.x + self.max.x),
            0.5 * (self.min.y + self.max.y),
            0.5 * (self.min.z + self.max.z),
        )
    }

    /// The axis with the largest extent. Ties prefer X, then Y.
    pub fn longest_axis(&self) -> Axis {
        let dx = self.extent(Axis::X);
        let dy = self.extent(Axis::Y);
        let dz = self.extent(Axis::Z);
        if dx >= dy && dx >= dz {
            Axis::X
        } else if dy >= dz {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    /// The smallest box containing both `self` and `other`.
    #[inline]
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: Point3D::new(
                min_t(self.min.x, other.min.x),
                min_t(self.min.y, other.min.y),
                min_t(self.min.z, other.min.z),
            ),
            max: Point3D::new(
                max_t(self.max.x, other.max.x),
                max_t(self.max.y, other.max.y),
                max_t(self.max.z, other.max.z),
            ),
        }
    }

    /// How much `self` would grow in volume to also enclose `other`.
    #[inline]
    pub fn enlargement(&self, other: &Self) -> f64 {
        self.union(other).volume() - self.volume()
    }

    /// Grow in place to enclose another box.
    pub fn expand_to_include(&mut self, other: &Self) -> &mut Self {
        *self = self.union(other);
        self
    }

    /// Grow in place to enclose a triangle.
    pub fn expand_to_include_triangle(&mut self, t: &Triangle3D) -> &mut Self {
        self.expand_to_include_point(&t.a)
            .expand_to_include_point(&t.b)
            .expand_to_include_point(&t.c)
    }

    /// Grow in place to enclose a point.
    pub fn expand_to_include_point(&mut self, p: &Point3D) -> &mut Self {
        self.min.x = min_t(self.min.x, p.x);
        self.min.y = min_t(self.min.y, p.y);
        self.min.z = min_t(self.min.z, p.z);
        self.max.x = max_t(self.max.x, p.x);
        self.max.y = max_t(self.max.y, p.y);
        self.max.z = max_t(self.max.z, p.z);
        self
    }

    /// Whether the point lies inside the box (boundary inclusive).
    pub fn contains_point(&self, p: &Point3D) -> bool {
        le(self.min.x, p.x)
            && le(p.x, self.max.x)
            && le(self.min.y, p.y)
            && le(p.y, self.max.y)
            && le(self.min.z, p.z)
            && le(p.z, self.max.z)
    }

    /// Whether `other` lies entirely inside this box (boundary inclusive).
    pub fn contains(&self, other: &Self) -> bool {
        le(self.min.x, other.min.x)
            && le(other.max.x, self.max.x)
            && le(self.min.y, other.min.y)
            && le(other.max.y, self.max.y)
            && le(self.min.z, other.min.z)
            && le(other.max.z, self.max.z)
    }

    /// Closed-interval overlap test on all three axes.
    pub fn intersects(&self, other: &Self) -> bool {
        le(self.min.x, other.max.x)
            && le(other.min.x, self.max.x)
            && le(self.min.y, other.max.y)
            && le(other.min.y, self.max.y)
            && le(self.min.z, other.max.z)
            && le(other.min.z, self.max.z)
    }
}

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}

pub(crate) fn lt<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o == Ordering::Less)
        .unwrap_or(false)
}
