// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use core::cmp::Ordering;

use glam::DVec3;

/// A coordinate axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The x axis.
    X,
    /// The y axis.
    Y,
    /// The z axis.
    Z,
}

impl Axis {
    /// All axes, in split-priority order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// The component of `v` along this axis.
    #[inline]
    pub fn of(self, v: DVec3) -> f64 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
            Self::Z => v.z,
        }
    }
}

/// Axis-aligned bounding box in 3D.
///
/// Boxes are closed: a box touching another along a face, edge or corner
/// intersects it. A box with `min == max` on every axis is a point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3D {
    /// Minimum x
    pub min_x: f64,
    /// Minimum y
    pub min_y: f64,
    /// Minimum z
    pub min_z: f64,
    /// Maximum x
    pub max_x: f64,
    /// Maximum y
    pub max_y: f64,
    /// Maximum z
    pub max_z: f64,
}

impl Aabb3D {
    /// Create a new AABB from min/max values.
    pub const fn new(
        min_x: f64,
        min_y: f64,
        min_z: f64,
        max_x: f64,
        max_y: f64,
        max_z: f64,
    ) -> Self {
        Self {
            min_x,
            min_y,
            min_z,
            max_x,
            max_y,
            max_z,
        }
    }

    /// Create an AABB from its two corners.
    pub const fn from_corners(min: DVec3, max: DVec3) -> Self {
        Self::new(min.x, min.y, min.z, max.x, max.y, max.z)
    }

    /// A degenerate box covering a single point.
    pub const fn from_point(p: DVec3) -> Self {
        Self::from_corners(p, p)
    }

    /// The smallest box covering all `points`, or `None` if there are none.
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Option<Self> {
        let mut it = points.into_iter();
        let first = Self::from_point(it.next()?);
        Some(it.fold(first, |acc, p| acc.union(&Self::from_point(p))))
    }

    /// Minimum corner.
    pub const fn min_corner(&self) -> DVec3 {
        DVec3::new(self.min_x, self.min_y, self.min_z)
    }

    /// Maximum corner.
    pub const fn max_corner(&self) -> DVec3 {
        DVec3::new(self.max_x, self.max_y, self.max_z)
    }

    /// Minimum along `axis`.
    #[inline]
    pub fn min(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.min_x,
            Axis::Y => self.min_y,
            Axis::Z => self.min_z,
        }
    }

    /// Maximum along `axis`.
    #[inline]
    pub fn max(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.max_x,
            Axis::Y => self.max_y,
            Axis::Z => self.max_z,
        }
    }

    /// Length of the box along `axis`.
    #[inline]
    pub fn extent(&self, axis: Axis) -> f64 {
        self.max(axis) - self.min(axis)
    }

    /// The box covering both `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: min_t(self.min_x, other.min_x),
            min_y: min_t(self.min_y, other.min_y),
            min_z: min_t(self.min_z, other.min_z),
            max_x: max_t(self.max_x, other.max_x),
            max_y: max_t(self.max_y, other.max_y),
            max_z: max_t(self.max_z, other.max_z),
        }
    }

    /// Return true if the box is inverted on any axis. Assumes no NaN.
    pub fn is_empty(&self) -> bool {
        self.max_x < self.min_x || self.max_y < self.min_y || self.max_z < self.min_z
    }

    /// Whether the two boxes overlap. Inclusive on all six faces.
    pub fn intersects(&self, other: &Self) -> bool {
        le(self.min_x, other.max_x)
            && le(other.min_x, self.max_x)
            && le(self.min_y, other.max_y)
            && le(other.min_y, self.max_y)
            && le(self.min_z, other.max_z)
            && le(other.min_z, self.max_z)
    }

    /// Whether this AABB contains the point (boundary included).
    pub fn contains_point(&self, p: DVec3) -> bool {
        le(self.min_x, p.x)
            && le(p.x, self.max_x)
            && le(self.min_y, p.y)
            && le(p.y, self.max_y)
            && le(self.min_z, p.z)
            && le(p.z, self.max_z)
    }

    /// Squared distance from `p` to the closest point of the box; zero inside.
    pub fn distance_squared_to(&self, p: DVec3) -> f64 {
        let clamped = p.clamp(self.min_corner(), self.max_corner());
        clamped.distance_squared(p)
    }

    /// Grow the box by `margin` on every side.
    pub fn inflate(&self, margin: f64) -> Self {
        Self::from_corners(
            self.min_corner() - DVec3::splat(margin),
            self.max_corner() + DVec3::splat(margin),
        )
    }
}

/// A ray (or segment, depending on the hit test) with origin and direction.
///
/// The direction is not required to be normalized; ray parameters are in units
/// of `direction`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: DVec3,
    /// Direction; not necessarily unit length.
    pub direction: DVec3,
}

impl Ray {
    /// Create a ray.
    pub const fn new(origin: DVec3, direction: DVec3) -> Self {
        Self { origin, direction }
    }

    /// Point at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn point_at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Slab test against `aabb`. Returns the entry parameter (or zero when the
    /// origin is inside), `None` on a miss or when the box lies behind.
    ///
    /// Usable directly as a hit test for box-shaped entities.
    pub fn intersect_aabb(&self, aabb: &Aabb3D) -> Option<f64> {
        let mut t_near = f64::NEG_INFINITY;
        let mut t_far = f64::INFINITY;
        for axis in Axis::ALL {
            let o = axis.of(self.origin);
            let d = axis.of(self.direction);
            let (lo, hi) = (aabb.min(axis), aabb.max(axis));
            if d == 0.0 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let t1 = (lo - o) / d;
            let t2 = (hi - o) / d;
            let (a, b) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
            t_near = max_t(t_near, a);
            t_far = min_t(t_far, b);
            if t_near > t_far {
                return None;
            }
        }
        if t_far < 0.0 {
            return None;
        }
        Some(max_t(t_near, 0.0))
    }
}

/// A ray-trace result: the entity that was hit and the ray parameter.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit<E> {
    /// The entity hit.
    pub entity: E,
    /// Non-negative ray parameter of the hit.
    pub t: f64,
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

/// Floor to `isize` without `std` float intrinsics. Saturates at the `isize`
/// range; NaN maps to zero.
#[inline]
pub(crate) fn floor_to_isize(v: f64) -> isize {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Bucket indices are clamped right after; saturation is intended."
    )]
    let i = v as isize;
    if (i as f64) > v { i.saturating_sub(1) } else { i }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_boxes_intersect() {
        let a = Aabb3D::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0);
        let face = Aabb3D::new(1.0, 0.0, 0.0, 2.0, 1.0, 1.0);
        let corner = Aabb3D::new(1.0, 1.0, 1.0, 2.0, 2.0, 2.0);
        let apart = Aabb3D::new(1.0 + 1e-9, 0.0, 0.0, 2.0, 1.0, 1.0);
        assert!(a.intersects(&face));
        assert!(a.intersects(&corner));
        assert!(!a.intersects(&apart));
    }

    #[test]
    fn union_and_extent() {
        let a = Aabb3D::from_point(DVec3::new(1.0, 2.0, 3.0));
        let b = Aabb3D::from_point(DVec3::new(-1.0, 5.0, 3.0));
        let u = a.union(&b);
        assert_eq!(u, Aabb3D::new(-1.0, 2.0, 3.0, 1.0, 5.0, 3.0));
        assert_eq!(u.extent(Axis::X), 2.0);
        assert_eq!(u.extent(Axis::Y), 3.0);
        assert_eq!(u.extent(Axis::Z), 0.0);
    }

    #[test]
    fn distance_to_box() {
        let b = Aabb3D::new(0.0, 0.0, 0.0, 2.0, 2.0, 2.0);
        assert_eq!(b.distance_squared_to(DVec3::new(1.0, 1.0, 1.0)), 0.0);
        assert_eq!(b.distance_squared_to(DVec3::new(5.0, 1.0, 1.0)), 9.0);
        assert_eq!(b.distance_squared_to(DVec3::new(3.0, 3.0, 2.0)), 2.0);
    }

    #[test]
    fn contains_point_is_inclusive() {
        let b = Aabb3D::new(0.0, 0.0, 0.0, 2.0, 2.0, 2.0);
        assert!(b.contains_point(DVec3::new(1.0, 1.0, 1.0)));
        assert!(b.contains_point(DVec3::new(2.0, 0.0, 2.0)), "corners count");
        assert!(!b.contains_point(DVec3::new(2.0, 1.0, 2.5)));
        assert!(!b.contains_point(DVec3::new(-1e-12, 1.0, 1.0)));
    }

    #[test]
    fn ray_box_slab_test() {
        let cube = Aabb3D::new(-10.0, -10.0, -10.0, 10.0, 10.0, 10.0);
        let ray = Ray::new(DVec3::new(0.0, -30.0, 10.0), DVec3::Y);
        assert_eq!(ray.intersect_aabb(&cube), Some(20.0));
        let above = Ray::new(DVec3::new(0.0, -30.0, 30.0), DVec3::Y);
        assert_eq!(above.intersect_aabb(&cube), None);
        let away = Ray::new(DVec3::new(0.0, -30.0, 0.0), -DVec3::Y);
        assert_eq!(away.intersect_aabb(&cube), None);
        let inside = Ray::new(DVec3::ZERO, DVec3::X);
        assert_eq!(inside.intersect_aabb(&cube), Some(0.0));

        let t = ray.intersect_aabb(&cube).unwrap();
        let entry = ray.point_at(t);
        assert_eq!(entry, DVec3::new(0.0, -10.0, 10.0));
        assert!(cube.contains_point(entry), "entry point lies on the box");
        assert_eq!(ray.point_at(0.0), ray.origin);
    }

    #[test]
    fn floor_handles_negatives() {
        assert_eq!(floor_to_isize(2.5), 2);
        assert_eq!(floor_to_isize(-0.5), -1);
        assert_eq!(floor_to_isize(-2.0), -2);
        assert_eq!(floor_to_isize(f64::INFINITY), isize::MAX);
        assert_eq!(floor_to_isize(f64::NEG_INFINITY), isize::MIN);
        assert_eq!(floor_to_isize(f64::NAN), 0);
    }
}
