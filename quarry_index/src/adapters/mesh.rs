// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Triangle mesh faces.
//!
//! Entities are face indices into a borrowed index buffer. Faces are bounded by
//! their vertices, projected by their centroid, and measured by the closest
//! point on the triangle.

use glam::DVec3;

use crate::adapter::Adapter;
use crate::config::Config;
use crate::index::SpatialIndex;
use crate::types::{Aabb3D, Axis, Ray, RayHit, max_t, min_t};

bitflags::bitflags! {
    /// Ray semantics for [`FaceIndex::ray_trace_faces`] and [`intersect_triangle`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct RayFlags: u8 {
        /// Ignore triangles whose front side (counter-clockwise winding) faces away from the ray.
        const CULL_BACK_FACES = 0b0000_0001;
        /// Treat the ray as the segment from `origin` to `origin + direction`.
        const SEGMENT         = 0b0000_0010;
    }
}

/// Borrowed triangle mesh adapter.
///
/// Optionally carries a soft-delete mask: faces flagged `true` stay indexed
/// but are skipped by distance queries.
#[derive(Copy, Clone, Debug)]
pub struct MeshFaces<'a> {
    vertices: &'a [DVec3],
    faces: &'a [[usize; 3]],
    deleted: Option<&'a [bool]>,
}

impl<'a> MeshFaces<'a> {
    /// Adapter over `faces`, each a triple of indices into `vertices`.
    pub const fn new(vertices: &'a [DVec3], faces: &'a [[usize; 3]]) -> Self {
        Self {
            vertices,
            faces,
            deleted: None,
        }
    }

    /// Hide faces whose entry in `deleted` is `true` from distance queries.
    pub const fn with_deleted(mut self, deleted: &'a [bool]) -> Self {
        self.deleted = Some(deleted);
        self
    }

    /// The three corners of face `face`.
    #[inline]
    pub fn triangle(&self, face: usize) -> [DVec3; 3] {
        let [a, b, c] = self.faces[face];
        [self.vertices[a], self.vertices[b], self.vertices[c]]
    }

    /// Number of faces.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

impl Adapter<usize> for MeshFaces<'_> {
    fn bounds(&self, face: &usize) -> Aabb3D {
        let [a, b, c] = self.triangle(*face);
        Aabb3D::from_corners(a.min(b).min(c), a.max(b).max(c))
    }

    fn distance_squared(&self, point: DVec3, face: &usize) -> f64 {
        let [a, b, c] = self.triangle(*face);
        closest_point_on_triangle(point, a, b, c).distance_squared(point)
    }

    fn position_in(&self, axis: Axis, face: &usize) -> f64 {
        let [a, b, c] = self.triangle(*face);
        let centroid = (axis.of(a) + axis.of(b) + axis.of(c)) / 3.0;
        // Rounding can push a centroid of equal coordinates just outside them.
        let lo = min_t(min_t(axis.of(a), axis.of(b)), axis.of(c));
        let hi = max_t(max_t(axis.of(a), axis.of(b)), axis.of(c));
        min_t(max_t(centroid, lo), hi)
    }

    fn can_return(&self, face: &usize) -> bool {
        self.deleted
            .and_then(|d| d.get(*face).copied())
            .is_none_or(|deleted| !deleted)
    }
}

/// Index over the faces of a triangle mesh.
pub type FaceIndex<'a> = SpatialIndex<usize, MeshFaces<'a>>;

impl<'a> FaceIndex<'a> {
    /// Index every face of the mesh.
    pub fn from_mesh(mesh: MeshFaces<'a>, config: Config) -> Self {
        let n = mesh.face_count();
        Self::new(mesh, config, 0..n)
    }

    /// Trace `ray` against the faces with Möller–Trumbore intersection.
    pub fn ray_trace_faces(&self, ray: &Ray, flags: RayFlags, max_range: f64) -> Option<RayHit<usize>> {
        let mesh = *self.adapter();
        self.ray_trace(
            ray,
            |face, r| {
                let [a, b, c] = mesh.triangle(*face);
                intersect_triangle(r, a, b, c, flags)
            },
            max_range,
        )
    }
}

const PARALLEL_EPSILON: f64 = 1e-12;

/// Ray parameter where `ray` crosses triangle `abc`, edges included.
pub fn intersect_triangle(ray: &Ray, a: DVec3, b: DVec3, c: DVec3, flags: RayFlags) -> Option<f64> {
    let e1 = b - a;
    let e2 = c - a;
    let p = ray.direction.cross(e2);
    let det = e1.dot(p);
    if flags.contains(RayFlags::CULL_BACK_FACES) {
        if det < PARALLEL_EPSILON {
            return None;
        }
    } else if det > -PARALLEL_EPSILON && det < PARALLEL_EPSILON {
        return None;
    }
    let inv = 1.0 / det;
    let s = ray.origin - a;
    let u = s.dot(p) * inv;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = ray.direction.dot(q) * inv;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv;
    if t < 0.0 || (flags.contains(RayFlags::SEGMENT) && t > 1.0) {
        return None;
    }
    Some(t)
}

/// Closest point to `p` on triangle `abc` (Voronoi region walk).
pub fn closest_point_on_triangle(p: DVec3, a: DVec3, b: DVec3, c: DVec3) -> DVec3 {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;
    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return a + ab * v;
    }

    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return a + ac * w;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * w;
    }

    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    a + ab * v + ac * w
}
