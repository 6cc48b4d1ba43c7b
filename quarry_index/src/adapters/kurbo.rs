// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kurbo rectangles lying in a plane of constant `z`.

use alloc::vec::Vec;

use ::kurbo::{Point, Rect};
use glam::DVec3;

use crate::adapter::Adapter;
use crate::config::Config;
use crate::index::SpatialIndex;
use crate::types::{Aabb3D, Axis};

/// Borrowed rectangle adapter; entities are indices into `rects`.
#[derive(Copy, Clone, Debug)]
pub struct Rects<'a> {
    rects: &'a [Rect],
    z: f64,
}

impl<'a> Rects<'a> {
    /// Adapter placing every rectangle at height `z`.
    pub const fn new(rects: &'a [Rect], z: f64) -> Self {
        Self { rects, z }
    }

    /// Rectangle `i` with non-negative width and height.
    #[inline]
    pub fn get(&self, i: usize) -> Rect {
        self.rects[i].abs()
    }
}

impl Adapter<usize> for Rects<'_> {
    fn bounds(&self, i: &usize) -> Aabb3D {
        let r = self.get(*i);
        Aabb3D::new(r.x0, r.y0, self.z, r.x1, r.y1, self.z)
    }

    fn distance_squared(&self, point: DVec3, i: &usize) -> f64 {
        let r = self.get(*i);
        let closest = DVec3::new(point.x.clamp(r.x0, r.x1), point.y.clamp(r.y0, r.y1), self.z);
        closest.distance_squared(point)
    }

    fn position_in(&self, axis: Axis, i: &usize) -> f64 {
        let c = self.get(*i).center();
        match axis {
            Axis::X => c.x,
            Axis::Y => c.y,
            Axis::Z => self.z,
        }
    }
}

/// Index over planar rectangles.
pub type RectIndex<'a> = SpatialIndex<usize, Rects<'a>>;

impl<'a> RectIndex<'a> {
    /// Index every rectangle.
    pub fn from_rects(rects: Rects<'a>, config: Config) -> Self {
        let n = rects.rects.len();
        Self::new(rects, config, 0..n)
    }

    /// Rectangles containing `pt`, edges included, in ascending index order.
    pub fn hit_point(&self, pt: Point) -> Vec<usize> {
        let z = self.adapter().z;
        let mut out = self.items_inside(&Aabb3D::new(pt.x, pt.y, z, pt.x, pt.y, z));
        out.sort_unstable();
        out
    }

    /// Rectangles overlapping `rect`, edges included, in ascending index order.
    pub fn overlapping(&self, rect: Rect) -> Vec<usize> {
        let r = rect.abs();
        let z = self.adapter().z;
        let mut out = self.items_inside(&Aabb3D::new(r.x0, r.y0, z, r.x1, r.y1, z));
        out.sort_unstable();
        out
    }
}
