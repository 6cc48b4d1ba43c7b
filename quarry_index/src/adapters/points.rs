// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point clouds.
//!
//! Entities are indices into a borrowed slice of positions.

use alloc::vec::Vec;

use glam::DVec3;

use crate::adapter::Adapter;
use crate::config::Config;
use crate::index::SpatialIndex;
use crate::types::{Aabb3D, Axis};

/// Borrowed point cloud adapter.
#[derive(Copy, Clone, Debug)]
pub struct Points<'a> {
    points: &'a [DVec3],
}

impl<'a> Points<'a> {
    /// Adapter over `points`.
    pub const fn new(points: &'a [DVec3]) -> Self {
        Self { points }
    }

    /// The position of point `i`.
    #[inline]
    pub fn get(&self, i: usize) -> DVec3 {
        self.points[i]
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the cloud is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl Adapter<usize> for Points<'_> {
    fn bounds(&self, i: &usize) -> Aabb3D {
        Aabb3D::from_point(self.points[*i])
    }

    fn distance_squared(&self, point: DVec3, i: &usize) -> f64 {
        self.points[*i].distance_squared(point)
    }

    fn position_in(&self, axis: Axis, i: &usize) -> f64 {
        axis.of(self.points[*i])
    }
}

/// Index over a point cloud.
pub type PointIndex<'a> = SpatialIndex<usize, Points<'a>>;

impl<'a> PointIndex<'a> {
    /// Index every point of the cloud.
    pub fn from_points(points: Points<'a>, config: Config) -> Self {
        let n = points.len();
        Self::new(points, config, 0..n)
    }

    /// A point other than `ignore` lying strictly within `tolerance` of `point`.
    pub fn coincident(&self, point: DVec3, tolerance: f64, ignore: Option<usize>) -> Option<usize> {
        self.nearest_to(point, tolerance, ignore)
    }

    /// Every point lying strictly within `tolerance` of `point`, in ascending index order.
    pub fn coincident_all(&self, point: DVec3, tolerance: f64) -> Vec<usize> {
        let mut out = self.close_to(point, tolerance);
        out.sort_unstable();
        out
    }

    /// Groups of indexed points lying within `tolerance` of each other.
    ///
    /// Each point is reported in at most one group, seeded by the lowest
    /// unclaimed index. Groups of one are omitted.
    pub fn coincident_groups(&self, tolerance: f64) -> Vec<Vec<usize>> {
        let mut order: Vec<usize> = self.iter().collect();
        order.sort_unstable();
        let mut claimed = alloc::vec![false; self.adapter().len()];
        let mut groups = Vec::new();
        let mut near = Vec::new();
        for i in order {
            if claimed[i] {
                continue;
            }
            claimed[i] = true;
            near.clear();
            self.close_to_into(self.adapter().get(i), tolerance, &mut near);
            let mut group = Vec::new();
            group.push(i);
            for &j in &near {
                if !claimed[j] {
                    claimed[j] = true;
                    group.push(j);
                }
            }
            if group.len() > 1 {
                group.sort_unstable();
                groups.push(group);
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn coincident_ignores_self() {
        let pts = [
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(5.0, 5.0, 5.0),
            DVec3::new(5.0, 5.0, 5.0 + 1e-7),
            DVec3::new(9.0, 0.0, 0.0),
        ];
        let idx = PointIndex::from_points(Points::new(&pts), Config::default());
        assert_eq!(idx.coincident(pts[1], 1e-6, Some(1)), Some(2));
        assert_eq!(idx.coincident(pts[2], 1e-6, Some(2)), Some(1));
        assert_eq!(idx.coincident(pts[0], 1e-6, Some(0)), None);
        assert_eq!(idx.coincident(pts[3], 1e-6, None), Some(3));
        assert_eq!(idx.coincident_all(pts[2], 1e-6), vec![1, 2]);
        assert!(idx.coincident_all(DVec3::splat(20.0), 1.0).is_empty());
    }

    #[test]
    fn groups_cluster_duplicates() {
        let pts = [
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(3.0, 0.0, 0.0),
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(3.0, 0.0, 1e-9),
            DVec3::new(7.0, 7.0, 7.0),
            DVec3::new(0.0, 0.0, 0.0),
        ];
        let idx = PointIndex::from_points(Points::new(&pts), Config::new(3, 0.5, 1).unwrap());
        assert_eq!(idx.coincident_groups(1e-6), vec![vec![0, 2, 5], vec![1, 3]]);
        assert_eq!(idx.coincident_groups(1e-12).len(), 1);
    }

    #[test]
    fn groups_skip_removed_points() {
        let pts = [DVec3::ZERO, DVec3::ZERO, DVec3::X];
        let mut idx = PointIndex::from_points(Points::new(&pts), Config::default());
        assert!(idx.remove(&1));
        assert!(idx.coincident_groups(0.1).is_empty());
    }
}
