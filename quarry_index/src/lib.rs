// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quarry Index: an adaptive multi-way 3D spatial index over caller-defined entities.
//!
//! Quarry Index answers proximity questions about things it does not own.
//! The caller stores cheap entity handles and supplies an [`Adapter`] that
//! reports each entity's bounds, distance to a point, and a representative
//! coordinate per axis.
//!
//! - Nearest entity to a point within a radius, optionally ignoring one handle.
//! - The `k` nearest entities, closest first.
//! - All entities strictly within a radius of a point.
//! - All entities whose bounds touch a query box.
//! - First hit along a ray, with a caller-supplied exact hit test.
//! - Incremental add and remove, plus [`rebuild`](SpatialIndex::rebuild) after heavy churn.
//!
//! Each node splits its entities into up to `max_divisions` equal-width buckets
//! along the axis where their bounds are widest. Buckets never get narrower than
//! `min_cell_size`, and leaves that outgrow `max_leaf_population` subdivide on add.
//!
//! # Example
//!
//! ```rust
//! use quarry_index::{Config, DVec3, PointIndex, Points};
//!
//! let pts = [
//!     DVec3::new(0.0, 0.0, 0.0),
//!     DVec3::new(10.0, 0.0, 0.0),
//!     DVec3::new(0.0, 10.0, 0.0),
//!     DVec3::new(10.0, 10.0, 0.0),
//! ];
//! let idx = PointIndex::from_points(Points::new(&pts), Config::default());
//!
//! assert_eq!(idx.nearest_to(DVec3::new(9.0, 1.0, 0.0), f64::INFINITY, None), Some(1));
//! // Ignore the nearest handle to find the runner-up.
//! let second = idx.nearest_to(DVec3::new(9.0, 1.0, 0.0), f64::INFINITY, Some(1));
//! assert!(matches!(second, Some(0 | 3)));
//!
//! let mut near = idx.close_to(DVec3::new(5.0, 0.0, 0.0), 6.0);
//! near.sort_unstable();
//! assert_eq!(near, [0, 1]);
//! ```
//!
//! Your own entity types plug in through [`Adapter`]:
//!
//! ```rust
//! use quarry_index::{Aabb3D, Adapter, Axis, DVec3, Ray, SpatialIndex};
//!
//! struct Balls<'a>(&'a [(DVec3, f64)]);
//!
//! impl Adapter<usize> for Balls<'_> {
//!     fn bounds(&self, i: &usize) -> Aabb3D {
//!         let (c, r) = self.0[*i];
//!         Aabb3D::from_point(c).inflate(r)
//!     }
//!     fn distance_squared(&self, p: DVec3, i: &usize) -> f64 {
//!         let (c, r) = self.0[*i];
//!         let d = (c.distance(p) - r).max(0.0);
//!         d * d
//!     }
//!     fn position_in(&self, axis: Axis, i: &usize) -> f64 {
//!         axis.of(self.0[*i].0)
//!     }
//! }
//!
//! let balls = [(DVec3::new(0.0, 0.0, 5.0), 1.0), (DVec3::new(0.0, 0.0, 20.0), 3.0)];
//! let idx = SpatialIndex::with_defaults(Balls(&balls), 0..balls.len());
//!
//! // Hit-test the bounds with the built-in slab test.
//! let ray = Ray::new(DVec3::ZERO, DVec3::Z);
//! let hit = idx
//!     .ray_trace(&ray, |i, r| r.intersect_aabb(&idx.adapter().bounds(i)), f64::INFINITY)
//!     .unwrap();
//! assert_eq!((hit.entity, hit.t), (0, 4.0));
//! ```
//!
//! ## Adapters
//!
//! - [`MeshFaces`]: triangle faces of an indexed mesh, with Möller–Trumbore ray tracing.
//! - [`Points`]: a point cloud, with coincident-point lookups.
//! - [`PositionedAdapter`]: any [`Positioned`] type held by [`ByRef`].
//! - `Rects` (feature `kurbo_adapter`): `kurbo::Rect`s in a plane.
//!
//! ## Features
//!
//! - `std` (default): use the standard library math backend for glam.
//! - `libm`: use `libm` instead, for `no_std` targets.
//! - `tracing`: spans around bulk builds and events on subdivision.
//! - `kurbo_adapter`: the Kurbo rectangle adapter.
//!
//! ### Float semantics
//!
//! Coordinates are assumed finite. Debug builds assert that adapters keep
//! each projection within the entity's bounds. A query with a NaN radius or
//! range matches nothing.

#![no_std]

extern crate alloc;

pub mod adapter;
pub mod adapters;
pub mod config;
pub mod index;
mod node;
pub mod types;

pub use adapter::Adapter;
pub use adapters::mesh::{FaceIndex, MeshFaces, RayFlags, closest_point_on_triangle, intersect_triangle};
pub use adapters::points::{PointIndex, Points};
pub use adapters::positioned::{ByRef, Positioned, PositionedAdapter, PositionedIndex};
pub use config::{Config, ConfigError};
pub use index::SpatialIndex;
pub use node::TreeStats;
pub use types::{Aabb3D, Axis, Ray, RayHit};

#[cfg(feature = "kurbo_adapter")]
pub use adapters::kurbo::{RectIndex, Rects};

pub use glam::DVec3;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn four_point_scenario() {
        let pts = [
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(10.0, 0.0, 0.0),
            DVec3::new(0.0, 10.0, 0.0),
            DVec3::new(10.0, 10.0, 0.0),
        ];
        let mut idx = PointIndex::from_points(Points::new(&pts), Config::default());
        assert_eq!(idx.nearest_to(DVec3::new(1.0, 1.0, 0.0), f64::INFINITY, None), Some(0));
        assert_eq!(idx.nearest_to(DVec3::new(1.0, 1.0, 0.0), 1.0, None), None);

        let mut inside = idx.items_inside(&Aabb3D::new(-1.0, -1.0, -1.0, 10.0, 0.0, 1.0));
        inside.sort_unstable();
        assert_eq!(inside, [0, 1]);

        assert!(idx.remove(&0));
        assert!(matches!(
            idx.nearest_to(DVec3::new(1.0, 1.0, 0.0), f64::INFINITY, None),
            Some(1 | 2)
        ));
        idx.add(0);
        assert_eq!(idx.nearest_to(DVec3::new(1.0, 1.0, 0.0), f64::INFINITY, None), Some(0));
    }

    #[test]
    fn stats_track_shape() {
        let pts: Vec<DVec3> = (0..64)
            .map(|i| DVec3::new(f64::from(i % 4), f64::from((i / 4) % 4), f64::from(i / 16)))
            .collect();
        let idx = PointIndex::from_points(Points::new(&pts), Config::new(4, 1.0, 1).unwrap());
        let stats = idx.stats();
        assert_eq!(stats.stored, 64);
        assert!(stats.branches > 0);
        assert!(stats.leaves > 1);
        assert!(stats.max_depth >= 1);
    }
}
