// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter trait connecting caller entities to the index.

use glam::DVec3;

use crate::types::{Aabb3D, Axis};

/// Entity-type-specific geometry used by [`SpatialIndex`](crate::SpatialIndex).
///
/// The index stores entity handles `E` and calls back into the adapter for
/// every bounding, distance and placement decision. Implementations must keep
/// the reported geometry stable while an entity is indexed, and
/// [`position_in`](Adapter::position_in) should lie within the entity's bounds
/// on that axis. Violations are not detected in release builds; queries then
/// silently miss entities.
pub trait Adapter<E> {
    /// Axis-aligned bounds of `entity`.
    fn bounds(&self, entity: &E) -> Aabb3D;

    /// Squared Euclidean distance from `point` to `entity`.
    fn distance_squared(&self, point: DVec3, entity: &E) -> f64;

    /// A representative coordinate of `entity` along `axis`, used only to pick
    /// a bucket. It does not have to be the box center.
    fn position_in(&self, axis: Axis, entity: &E) -> f64;

    /// Whether `entity` may appear in distance query results.
    ///
    /// Returning `false` hides an entity from [`nearest_to`], [`nearest_k`] and
    /// [`close_to`] while it stays physically indexed (soft deletion).
    ///
    /// [`nearest_to`]: crate::SpatialIndex::nearest_to
    /// [`nearest_k`]: crate::SpatialIndex::nearest_k
    /// [`close_to`]: crate::SpatialIndex::close_to
    fn can_return(&self, entity: &E) -> bool {
        let _ = entity;
        true
    }
}

impl<E, A: Adapter<E> + ?Sized> Adapter<E> for &A {
    fn bounds(&self, entity: &E) -> Aabb3D {
        (**self).bounds(entity)
    }

    fn distance_squared(&self, point: DVec3, entity: &E) -> f64 {
        (**self).distance_squared(point, entity)
    }

    fn position_in(&self, axis: Axis, entity: &E) -> f64 {
        (**self).position_in(axis, entity)
    }

    fn can_return(&self, entity: &E) -> bool {
        (**self).can_return(entity)
    }
}
