// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Objects that know their own position.
//!
//! Entities are borrowed references compared by address, so two distinct
//! objects at the same place stay distinct.

use core::fmt::{self, Debug};
use core::ptr;

use glam::DVec3;

use crate::adapter::Adapter;
use crate::index::SpatialIndex;
use crate::types::{Aabb3D, Axis};

/// An object placed in space as a point or a ball.
pub trait Positioned {
    /// Center of the object.
    fn position(&self) -> DVec3;

    /// Radius of the ball around [`position`](Positioned::position) the object occupies.
    fn radius(&self) -> f64 {
        0.0
    }

    /// Whether distance queries may return the object.
    fn is_live(&self) -> bool {
        true
    }
}

/// A borrowed handle with address identity.
pub struct ByRef<'a, T>(pub &'a T);

impl<T> Clone for ByRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ByRef<'_, T> {}

impl<T> PartialEq for ByRef<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.0, other.0)
    }
}

impl<T> Eq for ByRef<'_, T> {}

impl<T: Debug> Debug for ByRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ByRef").field(self.0).finish()
    }
}

impl<T> core::ops::Deref for ByRef<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.0
    }
}

/// Adapter for any [`Positioned`] type held through [`ByRef`].
#[derive(Copy, Clone, Debug, Default)]
pub struct PositionedAdapter;

impl<'a, T: Positioned> Adapter<ByRef<'a, T>> for PositionedAdapter {
    fn bounds(&self, entity: &ByRef<'a, T>) -> Aabb3D {
        Aabb3D::from_point(entity.position()).inflate(entity.radius())
    }

    fn distance_squared(&self, point: DVec3, entity: &ByRef<'a, T>) -> f64 {
        let r = entity.radius();
        if r <= 0.0 {
            return entity.position().distance_squared(point);
        }
        let gap = entity.position().distance(point) - r;
        if gap <= 0.0 { 0.0 } else { gap * gap }
    }

    fn position_in(&self, axis: Axis, entity: &ByRef<'a, T>) -> f64 {
        axis.of(entity.position())
    }

    fn can_return(&self, entity: &ByRef<'a, T>) -> bool {
        entity.is_live()
    }
}

/// Index over borrowed positioned objects.
pub type PositionedIndex<'a, T> = SpatialIndex<ByRef<'a, T>, PositionedAdapter>;
