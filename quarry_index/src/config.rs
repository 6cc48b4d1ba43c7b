// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Index configuration and its validation errors.

/// Errors from [`Config::new`].
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A branch must be able to split into at least two buckets.
    #[error("max divisions must be at least 2, got {0}")]
    TooFewDivisions(usize),

    /// The minimum cell size must be positive and finite.
    #[error("min cell size must be positive and finite, got {0}")]
    InvalidCellSize(f64),

    /// A leaf must be allowed to hold at least one entity.
    #[error("max leaf population must be at least 1")]
    EmptyLeaf,
}

/// Fixed tuning for a [`SpatialIndex`](crate::SpatialIndex).
///
/// - `max_divisions`: upper bound on buckets per branch.
/// - `min_cell_size`: buckets are never narrower than this.
/// - `max_leaf_population`: a leaf that grows past this through
///   [`add`](crate::SpatialIndex::add) subdivides.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Config {
    max_divisions: usize,
    min_cell_size: f64,
    max_leaf_population: usize,
}

impl Config {
    /// Validate and create a configuration.
    pub fn new(
        max_divisions: usize,
        min_cell_size: f64,
        max_leaf_population: usize,
    ) -> Result<Self, ConfigError> {
        if max_divisions < 2 {
            return Err(ConfigError::TooFewDivisions(max_divisions));
        }
        if !(min_cell_size > 0.0 && min_cell_size.is_finite()) {
            return Err(ConfigError::InvalidCellSize(min_cell_size));
        }
        if max_leaf_population == 0 {
            return Err(ConfigError::EmptyLeaf);
        }
        Ok(Self {
            max_divisions,
            min_cell_size,
            max_leaf_population,
        })
    }

    /// Upper bound on buckets per branch.
    pub const fn max_divisions(&self) -> usize {
        self.max_divisions
    }

    /// Lower bound on bucket width.
    pub const fn min_cell_size(&self) -> f64 {
        self.min_cell_size
    }

    /// Leaf population that triggers subdivision on add.
    pub const fn max_leaf_population(&self) -> usize {
        self.max_leaf_population
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_divisions: 10,
            min_cell_size: 1.0,
            max_leaf_population: 4,
        }
    }
}
