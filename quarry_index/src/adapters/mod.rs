// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ready-made adapters for common entity kinds.
//!
//! The Kurbo adapter is enabled via the `kurbo_adapter` feature to keep the
//! core small and `no_std` by default.

pub mod mesh;
pub mod points;
pub mod positioned;

#[cfg(feature = "kurbo_adapter")]
pub mod kurbo;
