//! Shared test fixtures and utilities for kinchain crates.
//!
//! Provides deterministic RNG setup, random transform and joint-value
//! sampling, reference chains, and a finite-difference Jacobian.

pub mod fixtures;
pub mod numeric;
pub mod rng;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use fixtures::{branching_tree, six_dof_arm, two_link_planar};
pub use numeric::numerical_jacobian;
pub use rng::{random_joint_values, random_transform, seeded_rng};
