//! URDF front end for kinchain.
//!
//! Parses URDF XML with `urdf-rs` and builds a [`Chain`](kinchain_core::Chain)
//! whose frames are named after their links (`<link>_frame`). Revolute and
//! continuous joints become revolute frames, prismatic and fixed joints map
//! directly; floating, planar, and spherical joints are rejected, as is
//! capsule geometry.

pub mod error;
pub mod parser;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use error::UrdfError;
pub use parser::{build_chain, build_serial_chain, parse_file, parse_string};
