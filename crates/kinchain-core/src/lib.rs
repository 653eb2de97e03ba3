//! Kinematic trees and forward kinematics.
//!
//! A [`Chain`] owns a tree of [`Frame`]s (a joint plus the link it carries)
//! and evaluates the world pose of every frame for a set of named joint
//! values. A [`SerialChain`] restricts a chain to the path between two frames
//! and adds positional joint values and the geometric Jacobian.
//!
//! # Architecture
//!
//! ```text
//! tree builder (URDF, ...) ──► ChainBuilder ──► Chain ──► SerialChain
//!                                                 │            │
//!                                          frame poses   end pose, Jacobian
//! ```
//!
//! Poses compose by right-multiplication: a frame's world pose is its
//! parent's world pose times `joint.offset * joint.motion(value) * link.offset`.

pub mod chain;
pub mod config;
pub mod error;
pub mod frame;
pub mod serial;
pub mod transform;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use chain::{Chain, ChainBuilder, FrameId};
pub use config::ChainConfig;
pub use error::{ConfigError, KinematicsError, NameKind};
pub use frame::{Frame, Geometry, Joint, JointType, Link, Visual, frame_name};
pub use serial::SerialChain;
pub use transform::Transform;
