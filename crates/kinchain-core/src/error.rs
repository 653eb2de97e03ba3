//! Error types for chain construction, evaluation, and configuration.

use std::fmt;

use thiserror::Error;

/// What kind of name collided during chain construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Link,
    Joint,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Link => "link",
            Self::Joint => "joint",
        })
    }
}

/// Errors raised while building or evaluating a kinematic chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KinematicsError {
    /// Two links or two joints share a name.
    #[error("duplicate {kind} name: {name}")]
    DuplicateName { kind: NameKind, name: String },

    /// A non-root frame was attached with an empty joint name.
    #[error("frame {frame} has an empty joint name")]
    EmptyJointName { frame: String },

    /// A referenced frame does not exist in the chain.
    #[error("frame not found: {0}")]
    FrameNotFound(String),

    /// No downward path leads from `root` to `end`.
    #[error("no serial path from {root} to {end}")]
    InvalidTopology { root: String, end: String },

    /// Unknown joint type tag.
    #[error("unsupported joint type: {0}")]
    UnsupportedType(String),

    /// A movable joint was given a zero-length axis.
    #[error("joint {joint} has a degenerate axis")]
    InvalidAxis { joint: String },

    /// A rotation quaternion with zero or non-finite norm.
    #[error("degenerate rotation quaternion")]
    InvalidRotation,

    /// Positional joint values do not match the chain's degrees of freedom.
    #[error("joint value count mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// A frame id that was not issued by this builder.
    #[error("unknown frame id: {0}")]
    UnknownFrameId(usize),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
