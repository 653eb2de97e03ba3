//! Frame records: the joint/link pairs that make up a kinematic tree.
//!
//! These are plain value types. A tree builder (for example a robot
//! description parser) creates them once; forward kinematics only reads
//! them.

use std::str::FromStr;

use nalgebra::{Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::KinematicsError;
use crate::transform::Transform;

// ---------------------------------------------------------------------------
// JointType
// ---------------------------------------------------------------------------

/// Joint type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JointType {
    /// No relative motion between parent and child.
    Fixed,
    /// Rotation about a single axis.
    Revolute,
    /// Translation along a single axis.
    Prismatic,
}

impl JointType {
    /// Number of scalar values this joint accepts.
    pub const fn dof(self) -> usize {
        match self {
            Self::Fixed => 0,
            Self::Revolute | Self::Prismatic => 1,
        }
    }

    pub const fn is_movable(self) -> bool {
        self.dof() > 0
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Revolute => "revolute",
            Self::Prismatic => "prismatic",
        }
    }
}

impl FromStr for JointType {
    type Err = KinematicsError;

    /// `continuous` is a revolute joint without limits, which kinematics
    /// does not distinguish.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(Self::Fixed),
            "revolute" | "continuous" => Ok(Self::Revolute),
            "prismatic" => Ok(Self::Prismatic),
            other => Err(KinematicsError::UnsupportedType(other.into())),
        }
    }
}

// ---------------------------------------------------------------------------
// Joint
// ---------------------------------------------------------------------------

/// A joint attaching a link to its parent link.
///
/// Deserialization goes through [`Joint::new`], so the axis is normalized
/// and movable joints still reject a zero axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawJoint")]
pub struct Joint {
    name: String,
    joint_type: JointType,
    /// Unit axis in the joint frame. Meaningless for fixed joints.
    axis: Unit<Vector3<f64>>,
    /// Pose of the joint frame relative to the parent link frame.
    offset: Transform,
}

impl Joint {
    /// Create a joint. Movable joints need a non-zero axis; it is normalized.
    pub fn new(
        name: impl Into<String>,
        joint_type: JointType,
        axis: Vector3<f64>,
        offset: Transform,
    ) -> Result<Self, KinematicsError> {
        let name = name.into();
        let axis = match Unit::try_new(axis, f64::EPSILON) {
            Some(axis) => axis,
            None if joint_type.is_movable() => {
                return Err(KinematicsError::InvalidAxis { joint: name });
            }
            None => Vector3::z_axis(),
        };
        Ok(Self {
            name,
            joint_type,
            axis,
            offset,
        })
    }

    /// A fixed joint, which needs no axis.
    pub fn fixed(name: impl Into<String>, offset: Transform) -> Self {
        Self {
            name: name.into(),
            joint_type: JointType::Fixed,
            axis: Vector3::z_axis(),
            offset,
        }
    }

    /// The placeholder joint of a chain's root frame.
    pub fn root() -> Self {
        Self::fixed("", Transform::identity())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn joint_type(&self) -> JointType {
        self.joint_type
    }

    pub const fn axis(&self) -> &Unit<Vector3<f64>> {
        &self.axis
    }

    pub const fn offset(&self) -> &Transform {
        &self.offset
    }

    pub const fn dof(&self) -> usize {
        self.joint_type.dof()
    }

    /// Motion contributed by the joint at `value` (radians or meters).
    /// Fixed joints ignore the value.
    pub fn motion(&self, value: f64) -> Transform {
        match self.joint_type {
            JointType::Fixed => Transform::identity(),
            JointType::Revolute => {
                Transform::from_rotation(UnitQuaternion::from_axis_angle(&self.axis, value))
            }
            JointType::Prismatic => Transform::from_translation(self.axis.into_inner() * value),
        }
    }
}

impl Default for Joint {
    fn default() -> Self {
        Self::root()
    }
}

#[derive(Deserialize)]
struct RawJoint {
    name: String,
    joint_type: JointType,
    axis: Vector3<f64>,
    offset: Transform,
}

impl TryFrom<RawJoint> for Joint {
    type Error = KinematicsError;

    fn try_from(raw: RawJoint) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.joint_type, raw.axis, raw.offset)
    }
}

// ---------------------------------------------------------------------------
// Geometry / Visual
// ---------------------------------------------------------------------------

/// Shape of a visual element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Geometry {
    #[default]
    None,
    Mesh { filename: String, scale: [f64; 3] },
    Box { size: [f64; 3] },
    Cylinder { radius: f64, length: f64 },
    Sphere { radius: f64 },
}

/// A descriptive visual element of a link. Does not affect kinematics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Visual {
    /// Display pose relative to the link frame.
    pub offset: Transform,
    pub geometry: Geometry,
}

impl Visual {
    pub const fn new(offset: Transform, geometry: Geometry) -> Self {
        Self { offset, geometry }
    }
}

// ---------------------------------------------------------------------------
// Link
// ---------------------------------------------------------------------------

/// A rigid link attached by a joint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    name: String,
    /// Static pose of the link relative to its joint frame.
    offset: Transform,
    visuals: Vec<Visual>,
}

impl Link {
    pub fn new(name: impl Into<String>, offset: Transform, visuals: Vec<Visual>) -> Self {
        Self {
            name: name.into(),
            offset,
            visuals,
        }
    }

    /// A link with only a name (identity offset, no visuals).
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, Transform::identity(), Vec::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn offset(&self) -> &Transform {
        &self.offset
    }

    pub fn visuals(&self) -> &[Visual] {
        &self.visuals
    }
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// A node of the kinematic tree: a joint and the link it carries.
///
/// The frame name is always `<link name>_frame`. Topology (children) lives in
/// the owning [`Chain`](crate::Chain). A deserialized frame recomputes its
/// name from the link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawFrame")]
pub struct Frame {
    name: String,
    joint: Joint,
    link: Link,
}

impl Frame {
    pub fn new(joint: Joint, link: Link) -> Self {
        Self {
            name: frame_name(link.name()),
            joint,
            link,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn joint(&self) -> &Joint {
        &self.joint
    }

    pub const fn link(&self) -> &Link {
        &self.link
    }

    /// `joint.offset * joint.motion(value) * link.offset`.
    pub fn local_transform(&self, value: f64) -> Transform {
        self.joint
            .offset
            .compose(&self.joint.motion(value))
            .compose(&self.link.offset)
    }
}

#[derive(Deserialize)]
struct RawFrame {
    joint: Joint,
    link: Link,
}

impl From<RawFrame> for Frame {
    fn from(raw: RawFrame) -> Self {
        Self::new(raw.joint, raw.link)
    }
}

/// Frame name for a link.
pub fn frame_name(link_name: &str) -> String {
    format!("{link_name}_frame")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
