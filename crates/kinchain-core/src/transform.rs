//! Rigid-body transforms.
//!
//! A [`Transform`] is a rotation followed by a translation. Composition is
//! right-multiplication: `parent.compose(&local)` expresses `local` in the
//! frame `parent` is expressed in, so a world pose accumulates root-to-leaf
//! as `world = parent_world * local`.

use std::ops::Mul;

use nalgebra::{Isometry3, Matrix3, Point3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::KinematicsError;

/// A rigid-body pose: unit-quaternion rotation plus translation.
///
/// Deserialized rotations are renormalized; a zero or non-finite quaternion
/// is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTransform", into = "RawTransform")]
pub struct Transform(Isometry3<f64>);

/// Wire form of a [`Transform`], unchecked.
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
struct RawTransform(Isometry3<f64>);

impl TryFrom<RawTransform> for Transform {
    type Error = KinematicsError;

    fn try_from(raw: RawTransform) -> Result<Self, Self::Error> {
        let q = raw.0.rotation.into_inner();
        if !q.coords.iter().all(|c| c.is_finite()) {
            return Err(KinematicsError::InvalidRotation);
        }
        let rotation =
            UnitQuaternion::try_new(q, f64::EPSILON).ok_or(KinematicsError::InvalidRotation)?;
        Ok(Self(Isometry3::from_parts(raw.0.translation, rotation)))
    }
}

impl From<Transform> for RawTransform {
    fn from(t: Transform) -> Self {
        Self(t.0)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// The neutral element of composition.
    pub fn identity() -> Self {
        Self(Isometry3::identity())
    }

    /// Build from a rotation and a translation.
    pub fn new(rotation: UnitQuaternion<f64>, translation: Vector3<f64>) -> Self {
        Self(Isometry3::from_parts(Translation3::from(translation), rotation))
    }

    /// Pure translation.
    pub fn from_translation(translation: Vector3<f64>) -> Self {
        Self::new(UnitQuaternion::identity(), translation)
    }

    /// Pure rotation.
    pub fn from_rotation(rotation: UnitQuaternion<f64>) -> Self {
        Self::new(rotation, Vector3::zeros())
    }

    /// Build from a position and roll-pitch-yaw angles (extrinsic XYZ,
    /// i.e. `Rz(yaw) * Ry(pitch) * Rx(roll)`), the convention robot
    /// description formats use for origins.
    pub fn from_xyz_rpy(xyz: [f64; 3], rpy: [f64; 3]) -> Self {
        Self::new(
            UnitQuaternion::from_euler_angles(rpy[0], rpy[1], rpy[2]),
            Vector3::new(xyz[0], xyz[1], xyz[2]),
        )
    }

    /// The underlying isometry.
    pub const fn isometry(&self) -> &Isometry3<f64> {
        &self.0
    }

    pub const fn rotation(&self) -> &UnitQuaternion<f64> {
        &self.0.rotation
    }

    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        self.0.rotation.to_rotation_matrix().into_inner()
    }

    pub const fn translation(&self) -> &Vector3<f64> {
        &self.0.translation.vector
    }

    /// `self * local`: the pose of `local` expressed in `self`'s parent frame.
    #[must_use]
    pub fn compose(&self, local: &Self) -> Self {
        Self(self.0 * local.0)
    }

    /// The pose `t` such that `self.compose(&t)` is the identity.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self(self.0.inverse())
    }

    /// Rotate then translate a point.
    pub fn apply(&self, point: &Point3<f64>) -> Point3<f64> {
        self.0.transform_point(point)
    }

    /// Rotate a free vector (translation does not apply).
    pub fn apply_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.0.rotation * vector
    }

    /// Same pose with the rotation quaternion projected back onto the unit
    /// sphere, bounding drift from long products.
    #[must_use]
    pub fn renormalized(&self) -> Self {
        let q = UnitQuaternion::new_normalize(self.0.rotation.into_inner());
        Self(Isometry3::from_parts(self.0.translation, q))
    }
}

impl Mul for Transform {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.compose(&rhs)
    }
}

impl Mul<&Transform> for &Transform {
    type Output = Transform;

    fn mul(self, rhs: &Transform) -> Transform {
        self.compose(rhs)
    }
}

impl From<Isometry3<f64>> for Transform {
    fn from(iso: Isometry3<f64>) -> Self {
        Self(iso)
    }
}

impl From<Transform> for Isometry3<f64> {
    fn from(t: Transform) -> Self {
        t.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
