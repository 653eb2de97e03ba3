//! Serial chains: the single path between two frames of a [`Chain`].
//!
//! A [`SerialChain`] resolves its path once at construction and then takes
//! joint values positionally, in the order of
//! [`SerialChain::joint_parameter_names`]. Poses and the Jacobian are
//! expressed in the root frame of the path.

use nalgebra::{Matrix6xX, Vector3};
use tracing::debug;

use crate::chain::{Chain, FrameId};
use crate::error::KinematicsError;
use crate::frame::JointType;
use crate::transform::Transform;

/// A movable joint on the path, expressed in the root frame.
#[derive(Debug, Clone, Copy)]
struct JointFrame {
    joint_type: JointType,
    origin: Vector3<f64>,
    axis: Vector3<f64>,
}

/// Linear path from a root frame down to an end frame.
#[derive(Debug, Clone)]
pub struct SerialChain {
    chain: Chain,
    root: FrameId,
    /// Frames strictly below `root`, ending with the end frame.
    path: Vec<FrameId>,
    joint_parameter_names: Vec<String>,
}

impl SerialChain {
    /// Resolve the path from `root_frame` (the chain root when `None`) to
    /// `end_frame`.
    ///
    /// # Errors
    ///
    /// - [`KinematicsError::FrameNotFound`] if either name is unknown.
    /// - [`KinematicsError::InvalidTopology`] if `end_frame` is not a
    ///   descendant of `root_frame` (different branches, or reversed).
    pub fn new(
        chain: Chain,
        end_frame: &str,
        root_frame: Option<&str>,
    ) -> Result<Self, KinematicsError> {
        let end = chain
            .frame_id(end_frame)
            .ok_or_else(|| KinematicsError::FrameNotFound(end_frame.into()))?;
        let root = match root_frame {
            Some(name) => chain
                .frame_id(name)
                .ok_or_else(|| KinematicsError::FrameNotFound(name.into()))?,
            None => chain.root(),
        };

        let mut path = Vec::new();
        let mut cursor = end;
        while cursor != root {
            path.push(cursor);
            cursor = chain
                .parent(cursor)
                .ok_or_else(|| KinematicsError::InvalidTopology {
                    root: chain.frame(root).name().to_owned(),
                    end: end_frame.to_owned(),
                })?;
        }
        path.reverse();

        let joint_parameter_names: Vec<String> = path
            .iter()
            .map(|&id| chain.frame(id).joint())
            .filter(|joint| joint.dof() > 0)
            .map(|joint| joint.name().to_owned())
            .collect();

        debug!(
            root = chain.frame(root).name(),
            end = end_frame,
            frames = path.len(),
            dof = joint_parameter_names.len(),
            "resolved serial chain"
        );

        Ok(Self {
            chain,
            root,
            path,
            joint_parameter_names,
        })
    }

    /// The underlying tree.
    pub const fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn into_chain(self) -> Chain {
        self.chain
    }

    pub fn root_frame_name(&self) -> &str {
        self.chain.frame(self.root).name()
    }

    pub fn end_frame_name(&self) -> &str {
        // The path is empty only when root and end coincide.
        self.path
            .last()
            .map_or_else(|| self.root_frame_name(), |&id| self.chain.frame(id).name())
    }

    /// Names of the frames on the path, root excluded, end included.
    pub fn frame_names(&self) -> Vec<&str> {
        self.path
            .iter()
            .map(|&id| self.chain.frame(id).name())
            .collect()
    }

    /// Movable joints along the path, root to end.
    pub fn joint_parameter_names(&self) -> &[String] {
        &self.joint_parameter_names
    }

    pub fn dof(&self) -> usize {
        self.joint_parameter_names.len()
    }

    fn check_len(&self, q: &[f64]) -> Result<(), KinematicsError> {
        if q.len() == self.dof() {
            Ok(())
        } else {
            Err(KinematicsError::DimensionMismatch {
                expected: self.dof(),
                got: q.len(),
            })
        }
    }

    /// Pose of each path frame relative to the root frame, aligned with
    /// [`frame_names`](Self::frame_names).
    pub fn forward_kinematics(&self, q: &[f64]) -> Result<Vec<Transform>, KinematicsError> {
        self.forward_kinematics_from(&Transform::identity(), q)
    }

    /// Like [`forward_kinematics`](Self::forward_kinematics) with the root
    /// frame placed at `world`.
    pub fn forward_kinematics_from(
        &self,
        world: &Transform,
        q: &[f64],
    ) -> Result<Vec<Transform>, KinematicsError> {
        self.check_len(q)?;
        let config = self.chain.config();
        let mut values = q.iter().copied();
        let mut current = *world;
        let mut poses = Vec::with_capacity(self.path.len());
        for (depth, &id) in (1..).zip(&self.path) {
            let frame = self.chain.frame(id);
            let value = if frame.joint().dof() > 0 {
                values.next().unwrap_or(0.0)
            } else {
                0.0
            };
            current = current.compose(&frame.local_transform(value));
            if config.renormalize_at(depth) {
                current = current.renormalized();
            }
            poses.push(current);
        }
        Ok(poses)
    }

    /// Pose of the end frame relative to the root frame.
    pub fn end_transform(&self, q: &[f64]) -> Result<Transform, KinematicsError> {
        let poses = self.forward_kinematics(q)?;
        Ok(poses.last().copied().unwrap_or_default())
    }

    /// Origins and axes of the movable joints plus the end position, all in
    /// the root frame.
    fn joint_frames(&self, q: &[f64]) -> (Vec<JointFrame>, Vector3<f64>) {
        let mut values = q.iter().copied();
        let mut current = Transform::identity();
        let mut frames = Vec::with_capacity(self.dof());
        for &id in &self.path {
            let frame = self.chain.frame(id);
            let joint = frame.joint();
            let joint_pose = current.compose(joint.offset());
            let value = if joint.dof() > 0 {
                frames.push(JointFrame {
                    joint_type: joint.joint_type(),
                    origin: *joint_pose.translation(),
                    axis: joint_pose.apply_vector(&joint.axis().into_inner()),
                });
                values.next().unwrap_or(0.0)
            } else {
                0.0
            };
            current = joint_pose
                .compose(&joint.motion(value))
                .compose(frame.link().offset())
                .renormalized();
        }
        (frames, *current.translation())
    }

    /// Geometric Jacobian of the end frame, 6 x dof: rows 0..3 are linear
    /// velocity, rows 3..6 angular velocity, both in the root frame.
    pub fn jacobian(&self, q: &[f64]) -> Result<Matrix6xX<f64>, KinematicsError> {
        self.check_len(q)?;
        let (frames, ee_pos) = self.joint_frames(q);
        let mut jacobian = Matrix6xX::zeros(frames.len());

        for (i, jf) in frames.iter().enumerate() {
            let z_i = &jf.axis;
            match jf.joint_type {
                JointType::Revolute => {
                    // Linear velocity: z_i x (ee_pos - o_i)
                    let cross = z_i.cross(&(ee_pos - jf.origin));
                    for r in 0..3 {
                        jacobian[(r, i)] = cross[r];
                        jacobian[(r + 3, i)] = z_i[r];
                    }
                }
                JointType::Prismatic => {
                    for r in 0..3 {
                        jacobian[(r, i)] = z_i[r];
                    }
                }
                JointType::Fixed => {}
            }
        }

        Ok(jacobian)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainBuilder;
    use crate::frame::{Joint, Link};
    use approx::assert_relative_eq;
    use std::collections::HashMap;
    use std::f64::consts::FRAC_PI_2;

    fn joint(name: &str, joint_type: JointType, axis: Vector3<f64>, xyz: [f64; 3]) -> Joint {
        let offset = Transform::from_translation(Vector3::from(xyz));
        Joint::new(name, joint_type, axis, offset).unwrap()
    }

    /// Planar arm with unit links plus a side branch:
    ///
    /// base ─ j1 ─ l1 ─ j2 ─ l2 ─ tip(fixed) ─ tool
    ///                 └ slide(prismatic x) ─ carriage
    fn planar_arm() -> Chain {
        let mut b = ChainBuilder::new(Link::named("base"));
        let root = b.root();
        let j1 = joint("j1", JointType::Revolute, Vector3::z(), [0.0; 3]);
        let l1 = b.add_child(root, j1, Link::named("l1")).unwrap();
        let j2 = joint("j2", JointType::Revolute, Vector3::z(), [1.0, 0.0, 0.0]);
        let l2 = b.add_child(l1, j2, Link::named("l2")).unwrap();
        let tip = joint("tip", JointType::Fixed, Vector3::z(), [1.0, 0.0, 0.0]);
        b.add_child(l2, tip, Link::named("tool")).unwrap();
        let slide = joint("slide", JointType::Prismatic, Vector3::x(), [0.0; 3]);
        b.add_child(l1, slide, Link::named("carriage")).unwrap();
        b.build().unwrap()
    }

    // -- construction --

    #[test]
    fn path_from_chain_root() {
        let serial = SerialChain::new(planar_arm(), "tool_frame", None).unwrap();
        assert_eq!(serial.frame_names(), vec!["l1_frame", "l2_frame", "tool_frame"]);
        assert_eq!(serial.joint_parameter_names(), ["j1", "j2"]);
        assert_eq!(serial.dof(), 2);
        assert_eq!(serial.root_frame_name(), "base_frame");
        assert_eq!(serial.end_frame_name(), "tool_frame");
    }

    #[test]
    fn path_from_inner_root() {
        let serial = SerialChain::new(planar_arm(), "tool_frame", Some("l1_frame")).unwrap();
        assert_eq!(serial.frame_names(), vec!["l2_frame", "tool_frame"]);
        assert_eq!(serial.joint_parameter_names(), ["j2"]);
    }

    #[test]
    fn names_follow_chain_order() {
        let chain = planar_arm();
        let expected: Vec<String> = chain
            .joint_parameter_names()
            .iter()
            .filter(|n| n.as_str() != "slide")
            .cloned()
            .collect();
        let serial = SerialChain::new(chain, "tool_frame", None).unwrap();
        assert_eq!(serial.joint_parameter_names(), expected.as_slice());
    }

    #[test]
    fn root_equals_end_is_empty_path() {
        let serial = SerialChain::new(planar_arm(), "l1_frame", Some("l1_frame")).unwrap();
        assert!(serial.frame_names().is_empty());
        assert_eq!(serial.dof(), 0);
        assert_eq!(serial.end_transform(&[]).unwrap(), Transform::identity());
        assert_eq!(serial.jacobian(&[]).unwrap().ncols(), 0);
    }

    #[test]
    fn unknown_end_frame() {
        let err = SerialChain::new(planar_arm(), "gripper_frame", None).unwrap_err();
        assert_eq!(err, KinematicsError::FrameNotFound("gripper_frame".into()));
    }

    #[test]
    fn unknown_root_frame() {
        let err = SerialChain::new(planar_arm(), "tool_frame", Some("world_frame")).unwrap_err();
        assert_eq!(err, KinematicsError::FrameNotFound("world_frame".into()));
    }

    #[test]
    fn different_branches_are_invalid() {
        let err = SerialChain::new(planar_arm(), "tool_frame", Some("carriage_frame")).unwrap_err();
        assert_eq!(
            err,
            KinematicsError::InvalidTopology {
                root: "carriage_frame".into(),
                end: "tool_frame".into()
            }
        );
    }

    #[test]
    fn reversed_endpoints_are_invalid() {
        let err = SerialChain::new(planar_arm(), "l1_frame", Some("tool_frame")).unwrap_err();
        assert!(matches!(err, KinematicsError::InvalidTopology { .. }));
    }

    // -- forward kinematics --

    #[test]
    fn fk_matches_planar_geometry() {
        let serial = SerialChain::new(planar_arm(), "tool_frame", None).unwrap();
        let ee = serial.end_transform(&[FRAC_PI_2, -FRAC_PI_2]).unwrap();
        assert_relative_eq!(*ee.translation(), Vector3::new(1.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn fk_matches_full_chain() {
        let chain = planar_arm();
        let full = chain.forward_kinematics(&HashMap::from([
            ("j1".to_owned(), 0.4),
            ("j2".to_owned(), 1.1),
        ]));
        let serial = SerialChain::new(chain, "tool_frame", None).unwrap();
        let poses = serial.forward_kinematics(&[0.4, 1.1]).unwrap();
        for (name, pose) in serial.frame_names().into_iter().zip(&poses) {
            assert_relative_eq!(*pose.translation(), *full[name].translation(), epsilon = 1e-12);
        }
    }

    #[test]
    fn fk_length_checked() {
        let serial = SerialChain::new(planar_arm(), "tool_frame", None).unwrap();
        let err = serial.forward_kinematics(&[0.0, 0.0, 0.0]).unwrap_err();
        assert_eq!(err, KinematicsError::DimensionMismatch { expected: 2, got: 3 });
    }

    #[test]
    fn fk_from_world() {
        let serial = SerialChain::new(planar_arm(), "tool_frame", None).unwrap();
        let world = Transform::from_translation(Vector3::new(0.0, 0.0, 2.0));
        let poses = serial.forward_kinematics_from(&world, &[0.0, 0.0]).unwrap();
        assert_relative_eq!(*poses[2].translation(), Vector3::new(2.0, 0.0, 2.0), epsilon = 1e-12);
    }

    // -- jacobian --

    #[test]
    fn jacobian_planar_two_link() {
        let serial = SerialChain::new(planar_arm(), "tool_frame", None).unwrap();
        let (q1, q2) = (0.3_f64, 0.5_f64);
        let j = serial.jacobian(&[q1, q2]).unwrap();
        assert_eq!(j.shape(), (6, 2));

        // Textbook planar 2R Jacobian with unit links.
        let s1 = q1.sin();
        let c1 = q1.cos();
        let s12 = (q1 + q2).sin();
        let c12 = (q1 + q2).cos();
        assert_relative_eq!(j[(0, 0)], -s1 - s12, epsilon = 1e-12);
        assert_relative_eq!(j[(1, 0)], c1 + c12, epsilon = 1e-12);
        assert_relative_eq!(j[(0, 1)], -s12, epsilon = 1e-12);
        assert_relative_eq!(j[(1, 1)], c12, epsilon = 1e-12);
        for col in 0..2 {
            assert_relative_eq!(j[(2, col)], 0.0, epsilon = 1e-12);
            assert_relative_eq!(j[(5, col)], 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn jacobian_prismatic_column() {
        let serial = SerialChain::new(planar_arm(), "carriage_frame", None).unwrap();
        assert_eq!(serial.joint_parameter_names(), ["j1", "slide"]);
        let j = serial.jacobian(&[FRAC_PI_2, 0.2]).unwrap();
        // Slide axis x, rotated a quarter turn by j1, points along +y.
        assert_relative_eq!(j[(0, 1)], 0.0, epsilon = 1e-12);
        assert_relative_eq!(j[(1, 1)], 1.0, epsilon = 1e-12);
        for r in 3..6 {
            assert_relative_eq!(j[(r, 1)], 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn jacobian_length_checked() {
        let serial = SerialChain::new(planar_arm(), "tool_frame", None).unwrap();
        assert!(serial.jacobian(&[0.0]).is_err());
    }
}
