//! Reference chains built directly with [`ChainBuilder`].

use kinchain_core::{Chain, ChainBuilder, FrameId, Joint, JointType, Link, Transform};
use nalgebra::Vector3;

fn attach(builder: &mut ChainBuilder, parent: FrameId, joint: Joint, link: &str) -> FrameId {
    builder
        .add_child(parent, joint, Link::named(link))
        .expect("fixture frames are valid")
}

fn movable(
    name: &str,
    joint_type: JointType,
    axis: Vector3<f64>,
    xyz: [f64; 3],
    rpy: [f64; 3],
) -> Joint {
    Joint::new(name, joint_type, axis, Transform::from_xyz_rpy(xyz, rpy))
        .expect("fixture axes are non-zero")
}

/// Link `a` at the origin, a revolute joint about Z at `a`, and link `b`
/// offset one unit along X from the joint.
pub fn two_link_planar() -> Chain {
    let mut b = ChainBuilder::new(Link::named("a"));
    let root = b.root();
    let joint = movable(
        "joint",
        JointType::Revolute,
        Vector3::z(),
        [0.0; 3],
        [0.0; 3],
    );
    let link_b = Link::new(
        "b",
        Transform::from_translation(Vector3::new(1.0, 0.0, 0.0)),
        Vec::new(),
    );
    b.add_child(root, joint, link_b)
        .expect("fixture frames are valid");
    b.build().expect("fixture names are unique")
}

/// Six revolute joints (yaw, pitch, pitch, roll, pitch, roll) stacked along
/// Z, followed by a fixed tool frame. Total height at rest is 1.01.
pub fn six_dof_arm() -> Chain {
    let mut b = ChainBuilder::new(Link::named("base"));
    let root = b.root();
    let z = Vector3::z();
    let y = Vector3::y();
    let rev = JointType::Revolute;

    let j1 = movable("j1_base_yaw", rev, z, [0.0, 0.0, 0.05], [0.0; 3]);
    let shoulder = attach(&mut b, root, j1, "shoulder_link");
    let j2 = movable("j2_shoulder_pitch", rev, y, [0.0, 0.0, 0.2], [0.0; 3]);
    let upper = attach(&mut b, shoulder, j2, "upper_arm");
    let j3 = movable("j3_elbow_pitch", rev, y, [0.0, 0.0, 0.3], [0.0; 3]);
    let elbow = attach(&mut b, upper, j3, "elbow_link");
    let j4 = movable("j4_forearm_roll", rev, z, [0.0, 0.0, 0.1], [0.0; 3]);
    let fore = attach(&mut b, elbow, j4, "forearm");
    let j5 = movable("j5_wrist_pitch", rev, y, [0.0, 0.0, 0.2], [0.0; 3]);
    let wrist = attach(&mut b, fore, j5, "wrist_link");
    let j6 = movable("j6_wrist_roll", rev, z, [0.0, 0.0, 0.06], [0.0; 3]);
    let ee = attach(&mut b, wrist, j6, "end_effector");

    let tool = Joint::fixed(
        "tool_fixed",
        Transform::from_translation(Vector3::new(0.0, 0.0, 0.1)),
    );
    attach(&mut b, ee, tool, "tool");
    b.build().expect("fixture names are unique")
}

/// A torso with two arms and a head. The right arm carries a prismatic
/// joint; several offsets are rotated and the head link has its own offset.
///
/// ```text
/// torso ─ l_shoulder ─ l_upper ─ l_elbow ─ l_fore ─ l_wrist(fixed) ─ l_hand
///       ├ r_shoulder ─ r_upper ─ r_lift(prismatic) ─ r_fore ─ r_wrist(fixed) ─ r_hand
///       └ neck ─ head
/// ```
pub fn branching_tree() -> Chain {
    let mut b = ChainBuilder::new(Link::named("torso"));
    let root = b.root();
    let rev = JointType::Revolute;

    let l_shoulder = movable(
        "l_shoulder",
        rev,
        Vector3::y(),
        [0.0, 0.2, 0.5],
        [0.3, 0.0, 0.0],
    );
    let l_upper = attach(&mut b, root, l_shoulder, "l_upper");
    let l_elbow = movable(
        "l_elbow",
        rev,
        Vector3::x(),
        [0.0, 0.0, -0.3],
        [0.0, 0.0, 0.2],
    );
    let l_fore = attach(&mut b, l_upper, l_elbow, "l_fore");
    let l_wrist = Joint::fixed(
        "l_wrist",
        Transform::from_xyz_rpy([0.0, 0.0, -0.25], [0.0, 0.1, 0.0]),
    );
    attach(&mut b, l_fore, l_wrist, "l_hand");

    let r_shoulder = movable(
        "r_shoulder",
        rev,
        Vector3::y(),
        [0.0, -0.2, 0.5],
        [-0.3, 0.0, 0.0],
    );
    let r_upper = attach(&mut b, root, r_shoulder, "r_upper");
    let r_lift = movable(
        "r_lift",
        JointType::Prismatic,
        Vector3::new(0.0, 0.0, -1.0),
        [0.0, 0.0, -0.3],
        [0.0, 0.4, 0.1],
    );
    let r_fore = attach(&mut b, r_upper, r_lift, "r_fore");
    let r_wrist = Joint::fixed(
        "r_wrist",
        Transform::from_translation(Vector3::new(0.1, 0.0, -0.2)),
    );
    attach(&mut b, r_fore, r_wrist, "r_hand");

    let neck = movable("neck", rev, Vector3::z(), [0.0, 0.0, 0.6], [0.0; 3]);
    let head = Link::new(
        "head",
        Transform::from_xyz_rpy([0.05, 0.0, 0.1], [0.0, -0.2, 0.0]),
        Vec::new(),
    );
    b.add_child(root, neck, head)
        .expect("fixture frames are valid");

    b.build().expect("fixture names are unique")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_dofs() {
        assert_eq!(two_link_planar().dof(), 1);
        assert_eq!(six_dof_arm().dof(), 6);
        assert_eq!(branching_tree().dof(), 5);
    }

    #[test]
    fn branching_tree_parameter_order() {
        let chain = branching_tree();
        assert_eq!(
            chain.joint_parameter_names(),
            ["l_shoulder", "l_elbow", "r_shoulder", "r_lift", "neck"]
        );
    }
}
