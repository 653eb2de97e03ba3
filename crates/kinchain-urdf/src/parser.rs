//! URDF parsing using `urdf-rs`.
//!
//! Converts a `urdf_rs::Robot` into a [`Chain`]: one frame per link, named
//! `<link>_frame`, attached below its parent link's frame by the joint that
//! names it as child. Children are attached in document order.

use std::collections::HashMap;
use std::path::Path;

use kinchain_core::{
    Chain, ChainBuilder, Geometry, Joint, JointType, KinematicsError, Link, NameKind, SerialChain,
    Transform, Visual, frame_name,
};
use nalgebra::Vector3;
use tracing::{debug, warn};

use crate::error::UrdfError;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse a URDF file from disk into a [`Chain`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<Chain, UrdfError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| UrdfError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_string(&content)
}

/// Parse a URDF XML string into a [`Chain`].
pub fn parse_string(xml: &str) -> Result<Chain, UrdfError> {
    let robot = urdf_rs::read_from_string(xml).map_err(|e| UrdfError::Parse(e.to_string()))?;
    build_chain(&robot)
}

/// Parse a URDF XML string and restrict it to the path from `root_link`
/// (the URDF root when `None`) to `end_link`.
pub fn build_serial_chain(
    xml: &str,
    end_link: &str,
    root_link: Option<&str>,
) -> Result<SerialChain, UrdfError> {
    let chain = parse_string(xml)?;
    let root = root_link.map(frame_name);
    Ok(SerialChain::new(chain, &frame_name(end_link), root.as_deref())?)
}

/// Build a [`Chain`] from an already parsed robot.
///
/// # Errors
///
/// Fails if a joint references an undeclared link, a link has two parent
/// joints, there is not exactly one root link, a joint or geometry type has
/// no counterpart, or names collide.
pub fn build_chain(robot: &urdf_rs::Robot) -> Result<Chain, UrdfError> {
    let mut links: HashMap<&str, &urdf_rs::Link> = HashMap::with_capacity(robot.links.len());
    for link in &robot.links {
        if links.insert(link.name.as_str(), link).is_some() {
            return Err(KinematicsError::DuplicateName {
                kind: NameKind::Link,
                name: link.name.clone(),
            }
            .into());
        }
    }

    let mut children: HashMap<&str, Vec<&urdf_rs::Joint>> = HashMap::new();
    let mut has_parent: HashMap<&str, &str> = HashMap::new();
    for joint in &robot.joints {
        for name in [&joint.parent.link, &joint.child.link] {
            if !links.contains_key(name.as_str()) {
                return Err(UrdfError::MissingLink(name.clone()));
            }
        }
        if has_parent
            .insert(joint.child.link.as_str(), joint.name.as_str())
            .is_some()
        {
            return Err(UrdfError::MultipleParents(joint.child.link.clone()));
        }
        children
            .entry(joint.parent.link.as_str())
            .or_default()
            .push(joint);
    }

    // Root link = the link that is never a child of any joint.
    let roots: Vec<&urdf_rs::Link> = robot
        .links
        .iter()
        .filter(|l| !has_parent.contains_key(l.name.as_str()))
        .collect();
    let root = match roots.as_slice() {
        [] => return Err(UrdfError::NoRootLink),
        [root] => *root,
        _ => {
            return Err(UrdfError::MultipleRootLinks(
                roots.iter().map(|l| l.name.clone()).collect(),
            ));
        }
    };
    debug!(robot = %robot.name, root = %root.name, "building chain from URDF");

    let mut builder = ChainBuilder::new(convert_link(root)?);
    let mut attached = 1;
    let mut stack = vec![(root.name.as_str(), builder.root())];
    while let Some((link_name, id)) = stack.pop() {
        for joint in children.get(link_name).into_iter().flatten() {
            let child = links[joint.child.link.as_str()];
            let child_id = builder.add_child(id, convert_joint(joint)?, convert_link(child)?)?;
            attached += 1;
            stack.push((child.name.as_str(), child_id));
        }
    }

    if attached < robot.links.len() {
        warn!(
            robot = %robot.name,
            unreachable = robot.links.len() - attached,
            "links not reachable from the root were dropped"
        );
    }

    Ok(builder.build()?)
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

fn convert_link(link: &urdf_rs::Link) -> Result<Link, UrdfError> {
    let mut visuals = link
        .visual
        .iter()
        .map(convert_visual)
        .collect::<Result<Vec<_>, _>>()?;
    if visuals.is_empty() {
        visuals.push(Visual::default());
    }
    // URDF links carry no origin of their own; the joint origin places them.
    Ok(Link::new(link.name.clone(), Transform::identity(), visuals))
}

fn convert_joint(joint: &urdf_rs::Joint) -> Result<Joint, UrdfError> {
    let offset = convert_pose(&joint.origin);
    let joint_type = match joint.joint_type {
        urdf_rs::JointType::Revolute | urdf_rs::JointType::Continuous => JointType::Revolute,
        urdf_rs::JointType::Prismatic => JointType::Prismatic,
        urdf_rs::JointType::Fixed => return Ok(Joint::fixed(joint.name.clone(), offset)),
        urdf_rs::JointType::Floating => {
            return Err(UrdfError::UnsupportedJointType("floating".into()));
        }
        urdf_rs::JointType::Planar => {
            return Err(UrdfError::UnsupportedJointType("planar".into()));
        }
        urdf_rs::JointType::Spherical => {
            return Err(UrdfError::UnsupportedJointType("spherical".into()));
        }
    };
    Ok(Joint::new(
        joint.name.clone(),
        joint_type,
        vec3(&joint.axis.xyz),
        offset,
    )?)
}

fn convert_pose(pose: &urdf_rs::Pose) -> Transform {
    let xyz: &[f64; 3] = &pose.xyz;
    let rpy: &[f64; 3] = &pose.rpy;
    Transform::from_xyz_rpy(*xyz, *rpy)
}

fn convert_visual(visual: &urdf_rs::Visual) -> Result<Visual, UrdfError> {
    Ok(Visual::new(
        convert_pose(&visual.origin),
        convert_geometry(&visual.geometry)?,
    ))
}

fn convert_geometry(geom: &urdf_rs::Geometry) -> Result<Geometry, UrdfError> {
    let geometry = match geom {
        urdf_rs::Geometry::Sphere { radius } => Geometry::Sphere { radius: *radius },
        urdf_rs::Geometry::Box { size } => Geometry::Box { size: array3(size) },
        urdf_rs::Geometry::Cylinder { radius, length } => Geometry::Cylinder {
            radius: *radius,
            length: *length,
        },
        urdf_rs::Geometry::Capsule { .. } => {
            return Err(UrdfError::UnsupportedGeometryType("capsule".into()));
        }
        urdf_rs::Geometry::Mesh { filename, scale } => Geometry::Mesh {
            filename: filename.clone(),
            scale: scale.as_ref().map_or([1.0, 1.0, 1.0], |s| array3(s)),
        },
    };
    Ok(geometry)
}

const fn array3(v: &[f64; 3]) -> [f64; 3] {
    *v
}

fn vec3(v: &[f64; 3]) -> Vector3<f64> {
    Vector3::new(v[0], v[1], v[2])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
