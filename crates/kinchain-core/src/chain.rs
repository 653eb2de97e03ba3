//! The full kinematic tree and its forward kinematics.
//!
//! Frames live in an arena owned by the [`Chain`]; a node stores the ids of
//! its children in attachment order. [`ChainBuilder`] collects frames and
//! [`ChainBuilder::build`] validates names and fixes the pre-order traversal
//! used by every evaluation. After that the chain is read-only and can be
//! shared across threads.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use crate::config::ChainConfig;
use crate::error::{KinematicsError, NameKind};
use crate::frame::{Frame, Joint, Link};
use crate::transform::Transform;

/// Index of a frame inside a chain's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(usize);

impl FrameId {
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Node {
    frame: Frame,
    parent: Option<FrameId>,
    children: Vec<FrameId>,
    depth: u32,
}

// ---------------------------------------------------------------------------
// ChainBuilder
// ---------------------------------------------------------------------------

/// Incremental constructor for a [`Chain`].
#[derive(Debug, Clone)]
pub struct ChainBuilder {
    nodes: Vec<Node>,
    config: ChainConfig,
}

impl ChainBuilder {
    /// Start a tree whose root frame carries `root_link` and the placeholder
    /// root joint.
    pub fn new(root_link: Link) -> Self {
        Self {
            nodes: vec![Node {
                frame: Frame::new(Joint::root(), root_link),
                parent: None,
                children: Vec::new(),
                depth: 0,
            }],
            config: ChainConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ChainConfig) -> Self {
        self.config = config;
        self
    }

    /// Id of the root frame.
    pub const fn root(&self) -> FrameId {
        FrameId(0)
    }

    /// Attach a new frame below `parent`. Children keep the order they were
    /// added in.
    pub fn add_child(
        &mut self,
        parent: FrameId,
        joint: Joint,
        link: Link,
    ) -> Result<FrameId, KinematicsError> {
        let frame = Frame::new(joint, link);
        if frame.joint().name().is_empty() {
            return Err(KinematicsError::EmptyJointName {
                frame: frame.name().to_owned(),
            });
        }
        let depth = self
            .nodes
            .get(parent.0)
            .ok_or(KinematicsError::UnknownFrameId(parent.0))?
            .depth
            + 1;

        let id = FrameId(self.nodes.len());
        self.nodes.push(Node {
            frame,
            parent: Some(parent),
            children: Vec::new(),
            depth,
        });
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// Validate names and index the tree.
    ///
    /// # Errors
    ///
    /// [`KinematicsError::DuplicateName`] if two links or two joints share a
    /// name.
    pub fn build(self) -> Result<Chain, KinematicsError> {
        let Self { nodes, config } = self;

        let mut order = Vec::with_capacity(nodes.len());
        let mut stack = vec![FrameId(0)];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(nodes[id.0].children.iter().rev().copied());
        }

        let mut frame_index = HashMap::with_capacity(nodes.len());
        let mut link_index = HashMap::with_capacity(nodes.len());
        let mut joint_index = HashMap::with_capacity(nodes.len());
        let mut joint_parameter_names = Vec::new();

        for &id in &order {
            let frame = &nodes[id.0].frame;
            insert_unique(&mut link_index, frame.link().name(), id, NameKind::Link)?;
            // Frame names derive from link names, so they are unique once links are.
            frame_index.insert(frame.name().to_owned(), id);
            if id != FrameId(0) {
                insert_unique(&mut joint_index, frame.joint().name(), id, NameKind::Joint)?;
                if frame.joint().dof() > 0 {
                    joint_parameter_names.push(frame.joint().name().to_owned());
                }
            }
        }

        debug!(
            frames = nodes.len(),
            dof = joint_parameter_names.len(),
            root = nodes[0].frame.name(),
            "built kinematic chain"
        );

        Ok(Chain {
            nodes,
            order,
            frame_index,
            link_index,
            joint_index,
            joint_parameter_names,
            config,
        })
    }
}

fn insert_unique(
    index: &mut HashMap<String, FrameId>,
    name: &str,
    id: FrameId,
    kind: NameKind,
) -> Result<(), KinematicsError> {
    if index.insert(name.to_owned(), id).is_some() {
        return Err(KinematicsError::DuplicateName {
            kind,
            name: name.to_owned(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Chain
// ---------------------------------------------------------------------------

/// A kinematic tree rooted at a base frame.
#[derive(Debug, Clone)]
pub struct Chain {
    nodes: Vec<Node>,
    /// Pre-order traversal, children in attachment order.
    order: Vec<FrameId>,
    frame_index: HashMap<String, FrameId>,
    link_index: HashMap<String, FrameId>,
    /// Joint name -> owning frame, excluding the root placeholder.
    joint_index: HashMap<String, FrameId>,
    joint_parameter_names: Vec<String>,
    config: ChainConfig,
}

impl Chain {
    pub const fn root(&self) -> FrameId {
        FrameId(0)
    }

    /// Number of frames in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a chain has at least its root frame.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub const fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Names of the joints that take a value, in pre-order.
    pub fn joint_parameter_names(&self) -> &[String] {
        &self.joint_parameter_names
    }

    /// Number of degrees of freedom.
    pub fn dof(&self) -> usize {
        self.joint_parameter_names.len()
    }

    /// All joint names including fixed joints, in pre-order. The root
    /// placeholder is not included.
    pub fn all_joint_names(&self) -> Vec<&str> {
        self.order
            .iter()
            .skip(1)
            .map(|&id| self.nodes[id.0].frame.joint().name())
            .collect()
    }

    /// Frame names in pre-order.
    pub fn frame_names(&self) -> Vec<&str> {
        self.order
            .iter()
            .map(|&id| self.nodes[id.0].frame.name())
            .collect()
    }

    /// Frames in pre-order.
    pub fn frames(&self) -> impl Iterator<Item = (FrameId, &Frame)> {
        self.order.iter().map(|&id| (id, &self.nodes[id.0].frame))
    }

    /// Look up a frame by its id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued for a different chain and is out of range.
    pub fn frame(&self, id: FrameId) -> &Frame {
        &self.nodes[id.0].frame
    }

    pub fn frame_id(&self, name: &str) -> Option<FrameId> {
        self.frame_index.get(name).copied()
    }

    pub fn find_frame(&self, name: &str) -> Option<&Frame> {
        self.frame_id(name).map(|id| self.frame(id))
    }

    /// The frame carrying the link `name`.
    pub fn find_link(&self, name: &str) -> Option<&Frame> {
        self.link_index.get(name).map(|&id| self.frame(id))
    }

    /// The frame whose joint is `name`.
    pub fn find_frame_by_joint(&self, name: &str) -> Option<&Frame> {
        self.joint_index.get(name).map(|&id| self.frame(id))
    }

    pub fn parent(&self, id: FrameId) -> Option<FrameId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    pub fn children(&self, id: FrameId) -> &[FrameId] {
        self.nodes.get(id.0).map_or(&[], |n| n.children.as_slice())
    }

    /// World pose of every frame, keyed by frame name.
    ///
    /// Joints missing from `values` are evaluated at zero. Keys that name no
    /// joint of this chain are ignored, so one value map can drive several
    /// chains.
    pub fn forward_kinematics(&self, values: &HashMap<String, f64>) -> HashMap<String, Transform> {
        self.forward_kinematics_from(&Transform::identity(), values)
    }

    /// Like [`forward_kinematics`](Self::forward_kinematics), with the root
    /// placed at `world` instead of the origin.
    pub fn forward_kinematics_from(
        &self,
        world: &Transform,
        values: &HashMap<String, f64>,
    ) -> HashMap<String, Transform> {
        if tracing::enabled!(tracing::Level::TRACE) {
            let ignored: Vec<&str> = values
                .keys()
                .filter(|k| !self.joint_index.contains_key(k.as_str()))
                .map(String::as_str)
                .collect();
            if !ignored.is_empty() {
                trace!(?ignored, "ignoring values for unknown joints");
            }
        }

        let poses = self.world_poses(world, |frame| {
            values.get(frame.joint().name()).copied().unwrap_or(0.0)
        });
        self.order
            .iter()
            .map(|&id| (self.frame(id).name().to_owned(), poses[id.0]))
            .collect()
    }

    /// Forward kinematics from values ordered like
    /// [`joint_parameter_names`](Self::joint_parameter_names).
    pub fn forward_kinematics_slice(
        &self,
        values: &[f64],
    ) -> Result<HashMap<String, Transform>, KinematicsError> {
        if values.len() != self.dof() {
            return Err(KinematicsError::DimensionMismatch {
                expected: self.dof(),
                got: values.len(),
            });
        }
        let map = self
            .joint_parameter_names
            .iter()
            .cloned()
            .zip(values.iter().copied())
            .collect();
        Ok(self.forward_kinematics(&map))
    }

    /// World poses indexed by [`FrameId`], in one pre-order pass.
    ///
    /// `value_of` is only consulted for movable joints.
    pub(crate) fn world_poses(
        &self,
        world: &Transform,
        mut value_of: impl FnMut(&Frame) -> f64,
    ) -> Vec<Transform> {
        let mut poses = vec![Transform::identity(); self.nodes.len()];
        for &id in &self.order {
            let node = &self.nodes[id.0];
            let value = if node.frame.joint().dof() > 0 {
                value_of(&node.frame)
            } else {
                0.0
            };
            let parent = node.parent.map_or(world, |p| &poses[p.0]);
            let pose = parent.compose(&node.frame.local_transform(value));
            poses[id.0] = if self.config.renormalize_at(node.depth) {
                pose.renormalized()
            } else {
                pose
            };
        }
        poses
    }

    fn fmt_subtree(&self, f: &mut fmt::Formatter<'_>, id: FrameId, prefix: &str) -> fmt::Result {
        let children = self.children(id);
        for (i, &child) in children.iter().enumerate() {
            let last = i + 1 == children.len();
            let frame = self.frame(child);
            writeln!(
                f,
                "{prefix}{} {} ({}: {})",
                if last { "└──" } else { "├──" },
                frame.name(),
                frame.joint().name(),
                frame.joint().joint_type().as_str(),
            )?;
            let next = format!("{prefix}{}", if last { "    " } else { "│   " });
            self.fmt_subtree(f, child, &next)?;
        }
        Ok(())
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.frame(self.root()).name())?;
        self.fmt_subtree(f, self.root(), "")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
