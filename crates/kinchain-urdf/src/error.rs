//! Error types for building chains from URDF.

use std::path::PathBuf;

use kinchain_core::KinematicsError;

/// Errors that can occur while turning a URDF document into a chain.
#[derive(Debug, thiserror::Error)]
pub enum UrdfError {
    /// Failed to read the URDF file.
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse URDF XML content.
    #[error("URDF parse error: {0}")]
    Parse(String),

    /// A joint references a link that is not declared.
    #[error("missing link: {0}")]
    MissingLink(String),

    /// Joint type with no kinematic counterpart.
    #[error("unsupported joint type: {0}")]
    UnsupportedJointType(String),

    /// Geometry shape with no counterpart in the visual model.
    #[error("unsupported geometry type: {0}")]
    UnsupportedGeometryType(String),

    /// Every link is the child of some joint.
    #[error("no root link found")]
    NoRootLink,

    /// More than one link is never a joint child.
    #[error("multiple root links: {}", .0.join(", "))]
    MultipleRootLinks(Vec<String>),

    /// A link is the child of more than one joint.
    #[error("link {0} has more than one parent joint")]
    MultipleParents(String),

    /// The resulting tree was rejected by the chain builder.
    #[error(transparent)]
    Kinematics(#[from] KinematicsError),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = UrdfError::Parse("bad xml".into());
        assert_eq!(e.to_string(), "URDF parse error: bad xml");

        let e = UrdfError::MissingLink("base_link".into());
        assert_eq!(e.to_string(), "missing link: base_link");

        let e = UrdfError::UnsupportedJointType("floating".into());
        assert_eq!(e.to_string(), "unsupported joint type: floating");

        let e = UrdfError::UnsupportedGeometryType("capsule".into());
        assert_eq!(e.to_string(), "unsupported geometry type: capsule");

        let e = UrdfError::NoRootLink;
        assert_eq!(e.to_string(), "no root link found");

        let e = UrdfError::MultipleRootLinks(vec!["a".into(), "b".into()]);
        assert_eq!(e.to_string(), "multiple root links: a, b");

        let e = UrdfError::MultipleParents("wheel".into());
        assert_eq!(e.to_string(), "link wheel has more than one parent joint");
    }

    #[test]
    fn kinematics_error_is_transparent() {
        let e = UrdfError::from(KinematicsError::FrameNotFound("tool_frame".into()));
        assert_eq!(e.to_string(), "frame not found: tool_frame");
    }

    #[test]
    fn io_error_includes_path() {
        let e = UrdfError::Io {
            path: PathBuf::from("/tmp/robot.urdf"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let msg = e.to_string();
        assert!(msg.contains("/tmp/robot.urdf"));
        assert!(msg.contains("not found"));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn error_is_send_sync() {
        assert_send_sync::<UrdfError>();
    }
}
