use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_renormalize_interval() -> u32 {
    8
}

// ---------------------------------------------------------------------------
// ChainConfig
// ---------------------------------------------------------------------------

/// Evaluation settings attached to a [`Chain`](crate::Chain).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Renormalize accumulated rotations every this many compositions along
    /// a root-to-leaf path (default: 8). Must be at least 1.
    #[serde(default = "default_renormalize_interval")]
    pub renormalize_interval: u32,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            renormalize_interval: default_renormalize_interval(),
        }
    }
}

impl ChainConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.renormalize_interval == 0 {
            return Err(ConfigError::InvalidValue {
                field: "renormalize_interval".into(),
                message: "must be >= 1".into(),
            });
        }
        Ok(())
    }

    /// Whether the pose at `depth` (root = 0) should be renormalized. An
    /// unvalidated interval of 0 behaves like 1.
    pub(crate) const fn renormalize_at(&self, depth: u32) -> bool {
        let interval = if self.renormalize_interval == 0 {
            1
        } else {
            self.renormalize_interval
        };
        depth % interval == 0
    }

    /// Parse and validate from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
