//! # Registry Configuration
//!
//! The admin identity is an explicitly owned configuration value handed to
//! the registry at construction, never ambient global state. A
//! [`RegistryConfig`] carries it together with the choice of
//! [`HeightSource`].
//!
//! ## Sources
//!
//! Configuration is read from a YAML (`.yaml`, `.yml`) or JSON (`.json`)
//! file, then environment overrides are applied:
//!
//! | Variable           | Effect                                    |
//! |--------------------|-------------------------------------------|
//! | `FCR_ADMIN`        | replaces `admin`                          |
//! | `FCR_START_HEIGHT` | switches to a manual source at that height |
//!
//! ```yaml
//! admin: ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM
//! height:
//!   mode: manual
//!   start: 12345
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::height::{HeightSource, ManualHeight, WallClockHeight};
use crate::identity::AdminIdentity;

/// Environment variable overriding the admin identity.
pub const ENV_ADMIN: &str = "FCR_ADMIN";

/// Environment variable selecting a manual height source and its start.
pub const ENV_START_HEIGHT: &str = "FCR_START_HEIGHT";

/// Configuration a registry is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Initial administrator identity.
    pub admin: AdminIdentity,
    /// Source for record stamping heights.
    #[serde(default)]
    pub height: HeightConfig,
}

/// Which [`HeightSource`] to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum HeightConfig {
    /// A settable counter starting at `start`.
    Manual {
        /// Initial height.
        #[serde(default)]
        start: u64,
    },
    /// UTC unix seconds.
    WallClock,
}

impl Default for HeightConfig {
    fn default() -> Self {
        Self::Manual { start: 0 }
    }
}

impl HeightConfig {
    /// Build the configured source.
    pub fn build(&self) -> Arc<dyn HeightSource> {
        match self {
            Self::Manual { start } => Arc::new(ManualHeight::new(*start)),
            Self::WallClock => Arc::new(WallClockHeight),
        }
    }
}

impl std::fmt::Display for HeightConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Manual { start } => write!(f, "manual (start {start})"),
            Self::WallClock => f.write_str("wall clock"),
        }
    }
}

impl RegistryConfig {
    /// Configuration with the given admin and a manual source at genesis.
    pub fn new(admin: AdminIdentity) -> Self {
        Self {
            admin,
            height: HeightConfig::default(),
        }
    }

    /// Load from a file, choosing the parser by extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let format = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Format::Yaml,
            Some("json") => Format::Json,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match format {
            Format::Yaml => Self::from_yaml_str(&text),
            Format::Json => Self::from_json_str(&text),
        }
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parse a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Apply `FCR_ADMIN` / `FCR_START_HEIGHT` overrides read through
    /// `lookup`.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(admin) = lookup(ENV_ADMIN) {
            self.admin = AdminIdentity::new(admin)?;
        }
        if let Some(start) = lookup(ENV_START_HEIGHT) {
            let start = start.trim().parse::<u64>().map_err(|e| ConfigError::Env {
                var: ENV_START_HEIGHT.to_string(),
                reason: e.to_string(),
            })?;
            self.height = HeightConfig::Manual { start };
        }
        Ok(self)
    }
}

enum Format {
    Yaml,
    Json,
}
