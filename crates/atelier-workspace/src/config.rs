//! Workspace configuration.
//!
//! Configuration can be loaded from:
//! - a TOML file named by `ATELIER_CONFIG`
//! - environment variables (`ATELIER_*` prefixed)
//!
//! # Example
//!
//! ```rust,no_run
//! use atelier_workspace::config::WorkspaceConfig;
//!
//! let config = WorkspaceConfig::load().expect("Failed to load config");
//! let limits = config.limits();
//! ```

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use atelier_core::defaults::{
    ENV_CONFIG_PATH, ENV_MAX_FOLDER_DEPTH, ENV_NODE_PREVIEW_LIMIT, MAX_FOLDER_DEPTH,
    NODE_PREVIEW_LIMIT,
};

use crate::rules::TreeLimits;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<ConfigError> for atelier_core::Error {
    fn from(e: ConfigError) -> Self {
        atelier_core::Error::Config(e.to_string())
    }
}

/// Tunables for the workspace tree manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Maximum folder nesting depth (root = 1). Unset means unbounded.
    pub max_folder_depth: Option<usize>,
    /// Children shown in a node preview.
    pub node_preview_limit: usize,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            max_folder_depth: MAX_FOLDER_DEPTH,
            node_preview_limit: NODE_PREVIEW_LIMIT,
        }
    }
}

impl WorkspaceConfig {
    /// Load from the file named by `ATELIER_CONFIG` if set, else from the
    /// environment.
    pub fn load() -> ConfigResult<Self> {
        match env::var(ENV_CONFIG_PATH) {
            Ok(path) => Self::from_file(Path::new(&path)),
            Err(_) => Self::from_env(),
        }
    }

    /// Load from a TOML file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        info!(
            subsystem = "workspace",
            component = "config",
            path = %path.display(),
            max_folder_depth = ?config.max_folder_depth,
            node_preview_limit = config.node_preview_limit,
            "Loaded workspace config from file"
        );
        Ok(config)
    }

    /// Load from `ATELIER_*` environment variables, falling back to defaults.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(raw) = get(ENV_MAX_FOLDER_DEPTH) {
            let raw = raw.trim();
            config.max_folder_depth = if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(parse_usize(ENV_MAX_FOLDER_DEPTH, raw)?)
            };
        }
        if let Some(raw) = get(ENV_NODE_PREVIEW_LIMIT) {
            config.node_preview_limit = parse_usize(ENV_NODE_PREVIEW_LIMIT, raw.trim())?;
        }

        config.validate()?;
        debug!(
            subsystem = "workspace",
            component = "config",
            max_folder_depth = ?config.max_folder_depth,
            node_preview_limit = config.node_preview_limit,
            "Workspace config resolved from environment"
        );
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_folder_depth == Some(0) {
            return Err(ConfigError::Validation(
                "max_folder_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Structural limits for the tree rules.
    pub fn limits(&self) -> TreeLimits {
        TreeLimits {
            max_depth: self.max_folder_depth,
        }
    }
}

fn parse_usize(key: &str, raw: &str) -> ConfigResult<usize> {
    raw.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
    })
}
