//! Project configuration file
//!
//! Looked up at the analysis root as `.tendril.yml`, `.tendril.yaml` or
//! `.tendril.toml`, first found wins. A missing file yields the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::coordinator::ErrorPolicy;

pub const CONFIG_FILES: &[&str] = &[".tendril.yml", ".tendril.yaml", ".tendril.toml"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Patterns whose matches are never added to the graph.
    pub exclude: Vec<String>,
    /// Builder concurrency, defaults to the number of cores.
    pub workers: Option<usize>,
    pub continue_on_error: bool,
    pub check: CheckConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    pub entrypoints: Vec<String>,
    pub allow_circular_dependencies: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid TOML in {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Config {
    /// Load the configuration for `root`, or the defaults if there is none.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        match Self::find(root) {
            Some(path) => Self::from_path(&path),
            None => {
                debug!("No configuration file in {}", root.display());
                Ok(Config::default())
            }
        }
    }

    pub fn find(root: &Path) -> Option<PathBuf> {
        CONFIG_FILES
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.is_file())
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })?
        } else if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?
        };

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Failure policy for a build. `continue_on_error` comes from the command
    /// line and can only relax the configured policy.
    pub fn error_policy(&self, continue_on_error: bool) -> ErrorPolicy {
        if continue_on_error || self.continue_on_error {
            ErrorPolicy::Continue
        } else {
            ErrorPolicy::Abort
        }
    }
}
