//! Configuration for the expectation helpers.
//!
//! Everything has a default, so most callers never build one explicitly.
//! Values can come from the environment (`FAILWISE_*` variables) or from a
//! YAML file checked into the test tree.

use std::path::Path;

use failwise_proto::{Error, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_SCRIPT_PREFIX: &str = "TestScript";
const DEFAULT_SCRIPT_SUFFIX: &str = ".script";

/// Settings for [`Expect`](crate::Expect).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpectConfig {
    /// Prefix of generated script labels.
    pub script_prefix: String,

    /// Suffix of generated script labels, typically a file extension.
    pub script_suffix: String,
}

impl Default for ExpectConfig {
    fn default() -> Self {
        Self {
            script_prefix: DEFAULT_SCRIPT_PREFIX.to_string(),
            script_suffix: DEFAULT_SCRIPT_SUFFIX.to_string(),
        }
    }
}

impl ExpectConfig {
    /// Loads configuration from `FAILWISE_SCRIPT_PREFIX` and
    /// `FAILWISE_SCRIPT_SUFFIX`, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            script_prefix: lookup("FAILWISE_SCRIPT_PREFIX").unwrap_or(defaults.script_prefix),
            script_suffix: lookup("FAILWISE_SCRIPT_SUFFIX").unwrap_or(defaults.script_suffix),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from YAML. Missing fields take their defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a YAML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.script_prefix.trim().is_empty() {
            return Err(Error::Config(
                "script_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
