//! File based configuration of the plugin

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Plugin name used when the configuration does not give one
pub const DEFAULT_PLUGIN_NAME: &str = "CardResourcePlugin";

/// Plugin configuration, usually read from a TOML file
///
/// ```toml
/// plugin_name = "CardResourcePlugin"
/// profiles = ["profile1", "profile2"]
/// ```
///
/// Values are only checked when the factory is built from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardResourcePluginConfig {
    /// Name of the plugin
    #[serde(default = "default_plugin_name")]
    pub plugin_name: String,

    /// Card resource profiles the plugin may allocate from
    #[serde(default)]
    pub profiles: Vec<String>,
}

fn default_plugin_name() -> String {
    DEFAULT_PLUGIN_NAME.to_owned()
}

impl Default for CardResourcePluginConfig {
    fn default() -> Self {
        Self {
            plugin_name: default_plugin_name(),
            profiles: Vec::new(),
        }
    }
}

impl CardResourcePluginConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the plugin name
    pub fn with_plugin_name(mut self, plugin_name: impl Into<String>) -> Self {
        self.plugin_name = plugin_name.into();
        self
    }

    /// Add a profile
    pub fn with_profile(mut self, profile_name: impl Into<String>) -> Self {
        self.profiles.push(profile_name.into());
        self
    }

    /// Parse a configuration from TOML
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read a configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}
