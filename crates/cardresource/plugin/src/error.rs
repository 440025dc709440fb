//! Configuration errors

use std::path::PathBuf;

/// Invalid plugin configuration, raised while building the plugin factory
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required name or collection is empty
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// The configuration file could not be read
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        /// Path of the file
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this plugin
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
