//! Contracts shared between the card resource pool plugin and its collaborators
//!
//! This crate holds the traits and types on both sides of the pool plugin:
//!
//! - the reader and pool plugin SPIs the host framework expects a plugin to implement
//! - the Card Resource Service the plugin delegates resource pooling to
//! - the error taxonomy used for transmission, allocation and service failures
//!
//! Nothing here performs any pooling or card I/O by itself.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::Bytes;

pub mod error;
pub mod plugin;
pub mod reader;
pub mod resource;

pub use error::{PluginError, ServiceError, TransportError};
pub use plugin::{COMMON_API_VERSION, PLUGIN_API_VERSION, PoolPluginFactorySpi, PoolPluginSpi};
pub use reader::{PoolReaderSpi, ReaderSpi};
pub use resource::{CardResource, CardResourceService, SmartCard};

/// Prelude module containing commonly used traits and types
pub mod prelude {
    pub use crate::{
        Bytes, CardResource, CardResourceService, PluginError, PoolPluginFactorySpi,
        PoolPluginSpi, PoolReaderSpi, ReaderSpi, ServiceError, SmartCard, TransportError,
    };
}
