//! Pool plugin backed by a Card Resource Service
//!
//! The plugin lets a host framework allocate readers by card resource profile
//! name. Each allocation is forwarded to a [`CardResourceService`], and the
//! resource it returns is wrapped in a [`CardResourceReaderAdapter`] the host
//! can use as a regular reader until it gives it back.
//!
//! ## Overview
//!
//! - [`CardResourcePluginFactory`] builds the plugin from a name, a service and
//!   the allowed profile names
//! - [`CardResourcePluginAdapter`] allocates and releases readers
//! - [`CardResourceReaderAdapter`] forwards APDUs to the pooled reader
//!
//! Pooling, card selection and exclusivity are left to the service.
//!
//! [`CardResourceService`]: cardresource_spi::CardResourceService
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

mod config;
mod error;
mod factory;
mod plugin;
mod profile;
mod reader;

pub use config::{CardResourcePluginConfig, DEFAULT_PLUGIN_NAME};
pub use error::ConfigError;
pub use factory::{CardResourcePluginFactory, CardResourcePluginFactoryBuilder};
pub use plugin::CardResourcePluginAdapter;
pub use profile::ProfileRegistry;
pub use reader::{CardResourceReader, CardResourceReaderAdapter, READER_NAME_PREFIX};
