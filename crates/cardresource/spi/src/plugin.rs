//! Pool plugin traits expected by the host framework

use std::collections::BTreeSet;

use crate::error::PluginError;
use crate::reader::PoolReaderSpi;

/// Version of the host plugin API implemented by this crate
pub const PLUGIN_API_VERSION: &str = "2.3";

/// Version of the host common API implemented by this crate
pub const COMMON_API_VERSION: &str = "2.0";

/// Plugin that hands out readers on demand, grouped by reference
///
/// The reader type is fixed by the plugin, so a plugin only ever gets back
/// readers it produced itself.
pub trait PoolPluginSpi: Send + Sync {
    /// Reader type allocated by this plugin
    type Reader: PoolReaderSpi;

    /// Name of the plugin
    fn name(&self) -> &str;

    /// Sorted snapshot of the group references this plugin can allocate from
    fn reader_group_references(&self) -> BTreeSet<String>;

    /// Allocate a reader from the given group
    fn allocate_reader(&self, group_reference: &str) -> Result<Self::Reader, PluginError>;

    /// Give a reader back
    ///
    /// Must be safe to call on a reader that was already released.
    fn release_reader(&self, reader: &mut Self::Reader);

    /// Called by the host when the plugin is unregistered
    fn on_unregister(&self) {}
}

/// Factory used by the host to create a pool plugin
pub trait PoolPluginFactorySpi {
    /// Plugin type produced by the factory
    type Plugin: PoolPluginSpi;

    /// Version of the host plugin API the plugin was built against
    fn plugin_api_version(&self) -> &str {
        PLUGIN_API_VERSION
    }

    /// Version of the host common API the plugin was built against
    fn common_api_version(&self) -> &str {
        COMMON_API_VERSION
    }

    /// Name of the plugin the factory produces
    fn pool_plugin_name(&self) -> &str;

    /// Create the plugin
    fn pool_plugin(&self) -> Self::Plugin;
}
