//! Factory and builder for the card resource plugin

use std::fmt;
use std::sync::Arc;

use cardresource_spi::{CardResourceService, PoolPluginFactorySpi};

use crate::config::CardResourcePluginConfig;
use crate::error::ConfigError;
use crate::plugin::CardResourcePluginAdapter;
use crate::profile::ProfileRegistry;

/// Factory creating [`CardResourcePluginAdapter`]s for the host framework
#[derive(Clone)]
pub struct CardResourcePluginFactory {
    plugin_name: String,
    card_resource_service: Arc<dyn CardResourceService>,
    profiles: ProfileRegistry,
}

impl fmt::Debug for CardResourcePluginFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardResourcePluginFactory")
            .field("plugin_name", &self.plugin_name)
            .field("profiles", &self.profiles)
            .finish_non_exhaustive()
    }
}

impl CardResourcePluginFactory {
    /// Start building a factory for the given profiles
    ///
    /// The service must already be configured and started. Fails if the plugin
    /// name is empty, if there is no profile or if a profile name is empty.
    pub fn builder<I, S>(
        plugin_name: impl Into<String>,
        card_resource_service: Arc<dyn CardResourceService>,
        profile_names: I,
    ) -> Result<CardResourcePluginFactoryBuilder, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let plugin_name = plugin_name.into();
        if plugin_name.is_empty() {
            return Err(ConfigError::Empty("plugin_name"));
        }

        Ok(CardResourcePluginFactoryBuilder {
            plugin_name,
            card_resource_service,
            profiles: ProfileRegistry::new(profile_names)?,
        })
    }

    /// Start building a factory for a single profile
    pub fn builder_with_profile(
        plugin_name: impl Into<String>,
        card_resource_service: Arc<dyn CardResourceService>,
        profile_name: impl Into<String>,
    ) -> Result<CardResourcePluginFactoryBuilder, ConfigError> {
        Self::builder(plugin_name, card_resource_service, [profile_name])
    }

    /// Start building a factory from a configuration
    pub fn builder_from_config(
        config: &CardResourcePluginConfig,
        card_resource_service: Arc<dyn CardResourceService>,
    ) -> Result<CardResourcePluginFactoryBuilder, ConfigError> {
        Self::builder(
            config.plugin_name.as_str(),
            card_resource_service,
            config.profiles.iter().map(String::as_str),
        )
    }
}

impl PoolPluginFactorySpi for CardResourcePluginFactory {
    type Plugin = CardResourcePluginAdapter;

    fn pool_plugin_name(&self) -> &str {
        &self.plugin_name
    }

    fn pool_plugin(&self) -> Self::Plugin {
        CardResourcePluginAdapter::new(
            self.plugin_name.clone(),
            self.card_resource_service.clone(),
            self.profiles.clone(),
        )
    }
}

/// Validated parameters of a [`CardResourcePluginFactory`]
pub struct CardResourcePluginFactoryBuilder {
    plugin_name: String,
    card_resource_service: Arc<dyn CardResourceService>,
    profiles: ProfileRegistry,
}

impl fmt::Debug for CardResourcePluginFactoryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardResourcePluginFactoryBuilder")
            .field("plugin_name", &self.plugin_name)
            .field("profiles", &self.profiles)
            .finish_non_exhaustive()
    }
}

impl CardResourcePluginFactoryBuilder {
    /// Build the factory
    pub fn build(self) -> CardResourcePluginFactory {
        CardResourcePluginFactory {
            plugin_name: self.plugin_name,
            card_resource_service: self.card_resource_service,
            profiles: self.profiles,
        }
    }
}
