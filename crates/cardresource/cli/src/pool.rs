//! Simulated reader pool described in a TOML file
//!
//! ```toml
//! plugin_name = "CardResourcePlugin"
//! profiles = ["profile1"]
//!
//! [[readers]]
//! name = "contactReader"
//! profile = "profile1"
//! power_on_data = "3B8880010000000000718100F9"
//!
//! [readers.commands]
//! "8084000004" = "001122339000"
//! ```

use std::collections::BTreeMap;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use cardresource_plugin::CardResourcePluginConfig;
use cardresource_spi::CardResourceService;
use cardresource_stub::{StubCardResourceService, StubReader, StubSmartCard};
use serde::Deserialize;

/// Plugin configuration and the readers of the simulated pool
#[derive(Debug, Deserialize)]
pub struct PoolFile {
    /// Plugin configuration
    #[serde(flatten)]
    pub plugin: CardResourcePluginConfig,

    /// Simulated readers
    #[serde(default)]
    pub readers: Vec<ReaderEntry>,
}

/// A simulated reader with its card
#[derive(Debug, Deserialize)]
pub struct ReaderEntry {
    /// Reader name
    pub name: String,
    /// Profile the reader belongs to
    pub profile: String,
    /// Whether the reader works in contactless mode
    #[serde(default)]
    pub contactless: bool,
    /// ATR of the inserted card, no card when absent
    pub power_on_data: Option<String>,
    /// Protocol of the inserted card
    pub protocol: Option<String>,
    /// APDU to response, hex
    #[serde(default)]
    pub commands: BTreeMap<String, String>,
}

impl PoolFile {
    /// Load a pool description from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Ok(toml::from_str(&content)?)
    }

    /// Build the in-memory service for this pool and start it
    ///
    /// Readers without a card declare their profile but add no resource.
    pub fn start_service(&self) -> Result<Arc<dyn CardResourceService>, Box<dyn Error>> {
        let mut service = StubCardResourceService::new();

        for entry in &self.readers {
            let reader = Arc::new(StubReader::new(&entry.name, entry.contactless));

            if let Some(power_on_data) = &entry.power_on_data {
                let mut card = StubSmartCard::new(hex::decode(power_on_data)?);
                if let Some(protocol) = &entry.protocol {
                    card = card.with_protocol(protocol);
                }
                for (command, response) in &entry.commands {
                    card = card.with_simulated_command(command, response).map_err(|e| {
                        format!(
                            "Invalid simulated command {command} for reader {}: {e}",
                            entry.name
                        )
                    })?;
                }
                reader.insert_card(card);
            }

            service = match reader.card_resource() {
                Some(resource) => service.with_resource(&entry.profile, resource),
                None => service.with_profile(&entry.profile),
            };
        }

        service.start();
        Ok(Arc::new(service))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POOL: &str = r#"
        plugin_name = "pool"
        profiles = ["profile1", "profile2"]

        [[readers]]
        name = "contactReader"
        profile = "profile1"
        power_on_data = "3B8880010000000000718100F9"

        [readers.commands]
        "8084000004" = "001122339000"

        [[readers]]
        name = "contactLessReader"
        profile = "profile2"
        contactless = true
    "#;

    #[test]
    fn test_parse_pool() {
        let pool: PoolFile = toml::from_str(POOL).unwrap();

        assert_eq!(pool.plugin.plugin_name, "pool");
        assert_eq!(pool.plugin.profiles, ["profile1", "profile2"]);
        assert_eq!(pool.readers.len(), 2);
        assert!(pool.readers[1].contactless);
        assert!(pool.readers[1].power_on_data.is_none());
        assert_eq!(pool.readers[0].commands["8084000004"], "001122339000");
    }

    #[test]
    fn test_start_service() {
        let pool: PoolFile = toml::from_str(POOL).unwrap();
        let service = pool.start_service().unwrap();

        let resource = service.get_card_resource("profile1").unwrap().unwrap();
        assert_eq!(resource.reader().name(), "contactReader");
        assert!(service.get_card_resource("profile2").unwrap().is_none());
    }

    #[test]
    fn test_start_service_invalid_response() {
        let pool: PoolFile = toml::from_str(&POOL.replace("001122339000", "90ZZ")).unwrap();

        let err = pool.start_service().err().unwrap();
        assert!(err.to_string().contains("8084000004"));
        assert!(err.to_string().contains("contactReader"));
    }
}
