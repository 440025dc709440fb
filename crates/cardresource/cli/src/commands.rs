//! Commands run against the pool plugin

use std::error::Error;

use cardresource_plugin::CardResourcePluginAdapter;
use cardresource_spi::{PoolPluginSpi, PoolReaderSpi, ReaderSpi};
use tracing::info;

use crate::utils;

/// List the reader group references of the plugin
pub fn profiles_command(plugin: &CardResourcePluginAdapter) {
    println!(
        "{}",
        utils::key_value_box(
            plugin.name(),
            &plugin
                .reader_group_references()
                .into_iter()
                .map(|profile| ("profile", profile))
                .collect::<Vec<_>>(),
        )
    );
}

/// Allocate a reader, display it and release it
pub fn allocate_command(
    plugin: &CardResourcePluginAdapter,
    profile: &str,
) -> Result<(), Box<dyn Error>> {
    let mut reader = plugin.allocate_reader(profile)?;
    info!("Reader {} allocated", reader.name());

    let protocol = reader
        .selected_smart_card()
        .and_then(|card| card.protocol().map(str::to_owned))
        .unwrap_or_else(|| "unknown".to_string());

    println!(
        "{}",
        utils::key_value_box(
            "Allocated reader",
            &[
                ("Name", reader.name().to_string()),
                ("Power-on data", reader.power_on_data().unwrap_or_default()),
                ("Protocol", protocol),
                ("Contactless", reader.is_contactless().to_string()),
            ],
        )
    );

    plugin.release_reader(&mut reader);
    println!("{}", utils::success("Reader released"));

    Ok(())
}

/// Allocate a reader, send one APDU and release the reader
pub fn transmit_command(
    plugin: &CardResourcePluginAdapter,
    profile: &str,
    apdu: &str,
) -> Result<(), Box<dyn Error>> {
    let command = hex::decode(apdu.replace(' ', ""))?;

    let mut reader = plugin.allocate_reader(profile)?;
    let result = reader.transmit_apdu(&command);
    plugin.release_reader(&mut reader);

    match result {
        Ok(response) => {
            println!("{}", hex::encode_upper(&response));
            Ok(())
        }
        Err(e) => {
            println!("{}", utils::failure(&e.to_string()));
            Err(e.into())
        }
    }
}
