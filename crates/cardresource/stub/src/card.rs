//! Simulated smart card

use std::collections::HashMap;

use bytes::Bytes;
use cardresource_spi::SmartCard;

/// Smart card answering a fixed table of APDUs
#[derive(Debug, Clone, Default)]
pub struct StubSmartCard {
    /// ATR, upper case hex
    power_on_data: String,
    /// Card protocol
    protocol: Option<String>,
    /// Upper case hex command to response bytes
    simulated_commands: HashMap<String, Bytes>,
}

impl StubSmartCard {
    /// Create a new card with the given power-on data
    pub fn new(power_on_data: impl AsRef<[u8]>) -> Self {
        Self {
            power_on_data: hex::encode_upper(power_on_data),
            ..Default::default()
        }
    }

    /// Set the card protocol
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    /// Register a command and the response the card gives to it
    ///
    /// Both sides are hex strings; case and spaces are ignored.
    pub fn with_simulated_command(
        mut self,
        command: &str,
        response: &str,
    ) -> Result<Self, hex::FromHexError> {
        let command = hex::decode(strip_spaces(command))?;
        let response = hex::decode(strip_spaces(response))?;
        self.simulated_commands
            .insert(hex::encode_upper(command), Bytes::from(response));
        Ok(self)
    }

    /// Response to the given command, if one was registered
    pub fn simulated_response(&self, command: &[u8]) -> Option<Bytes> {
        self.simulated_commands
            .get(&hex::encode_upper(command))
            .cloned()
    }
}

impl SmartCard for StubSmartCard {
    fn power_on_data(&self) -> &str {
        &self.power_on_data
    }

    fn protocol(&self) -> Option<&str> {
        self.protocol.as_deref()
    }
}

fn strip_spaces(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}
