//! Reader traits expected by the host framework
//!
//! A reader is the unit the host talks to once a plugin hands it out. The same
//! trait describes the low-level drivers a Card Resource Service keeps in its
//! pool, so a pooled reader can forward to the driver it wraps.

use std::fmt;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::error::TransportError;
use crate::resource::SmartCard;

/// Trait for readers exposed to the host framework
///
/// All queries take `&self` so a driver can be shared between the service that
/// owns it and the pooled reader currently holding it.
pub trait ReaderSpi: Send + Sync + fmt::Debug {
    /// Name of the reader
    fn name(&self) -> &str;

    /// Open the physical channel to the card
    fn open_physical_channel(&self) -> Result<(), TransportError>;

    /// Close the physical channel to the card
    fn close_physical_channel(&self) -> Result<(), TransportError>;

    /// Check if the physical channel is open
    fn is_physical_channel_open(&self) -> bool;

    /// Check if a card is inserted
    fn check_card_presence(&self) -> Result<bool, TransportError>;

    /// Power-on data (ATR) of the inserted card, as an upper case hex string
    fn power_on_data(&self) -> Option<String>;

    /// Send an APDU to the card and return the response bytes
    ///
    /// Logs the exchange at trace level and delegates to [`Self::do_transmit_apdu`].
    fn transmit_apdu(&self, apdu: &[u8]) -> Result<Bytes, TransportError> {
        trace!(reader = self.name(), apdu = %hex::encode_upper(apdu), "APDU_REQ");
        let result = self.do_transmit_apdu(apdu);
        match &result {
            Ok(response) => {
                trace!(reader = self.name(), apdu = %hex::encode_upper(response), "APDU_RES");
            }
            Err(e) => {
                debug!(reader = self.name(), error = %e, "Error during APDU transmission");
            }
        }
        result
    }

    /// Internal implementation of transmit_apdu
    /// This is the method that concrete readers should override
    fn do_transmit_apdu(&self, apdu: &[u8]) -> Result<Bytes, TransportError>;

    /// Whether the reader works in contactless mode
    fn is_contactless(&self) -> bool;

    /// Called by the host when the reader is unregistered
    fn on_unregister(&mut self) {}
}

/// Reader handed out by a pool plugin
pub trait PoolReaderSpi: ReaderSpi {
    /// The smart card selected during allocation, if still held
    fn selected_smart_card(&self) -> Option<&dyn SmartCard>;
}

#[cfg(test)]
#[derive(Debug, Default)]
#[allow(missing_docs)]
pub(crate) struct MockReader {
    /// Response returned to every APDU
    pub(crate) response: Option<Bytes>,
    /// Number of APDUs received
    pub(crate) transmitted: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl ReaderSpi for MockReader {
    fn name(&self) -> &str {
        "mock"
    }

    fn open_physical_channel(&self) -> Result<(), TransportError> {
        Ok(())
    }

    fn close_physical_channel(&self) -> Result<(), TransportError> {
        Ok(())
    }

    fn is_physical_channel_open(&self) -> bool {
        true
    }

    fn check_card_presence(&self) -> Result<bool, TransportError> {
        Ok(self.response.is_some())
    }

    fn power_on_data(&self) -> Option<String> {
        None
    }

    fn do_transmit_apdu(&self, _apdu: &[u8]) -> Result<Bytes, TransportError> {
        self.transmitted
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        self.response
            .clone()
            .ok_or_else(|| TransportError::card_io("Card is not responding"))
    }

    fn is_contactless(&self) -> bool {
        false
    }
}
