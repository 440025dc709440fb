//! Reader handed out by the card resource plugin

use cardresource_spi::{
    Bytes, CardResource, PoolReaderSpi, ReaderSpi, SmartCard, TransportError,
};
use tracing::{debug, trace, warn};

/// Prefix added to the pooled reader name to form the allocated reader name
pub const READER_NAME_PREFIX: &str = "CARD_RESOURCE_";

/// Capability of a reader to give back the card resource it holds
pub trait CardResourceReader: PoolReaderSpi {
    /// The card resource held by the reader, `None` once unlinked
    fn card_resource(&self) -> Option<&CardResource>;

    /// Detach the card resource from the reader
    ///
    /// The reader is unusable afterwards. Returns `None` if it was already
    /// unlinked.
    fn unlink_card_resource(&mut self) -> Option<CardResource>;
}

#[derive(Debug)]
enum Link {
    Linked(CardResource),
    Unlinked,
}

/// Reader wrapping a card resource allocated from the Card Resource Service
///
/// The physical channel is owned by the service: it is open for as long as the
/// resource is held and the card was already detected when it was allocated.
/// APDUs and the contactless query are forwarded to the pooled reader.
#[derive(Debug)]
pub struct CardResourceReaderAdapter {
    /// Allocated reader name
    name: String,
    /// Held resource
    link: Link,
}

impl CardResourceReaderAdapter {
    pub(crate) fn new(card_resource: CardResource) -> Self {
        let name = format!("{READER_NAME_PREFIX}{}", card_resource.reader().name());
        Self {
            name,
            link: Link::Linked(card_resource),
        }
    }

    /// Whether the reader still holds its card resource
    pub const fn is_linked(&self) -> bool {
        matches!(self.link, Link::Linked(_))
    }

    fn linked(&self) -> Option<&CardResource> {
        match &self.link {
            Link::Linked(card_resource) => Some(card_resource),
            Link::Unlinked => None,
        }
    }
}

impl CardResourceReader for CardResourceReaderAdapter {
    fn card_resource(&self) -> Option<&CardResource> {
        self.linked()
    }

    fn unlink_card_resource(&mut self) -> Option<CardResource> {
        match std::mem::replace(&mut self.link, Link::Unlinked) {
            Link::Linked(card_resource) => {
                debug!(reader = %self.name, "Card resource unlinked");
                Some(card_resource)
            }
            Link::Unlinked => None,
        }
    }
}

impl ReaderSpi for CardResourceReaderAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn open_physical_channel(&self) -> Result<(), TransportError> {
        trace!(reader = %self.name, "Open physical channel requested");
        Ok(())
    }

    fn close_physical_channel(&self) -> Result<(), TransportError> {
        trace!(reader = %self.name, "Close physical channel requested");
        Ok(())
    }

    fn is_physical_channel_open(&self) -> bool {
        self.is_linked()
    }

    fn check_card_presence(&self) -> Result<bool, TransportError> {
        trace!(reader = %self.name, "Check card presence requested");
        Ok(self.is_linked())
    }

    fn power_on_data(&self) -> Option<String> {
        let power_on_data = self
            .linked()
            .map(|card_resource| card_resource.smart_card().power_on_data().to_owned());
        trace!(reader = %self.name, atr = ?power_on_data, "Get power on data requested");
        power_on_data
    }

    fn do_transmit_apdu(&self, apdu: &[u8]) -> Result<Bytes, TransportError> {
        match self.linked() {
            Some(card_resource) => card_resource.reader().transmit_apdu(apdu),
            None => {
                warn!(reader = %self.name, "APDU sent to an unlinked reader");
                Err(TransportError::reader_io(format!(
                    "Reader {} is no longer linked to a card resource",
                    self.name
                )))
            }
        }
    }

    fn is_contactless(&self) -> bool {
        self.linked()
            .is_some_and(|card_resource| card_resource.reader().is_contactless())
    }

    /// The resource stays linked until the pool releases the reader.
    fn on_unregister(&mut self) {
        trace!(reader = %self.name, "Reader unregistered");
    }
}

impl PoolReaderSpi for CardResourceReaderAdapter {
    fn selected_smart_card(&self) -> Option<&dyn SmartCard> {
        self.linked()
            .map(|card_resource| card_resource.smart_card().as_ref())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cardresource_stub::{StubReader, StubSmartCard};

    use super::*;

    const APDU_C: &str = "8084000004";
    const UNKNOWN_APDU_C: &str = "8084000008";
    const APDU_R: &str = "001122339000";
    const POWER_ON_DATA: &str = "3B8880010000000000718100F9";

    fn stub_card() -> StubSmartCard {
        StubSmartCard::new(hex::decode(POWER_ON_DATA).unwrap())
            .with_protocol("ISO_7816_CARD")
            .with_simulated_command(APDU_C, APDU_R)
            .unwrap()
    }

    fn adapter(reader_name: &str, contactless: bool) -> CardResourceReaderAdapter {
        let reader = Arc::new(StubReader::new(reader_name, contactless));
        reader.insert_card(stub_card());
        CardResourceReaderAdapter::new(reader.card_resource().unwrap())
    }

    #[test]
    fn test_name_is_prefixed() {
        let adapter = adapter("contactReader", false);
        assert_eq!(adapter.name(), "CARD_RESOURCE_contactReader");
    }

    #[test]
    fn test_card_resource() {
        let reader = Arc::new(StubReader::new("contactReader", false));
        reader.insert_card(stub_card());
        let card_resource = reader.card_resource().unwrap();

        let adapter = CardResourceReaderAdapter::new(card_resource.clone());
        assert!(adapter.card_resource().unwrap().same_as(&card_resource));
    }

    #[test]
    fn test_channel_and_presence() {
        let adapter = adapter("contactReader", false);

        adapter.open_physical_channel().unwrap();
        adapter.close_physical_channel().unwrap();
        assert!(adapter.is_physical_channel_open());
        assert_eq!(adapter.check_card_presence(), Ok(true));
    }

    #[test]
    fn test_power_on_data() {
        let adapter = adapter("contactReader", false);
        assert_eq!(adapter.power_on_data().as_deref(), Some(POWER_ON_DATA));
    }

    #[test]
    fn test_contactless_follows_reader() {
        assert!(adapter("contactLessReader", true).is_contactless());
        assert!(!adapter("contactReader", false).is_contactless());
    }

    #[test]
    fn test_transmit_apdu() {
        let adapter = adapter("contactReader", false);

        let response = adapter
            .transmit_apdu(&hex::decode(APDU_C).unwrap())
            .unwrap();
        assert_eq!(hex::encode_upper(response), APDU_R);
    }

    #[test]
    fn test_transmit_apdu_card_not_responding() {
        let adapter = adapter("contactReader", false);

        let err = adapter
            .transmit_apdu(&hex::decode(UNKNOWN_APDU_C).unwrap())
            .unwrap_err();
        assert!(matches!(err, TransportError::CardIo(_)));
    }

    #[test]
    fn test_selected_smart_card() {
        let adapter = adapter("contactReader", false);

        let card = adapter.selected_smart_card().unwrap();
        assert_eq!(card.power_on_data(), POWER_ON_DATA);
        assert_eq!(card.protocol(), Some("ISO_7816_CARD"));
    }

    #[test]
    fn test_unlink() {
        let mut adapter = adapter("contactReader", false);

        assert!(adapter.unlink_card_resource().is_some());
        assert!(adapter.unlink_card_resource().is_none());

        assert!(!adapter.is_linked());
        assert!(adapter.card_resource().is_none());
        assert!(adapter.selected_smart_card().is_none());
        assert!(adapter.power_on_data().is_none());
        assert!(!adapter.is_physical_channel_open());
        assert!(!adapter.is_contactless());
        assert_eq!(adapter.name(), "CARD_RESOURCE_contactReader");

        let err = adapter
            .transmit_apdu(&hex::decode(APDU_C).unwrap())
            .unwrap_err();
        assert!(matches!(err, TransportError::ReaderIo(_)));
    }

    #[test]
    fn test_on_unregister_keeps_link() {
        let mut adapter = adapter("contactReader", false);

        adapter.on_unregister();
        assert!(adapter.is_linked());
        assert!(adapter.card_resource().is_some());
        assert_eq!(adapter.power_on_data().as_deref(), Some(POWER_ON_DATA));
    }
}
