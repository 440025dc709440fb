//! Simulated reader driver

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use bytes::Bytes;
use cardresource_spi::{CardResource, ReaderSpi, SmartCard, TransportError};
use parking_lot::Mutex;
use tracing::debug;

use crate::card::StubSmartCard;

/// Reader driver backed by a [`StubSmartCard`]
#[derive(Debug)]
pub struct StubReader {
    /// Name of the reader
    name: String,
    /// Whether the reader is contactless
    contactless: bool,
    /// Inserted card, if any
    card: Mutex<Option<Arc<StubSmartCard>>>,
    /// Physical channel state
    channel_open: AtomicBool,
    /// Number of APDUs received
    transmitted: AtomicUsize,
}

impl StubReader {
    /// Create a new empty reader
    pub fn new(name: impl Into<String>, contactless: bool) -> Self {
        Self {
            name: name.into(),
            contactless,
            card: Mutex::new(None),
            channel_open: AtomicBool::new(false),
            transmitted: AtomicUsize::new(0),
        }
    }

    /// Insert a card, replacing any card already present
    pub fn insert_card(&self, card: StubSmartCard) -> Arc<StubSmartCard> {
        let card = Arc::new(card);
        debug!(reader = %self.name, atr = card.power_on_data(), "Card inserted");
        *self.card.lock() = Some(card.clone());
        card
    }

    /// Remove the inserted card
    pub fn remove_card(&self) -> Option<Arc<StubSmartCard>> {
        self.channel_open.store(false, Ordering::Release);
        self.card.lock().take()
    }

    /// The inserted card
    pub fn card(&self) -> Option<Arc<StubSmartCard>> {
        self.card.lock().clone()
    }

    /// Number of APDUs this reader has received
    pub fn transmitted(&self) -> usize {
        self.transmitted.load(Ordering::Acquire)
    }

    /// Pair this reader with its inserted card
    ///
    /// Returns `None` when the reader is empty.
    pub fn card_resource(self: &Arc<Self>) -> Option<CardResource> {
        let card: Arc<dyn SmartCard> = self.card()?;
        let reader: Arc<dyn ReaderSpi> = self.clone();
        Some(CardResource::new(reader, card))
    }
}

impl ReaderSpi for StubReader {
    fn name(&self) -> &str {
        &self.name
    }

    fn open_physical_channel(&self) -> Result<(), TransportError> {
        if self.card.lock().is_none() {
            return Err(TransportError::card_io(format!(
                "No card in reader {}",
                self.name
            )));
        }
        self.channel_open.store(true, Ordering::Release);
        Ok(())
    }

    fn close_physical_channel(&self) -> Result<(), TransportError> {
        self.channel_open.store(false, Ordering::Release);
        Ok(())
    }

    fn is_physical_channel_open(&self) -> bool {
        self.channel_open.load(Ordering::Acquire)
    }

    fn check_card_presence(&self) -> Result<bool, TransportError> {
        Ok(self.card.lock().is_some())
    }

    fn power_on_data(&self) -> Option<String> {
        self.card
            .lock()
            .as_ref()
            .map(|card| card.power_on_data().to_owned())
    }

    fn do_transmit_apdu(&self, apdu: &[u8]) -> Result<Bytes, TransportError> {
        self.transmitted.fetch_add(1, Ordering::AcqRel);

        let card = self
            .card()
            .ok_or_else(|| TransportError::reader_io(format!("No card in reader {}", self.name)))?;

        card.simulated_response(apdu).ok_or_else(|| {
            TransportError::card_io(format!(
                "No simulated response for APDU {}",
                hex::encode_upper(apdu)
            ))
        })
    }

    fn is_contactless(&self) -> bool {
        self.contactless
    }
}
