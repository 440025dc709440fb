//! Card resources and the service that pools them

use std::fmt;
use std::sync::Arc;

use crate::error::ServiceError;
use crate::reader::ReaderSpi;

/// A smart card selected in a reader
pub trait SmartCard: Send + Sync + fmt::Debug {
    /// Power-on data (ATR) as an upper case hex string
    fn power_on_data(&self) -> &str;

    /// Protocol the card was detected with, if known
    fn protocol(&self) -> Option<&str> {
        None
    }
}

/// A reader paired with the smart card currently selected in it
///
/// Handed out by a [`CardResourceService`] and given back to it on release.
/// Clones share the same reader and card.
#[derive(Clone)]
pub struct CardResource {
    reader: Arc<dyn ReaderSpi>,
    smart_card: Arc<dyn SmartCard>,
}

impl fmt::Debug for CardResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardResource")
            .field("reader", &self.reader.name())
            .field("smart_card", &self.smart_card)
            .finish()
    }
}

impl CardResource {
    /// Create a new card resource
    pub fn new(reader: Arc<dyn ReaderSpi>, smart_card: Arc<dyn SmartCard>) -> Self {
        Self { reader, smart_card }
    }

    /// The reader driver
    pub fn reader(&self) -> &Arc<dyn ReaderSpi> {
        &self.reader
    }

    /// The selected smart card
    pub fn smart_card(&self) -> &Arc<dyn SmartCard> {
        &self.smart_card
    }

    /// Check whether both resources refer to the same reader and card
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.reader, &other.reader) && Arc::ptr_eq(&self.smart_card, &other.smart_card)
    }
}

/// External service managing a pool of card resources
///
/// Implementations are expected to be configured and started before a plugin
/// uses them, and to be safe to call from several threads at once. The service
/// alone decides which resource is free.
pub trait CardResourceService: Send + Sync + fmt::Debug {
    /// Acquire exclusive use of a resource matching the profile
    ///
    /// `Ok(None)` means no resource of the profile is free right now.
    fn get_card_resource(&self, profile_name: &str) -> Result<Option<CardResource>, ServiceError>;

    /// Give a resource back to the pool
    fn release_card_resource(&self, card_resource: CardResource);
}
