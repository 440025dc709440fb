//! Pool plugin allocating readers from a Card Resource Service

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use cardresource_spi::{CardResourceService, PluginError, PoolPluginSpi, ReaderSpi, ServiceError};
use tracing::{debug, info, trace};

use crate::profile::ProfileRegistry;
use crate::reader::{CardResourceReader, CardResourceReaderAdapter};

/// Pool plugin whose reader groups are card resource profiles
///
/// Holds no allocation state of its own: the service is the only record of
/// which resources are in use.
pub struct CardResourcePluginAdapter {
    /// Plugin name
    plugin_name: String,
    /// Allowed profiles
    profiles: ProfileRegistry,
    /// Service the resources are taken from
    card_resource_service: Arc<dyn CardResourceService>,
}

impl fmt::Debug for CardResourcePluginAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardResourcePluginAdapter")
            .field("plugin_name", &self.plugin_name)
            .field("profiles", &self.profiles)
            .finish_non_exhaustive()
    }
}

impl CardResourcePluginAdapter {
    pub(crate) fn new(
        plugin_name: String,
        card_resource_service: Arc<dyn CardResourceService>,
        profiles: ProfileRegistry,
    ) -> Self {
        Self {
            plugin_name,
            profiles,
            card_resource_service,
        }
    }

    /// The allowed profiles
    pub const fn profiles(&self) -> &ProfileRegistry {
        &self.profiles
    }
}

impl PoolPluginSpi for CardResourcePluginAdapter {
    type Reader = CardResourceReaderAdapter;

    fn name(&self) -> &str {
        &self.plugin_name
    }

    fn reader_group_references(&self) -> BTreeSet<String> {
        self.profiles.names()
    }

    fn allocate_reader(&self, profile_name: &str) -> Result<Self::Reader, PluginError> {
        if !self.profiles.contains(profile_name) {
            return Err(PluginError::UnauthorizedProfile(profile_name.to_owned()));
        }

        let card_resource = match self.card_resource_service.get_card_resource(profile_name) {
            Ok(Some(card_resource)) => card_resource,
            Ok(None) | Err(ServiceError::NotAvailable) => {
                return Err(PluginError::NoResourceAvailable(profile_name.to_owned()));
            }
            Err(ServiceError::ProfileNotConfigured) => {
                return Err(PluginError::ProfileNotConfigured(profile_name.to_owned()));
            }
            Err(ServiceError::NotStarted) => return Err(PluginError::ServiceNotStarted),
        };

        let reader = CardResourceReaderAdapter::new(card_resource);
        debug!(
            plugin = %self.plugin_name,
            profile = profile_name,
            reader = reader.name(),
            "Reader allocated"
        );
        Ok(reader)
    }

    fn release_reader(&self, reader: &mut Self::Reader) {
        match reader.unlink_card_resource() {
            Some(card_resource) => {
                debug!(plugin = %self.plugin_name, reader = reader.name(), "Releasing reader");
                self.card_resource_service
                    .release_card_resource(card_resource);
            }
            None => {
                info!(
                    plugin = %self.plugin_name,
                    reader = reader.name(),
                    "Reader is not linked to a card resource, nothing to release"
                );
            }
        }
    }

    fn on_unregister(&self) {
        trace!(plugin = %self.plugin_name, "Plugin unregistered");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cardresource_spi::{CardResource, PoolReaderSpi};
    use cardresource_stub::{StubCardResourceService, StubReader, StubSmartCard};

    use super::*;

    const PLUGIN_NAME: &str = "CardResourcePlugin";
    const PROFILE_1: &str = "profile1";
    const PROFILE_2: &str = "profile2";
    const PROFILE_3: &str = "profile3";
    const CONTACT_READER_NAME: &str = "contactReader";
    const CONTACTLESS_READER_NAME: &str = "contactLessReader";
    const POWER_ON_DATA: &str = "3B8880010000000000718100F9";

    fn resource(name: &str, contactless: bool) -> CardResource {
        let reader = Arc::new(StubReader::new(name, contactless));
        reader.insert_card(StubSmartCard::new(hex::decode(POWER_ON_DATA).unwrap()));
        reader.card_resource().unwrap()
    }

    fn started_service() -> Arc<StubCardResourceService> {
        let service = StubCardResourceService::new()
            .with_resource(PROFILE_1, resource(CONTACT_READER_NAME, false))
            .with_resource(PROFILE_2, resource(CONTACTLESS_READER_NAME, true));
        service.start();
        Arc::new(service)
    }

    /// Service with every resource busy
    #[derive(Debug)]
    struct ExhaustedService;

    impl CardResourceService for ExhaustedService {
        fn get_card_resource(&self, _profile_name: &str) -> Result<Option<CardResource>, ServiceError> {
            Err(ServiceError::NotAvailable)
        }

        fn release_card_resource(&self, _card_resource: CardResource) {}
    }

    fn adapter(service: Arc<dyn CardResourceService>) -> CardResourcePluginAdapter {
        CardResourcePluginAdapter::new(
            PLUGIN_NAME.to_owned(),
            service,
            ProfileRegistry::new([PROFILE_1, PROFILE_2]).unwrap(),
        )
    }

    #[test]
    fn test_name() {
        assert_eq!(adapter(started_service()).name(), PLUGIN_NAME);
    }

    #[test]
    fn test_reader_group_references() {
        let references = adapter(started_service()).reader_group_references();
        assert_eq!(
            references.into_iter().collect::<Vec<_>>(),
            [PROFILE_1, PROFILE_2]
        );
    }

    #[test]
    fn test_allocate_reader() {
        let service = started_service();
        let adapter = adapter(service.clone());

        let reader = adapter.allocate_reader(PROFILE_1).unwrap();
        assert_eq!(reader.name(), "CARD_RESOURCE_contactReader");
        assert!(reader.card_resource().is_some());
        assert!(!reader.is_contactless());
        assert!(reader.selected_smart_card().is_some());
        assert_eq!(service.allocated_count(), 1);
    }

    #[test]
    fn test_allocate_unauthorized_profile() {
        let service = started_service();
        let adapter = adapter(service.clone());

        let err = adapter.allocate_reader(PROFILE_3).unwrap_err();
        assert_eq!(err, PluginError::UnauthorizedProfile(PROFILE_3.to_owned()));
        assert_eq!(service.request_count(), 0);
    }

    #[test]
    fn test_allocate_no_resource_available() {
        let adapter = adapter(started_service());

        let _reader = adapter.allocate_reader(PROFILE_1).unwrap();
        let err = adapter.allocate_reader(PROFILE_1).unwrap_err();
        assert_eq!(err, PluginError::NoResourceAvailable(PROFILE_1.to_owned()));
    }

    #[test]
    fn test_allocate_service_reports_not_available() {
        let adapter = adapter(Arc::new(ExhaustedService));

        let err = adapter.allocate_reader(PROFILE_2).unwrap_err();
        assert_eq!(err, PluginError::NoResourceAvailable(PROFILE_2.to_owned()));
    }

    #[test]
    fn test_allocate_service_not_started() {
        let service = started_service();
        service.stop();
        let adapter = adapter(service);

        let err = adapter.allocate_reader(PROFILE_1).unwrap_err();
        assert_eq!(err, PluginError::ServiceNotStarted);
    }

    #[test]
    fn test_allocate_profile_unknown_to_service() {
        let service = StubCardResourceService::new()
            .with_resource(PROFILE_1, resource(CONTACT_READER_NAME, false));
        service.start();
        let adapter = adapter(Arc::new(service));

        let err = adapter.allocate_reader(PROFILE_2).unwrap_err();
        assert_eq!(err, PluginError::ProfileNotConfigured(PROFILE_2.to_owned()));
    }

    #[test]
    fn test_release_reader() {
        let service = started_service();
        let adapter = adapter(service.clone());

        let mut reader = adapter.allocate_reader(PROFILE_1).unwrap();
        adapter.release_reader(&mut reader);

        assert!(reader.card_resource().is_none());
        assert_eq!(service.allocated_count(), 0);
        assert!(adapter.allocate_reader(PROFILE_1).is_ok());
    }

    #[test]
    fn test_release_reader_twice() {
        let service = started_service();
        let adapter = adapter(service.clone());

        let mut reader = adapter.allocate_reader(PROFILE_2).unwrap();
        adapter.release_reader(&mut reader);
        adapter.release_reader(&mut reader);

        assert!(reader.card_resource().is_none());
        assert_eq!(service.allocated_count(), 0);
    }

    #[test]
    fn test_release_unregistered_reader() {
        let service = started_service();
        let adapter = adapter(service.clone());

        let mut reader = adapter.allocate_reader(PROFILE_1).unwrap();
        reader.on_unregister();
        adapter.release_reader(&mut reader);

        assert!(reader.card_resource().is_none());
        assert_eq!(service.allocated_count(), 0);
        assert!(adapter.allocate_reader(PROFILE_1).is_ok());
    }

    #[test]
    fn test_on_unregister() {
        adapter(started_service()).on_unregister();
    }
}
