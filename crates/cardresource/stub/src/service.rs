//! In-memory Card Resource Service

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use cardresource_spi::{CardResource, CardResourceService, ServiceError};
use parking_lot::Mutex;
use tracing::{debug, warn};

/// Card Resource Service handing out a fixed set of resources per profile
///
/// A resource listed under several profiles is still allocated at most once.
/// Resources are configured before the service is shared; allocation state is
/// behind a lock so the service can be called from any thread.
#[derive(Debug, Default)]
pub struct StubCardResourceService {
    /// Resources per profile name
    profiles: HashMap<String, Vec<CardResource>>,
    /// Resources currently handed out
    allocated: Mutex<Vec<CardResource>>,
    /// Whether the service is started
    started: AtomicBool,
    /// Number of allocation requests received
    requests: AtomicUsize,
}

impl StubCardResourceService {
    /// Create a new service with no profile
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a profile, with no resource yet
    pub fn with_profile(mut self, profile_name: impl Into<String>) -> Self {
        self.profiles.entry(profile_name.into()).or_default();
        self
    }

    /// Add a resource to a profile, declaring the profile if needed
    pub fn with_resource(mut self, profile_name: impl Into<String>, resource: CardResource) -> Self {
        self.profiles
            .entry(profile_name.into())
            .or_default()
            .push(resource);
        self
    }

    /// Start serving allocations
    pub fn start(&self) {
        self.started.store(true, Ordering::Release);
        debug!(profiles = self.profiles.len(), "Card Resource Service started");
    }

    /// Stop serving allocations and forget every allocation in progress
    pub fn stop(&self) {
        self.started.store(false, Ordering::Release);
        self.allocated.lock().clear();
        debug!("Card Resource Service stopped");
    }

    /// Whether the service is started
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Number of resources currently handed out
    pub fn allocated_count(&self) -> usize {
        self.allocated.lock().len()
    }

    /// Number of allocation requests received so far
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::Acquire)
    }
}

impl CardResourceService for StubCardResourceService {
    fn get_card_resource(&self, profile_name: &str) -> Result<Option<CardResource>, ServiceError> {
        self.requests.fetch_add(1, Ordering::AcqRel);

        if !self.is_started() {
            return Err(ServiceError::NotStarted);
        }

        let resources = self
            .profiles
            .get(profile_name)
            .ok_or(ServiceError::ProfileNotConfigured)?;

        let mut allocated = self.allocated.lock();
        let free = resources
            .iter()
            .find(|resource| !allocated.iter().any(|held| held.same_as(resource)))
            .cloned();

        if let Some(resource) = &free {
            debug!(
                profile = profile_name,
                reader = resource.reader().name(),
                "Card resource allocated"
            );
            allocated.push(resource.clone());
        }

        Ok(free)
    }

    fn release_card_resource(&self, card_resource: CardResource) {
        let mut allocated = self.allocated.lock();
        let before = allocated.len();
        allocated.retain(|held| !held.same_as(&card_resource));

        if allocated.len() == before {
            warn!(
                reader = card_resource.reader().name(),
                "Released a card resource that was not allocated"
            );
        } else {
            debug!(reader = card_resource.reader().name(), "Card resource released");
        }
    }
}
