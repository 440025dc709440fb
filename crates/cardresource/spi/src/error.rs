//! Error types shared by the plugin and its collaborators
//!
//! Transmission failures come from reader drivers, allocation failures from
//! pool plugins and availability conditions from the Card Resource Service.

/// Failure raised while exchanging an APDU with a reader
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum TransportError {
    /// The reader itself failed (disconnected, removed, no longer usable)
    #[error("Reader IO error: {0}")]
    ReaderIo(String),

    /// The reader works but the card did not answer as expected
    #[error("Card IO error: {0}")]
    CardIo(String),
}

impl TransportError {
    /// Create a new reader IO error
    pub fn reader_io<S: Into<String>>(message: S) -> Self {
        Self::ReaderIo(message.into())
    }

    /// Create a new card IO error
    pub fn card_io<S: Into<String>>(message: S) -> Self {
        Self::CardIo(message.into())
    }

    /// Check if this error was raised by the card rather than the reader
    pub const fn is_card_io(&self) -> bool {
        matches!(self, Self::CardIo(_))
    }
}

/// Failure raised by a pool plugin when a reader cannot be allocated
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum PluginError {
    /// The requested group reference is not one the plugin was built with
    #[error("Unauthorized card resource profile: {0}")]
    UnauthorizedProfile(String),

    /// The service has no free resource for this profile right now
    #[error("No card resource available for profile {0}")]
    NoResourceAvailable(String),

    /// The service does not know the profile
    #[error("Not configured card resource profile: {0}")]
    ProfileNotConfigured(String),

    /// The service has not been started
    #[error("Card Resource Service not started")]
    ServiceNotStarted,
}

impl PluginError {
    /// The profile the failed allocation was made for, if the error carries one
    pub fn profile_name(&self) -> Option<&str> {
        match self {
            Self::UnauthorizedProfile(name)
            | Self::NoResourceAvailable(name)
            | Self::ProfileNotConfigured(name) => Some(name),
            Self::ServiceNotStarted => None,
        }
    }
}

/// Conditions reported by a Card Resource Service when asked for a resource
#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
pub enum ServiceError {
    /// No resource of the profile is currently free
    #[error("No card resource available")]
    NotAvailable,

    /// The profile is not part of the service configuration
    #[error("Card resource profile not configured")]
    ProfileNotConfigured,

    /// The service has not been configured and started
    #[error("Card Resource Service not started")]
    NotStarted,
}
