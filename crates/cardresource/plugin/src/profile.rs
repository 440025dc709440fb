//! Allow-list of card resource profile names

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::ConfigError;

/// Deduplicated set of the profile names a plugin may allocate from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRegistry {
    names: BTreeSet<String>,
}

impl ProfileRegistry {
    /// Create a registry from a collection of profile names
    ///
    /// Fails if the collection is empty or contains an empty name. Duplicates
    /// collapse into one entry.
    pub fn new<I, S>(names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = BTreeSet::new();
        for name in names {
            let name = name.into();
            if name.is_empty() {
                return Err(ConfigError::Empty("profile_name"));
            }
            if let Some(duplicate) = registry.replace(name) {
                debug!(profile = %duplicate, "Duplicate card resource profile ignored");
            }
        }

        if registry.is_empty() {
            return Err(ConfigError::Empty("profile_names"));
        }

        Ok(Self { names: registry })
    }

    /// Create a registry holding a single profile name
    pub fn single(name: impl Into<String>) -> Result<Self, ConfigError> {
        Self::new([name])
    }

    /// Check if the profile is allowed
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Sorted copy of the profile names
    pub fn names(&self) -> BTreeSet<String> {
        self.names.clone()
    }

    /// Iterate over the profile names in order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of profiles
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false, a registry holds at least one profile
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
