//! First-contact baseline registration.
//!
//! When a storage node mints a new session identifier, the client must
//! register a baseline sequence position with the cluster's coordination
//! service before the connection is handed out. The service sits behind a
//! trait so the pool never hard-depends on a concrete tracker and tests can
//! substitute a fake.

use std::fmt;

use async_trait::async_trait;

/// Error returned by a baseline registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryError(String);

impl RegistryError {
    /// Create a registry error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for RegistryError {}

/// Coordination-service capability invoked on first contact.
#[async_trait]
pub trait BaselineRegistry: Send + Sync {
    /// Register the starting sequence position for a newly issued session
    /// identifier.
    ///
    /// The pool calls this at most once per new identifier; the service side
    /// must treat repeated registrations as idempotent.
    async fn register_baseline(
        &self,
        session_id: &str,
        start_position: u64,
    ) -> Result<(), RegistryError>;
}

/// Registry that accepts every registration without side effects.
///
/// Used by clients that do not operate in first-contact-tracking mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRegistry;

#[async_trait]
impl BaselineRegistry for NoopRegistry {
    async fn register_baseline(
        &self,
        _session_id: &str,
        _start_position: u64,
    ) -> Result<(), RegistryError> {
        Ok(())
    }
}
