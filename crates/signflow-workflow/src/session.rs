//! Correlation of a caller session to its agreement id

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use signflow_provider::AgreementId;

/// Opaque identity of a caller session
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey(String);

impl SessionKey {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key-value contract between the workflow and the host's session layer.
///
/// The host owns synchronization; implementations only need to be shareable
/// across tasks.
pub trait SessionCorrelationStore: Send + Sync {
    /// Remember `agreement_id` for `session`, replacing any previous value
    fn put(&self, session: &SessionKey, agreement_id: &AgreementId);

    /// Agreement id stored for `session`, if any
    fn get(&self, session: &SessionKey) -> Option<AgreementId>;

    /// Forget `session`, returning the agreement id it held.
    ///
    /// Hosts call this when the session ends or the signed document has been
    /// delivered; the workflow itself never removes entries.
    fn remove(&self, session: &SessionKey) -> Option<AgreementId>;
}

/// Process-local store for tests and simple embeddings.
///
/// Entries live until [`SessionCorrelationStore::remove`] is called, so a
/// long-running host using it must remove sessions as they end.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    entries: Mutex<HashMap<SessionKey, AgreementId>>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionCorrelationStore for InMemorySessionStore {
    fn put(&self, session: &SessionKey, agreement_id: &AgreementId) {
        // Single inserts never leave the map half-updated, so poisoning is ignored.
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session.clone(), agreement_id.clone());
    }

    fn get(&self, session: &SessionKey) -> Option<AgreementId> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(session)
            .cloned()
    }

    fn remove(&self, session: &SessionKey) -> Option<AgreementId> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(session)
    }
}
