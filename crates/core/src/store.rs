//! Key/value storage for visitor preferences.
//!
//! Values are plain strings (`"true"`, `"dark"`, ...). A store is a
//! single-writer resource; every write replaces the whole value for its key.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error raised by a [`PreferenceStore`] backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached or refused the operation.
    #[error("preference store unavailable: {0}")]
    Unavailable(String),
}

/// Persistent string key/value storage.
pub trait PreferenceStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// In-memory store.
///
/// Serializes as a flat JSON object so the site can keep one per visitor
/// session and write it back wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been stored yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Read and parse `key`, treating read failures and unparseable values as absent.
pub(crate) fn load<T: FromStr>(store: &impl PreferenceStore, key: &str) -> Option<T> {
    match store.get(key) {
        Ok(Some(raw)) => raw.parse().ok().or_else(|| {
            tracing::warn!(key, value = %raw, "ignoring unparseable stored preference");
            None
        }),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(key, error = %e, "preference read failed, using default");
            None
        }
    }
}

/// Write `value` under `key`, logging instead of failing.
pub(crate) fn persist(store: &mut impl PreferenceStore, key: &str, value: impl ToString) {
    if let Err(e) = store.set(key, &value.to_string()) {
        tracing::warn!(key, error = %e, "preference write failed, keeping in-memory value");
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{PreferenceStore, StoreError};

    /// Store whose every operation fails.
    #[derive(Debug, Default)]
    pub struct BrokenStore;

    impl PreferenceStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("disk on fire".to_owned()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disk on fire".to_owned()))
        }
    }
}
