//! `localStorage` / `sessionStorage` backend.
//!
//! The handle stores only which facility it maps to and re-resolves the
//! window on every call, the same way the dark-mode and draft helpers read
//! storage. That keeps it `Send + Sync` so it can live inside a signal.
//! Requires a browser environment; other builds report `Unavailable`.

#[cfg(test)]
#[path = "browser_test.rs"]
mod browser_test;

use super::{KeyValueStore, StorageError, StorageKind, StorageResult};

/// Web Storage handle for one of the two browser facilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BrowserStorage {
    kind: StorageKind,
}

impl BrowserStorage {
    pub fn new(kind: StorageKind) -> Self {
        Self { kind }
    }

    /// `localStorage`.
    pub fn persistent() -> Self {
        Self::new(StorageKind::Persistent)
    }

    /// `sessionStorage`.
    pub fn session() -> Self {
        Self::new(StorageKind::Session)
    }

    pub fn kind(&self) -> StorageKind {
        self.kind
    }

    #[cfg(feature = "hydrate")]
    fn resolve(&self) -> StorageResult<web_sys::Storage> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_owned()))?;
        let storage = match self.kind {
            StorageKind::Persistent => window.local_storage(),
            StorageKind::Session => window.session_storage(),
        };
        let missing = || StorageError::Unavailable(format!("{:?} storage missing", self.kind));
        storage
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))?
            .ok_or_else(missing)
    }
}

#[cfg(feature = "hydrate")]
fn access_error(key: &str, err: &impl std::fmt::Debug) -> StorageError {
    StorageError::Access {
        key: key.to_owned(),
        reason: format!("{err:?}"),
    }
}

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        #[cfg(feature = "hydrate")]
        {
            let storage = self.resolve()?;
            storage.get_item(key).map_err(|e| access_error(key, &e))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            Err(not_in_browser())
        }
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        #[cfg(feature = "hydrate")]
        {
            let storage = self.resolve()?;
            storage
                .set_item(key, value)
                .map_err(|e| access_error(key, &e))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (key, value);
            Err(not_in_browser())
        }
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        #[cfg(feature = "hydrate")]
        {
            let storage = self.resolve()?;
            storage
                .remove_item(key)
                .map_err(|e| access_error(key, &e))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            Err(not_in_browser())
        }
    }
}

#[cfg(not(feature = "hydrate"))]
fn not_in_browser() -> StorageError {
    StorageError::Unavailable("not running in a browser".to_owned())
}
