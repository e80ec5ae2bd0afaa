//! Key-value storage backends for browser-held session data.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session store reads and writes two backends with identical key names:
//! a persistent one (`localStorage`) and a tab-scoped one (`sessionStorage`).
//! Both sit behind [`KeyValueStore`] so tests and SSR can swap in
//! [`MemoryStorage`] without touching `web-sys`.
//!
//! ERROR HANDLING
//! ==============
//! Backends report failures as [`StorageError`]. Callers in `state::session`
//! log and swallow them; nothing above the session boundary sees a storage error.

mod browser;
mod memory;

pub use browser::BrowserStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// No storage is reachable (no window, storage disabled, non-browser build).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The backend rejected a read or write for one key.
    #[error("storage access failed for {key}: {reason}")]
    Access { key: String, reason: String },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Which browser storage facility a backend maps to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageKind {
    /// Survives closing the tab (`localStorage`).
    Persistent,
    /// Cleared when the tab session ends (`sessionStorage`).
    Session,
}

/// String key-value backend. Mirrors the subset of the Web Storage API the
/// session store needs.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}

/// Storage key names shared by both backends.
pub struct StorageKeys;

impl StorageKeys {
    /// Bearer token.
    pub const TOKEN: &'static str = "jwt_token";

    /// User email, optional.
    pub const EMAIL: &'static str = "user_email";

    /// Username, optional.
    pub const USERNAME: &'static str = "username";

    /// `"true"` selects the persistent backend as authoritative. Persistent only.
    pub const REMEMBER_ME: &'static str = "remember_me";

    /// `"true"` once the profile wizard is satisfied. Persistent only.
    pub const PROFILE_COMPLETED: &'static str = "profile_completed";

    /// Path to resume after a forced re-login. Persistent only.
    pub const REDIRECT_AFTER_LOGIN: &'static str = "redirect_after_login";

    /// Keys that describe the logged-in user.
    pub const SESSION: [&'static str; 3] = [Self::TOKEN, Self::EMAIL, Self::USERNAME];

    /// Every key this crate writes.
    pub const ALL: [&'static str; 6] = [
        Self::TOKEN,
        Self::EMAIL,
        Self::USERNAME,
        Self::REMEMBER_ME,
        Self::PROFILE_COMPLETED,
        Self::REDIRECT_AFTER_LOGIN,
    ];
}
