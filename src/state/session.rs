//! Session store: who is logged in, kept in step with browser storage.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `SessionStore` is built at startup and provided through context
//! (`app::provide_session_context`). The API layer reads the token from it,
//! the route guard reads login state from it, and the unauthorized handler
//! tears it down.
//!
//! DESIGN
//! ======
//! Two backends share the same key names. Exactly one is authoritative at a
//! time: the persistent backend when `remember_me == "true"`, otherwise the
//! tab-scoped one. Login state is derived from token presence and never
//! stored separately.
//!
//! ERROR HANDLING
//! ==============
//! Storage failures are logged and swallowed here. A failed load leaves the
//! session logged out; a failed write or removal is skipped.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::storage::{BrowserStorage, KeyValueStore, StorageKeys, StorageResult};

/// The logged-in user as held in memory. Holding one means a token is present.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub token: String,
    pub email: Option<String>,
    pub username: Option<String>,
}

/// Login result handed to [`SessionStore::save_auth`]. Matches the backend's
/// `/api/auth/login` response body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// How [`SessionStore::load_from_storage`] picks its source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Read only the backend selected by `remember_me`.
    #[default]
    RememberGated,
    /// Take the persistent token if one exists, else the tab-scoped one,
    /// ignoring `remember_me`.
    PersistentFirst,
}

/// Browser-tab-wide authentication state.
#[derive(Clone)]
pub struct SessionStore {
    persistent: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
    policy: LoadPolicy,
    user: Option<AuthUser>,
    remember: bool,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("policy", &self.policy)
            .field("logged_in", &self.is_logged_in())
            .field("remember", &self.remember)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Empty (logged out) store over the given backends.
    pub fn new(
        persistent: Arc<dyn KeyValueStore>,
        session: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            persistent,
            session,
            policy: LoadPolicy::default(),
            user: None,
            remember: false,
        }
    }

    /// Store over `localStorage` and `sessionStorage`.
    pub fn browser() -> Self {
        let persistent = Arc::new(BrowserStorage::persistent());
        Self::new(persistent, Arc::new(BrowserStorage::session()))
    }

    #[must_use]
    pub fn with_load_policy(mut self, policy: LoadPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn load_policy(&self) -> LoadPolicy {
        self.policy
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.token.as_str())
    }

    pub fn email(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.email.as_deref())
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.username.as_deref())
    }

    /// Whether the current session lives in the persistent backend.
    pub fn remember(&self) -> bool {
        self.remember
    }

    /// Replace in-memory state with whatever the authoritative backend holds.
    ///
    /// A record without a token counts as no session. Any storage failure
    /// leaves the store logged out.
    pub fn load_from_storage(&mut self) {
        let loaded = match self.policy {
            LoadPolicy::RememberGated => self.read_remember_gated(),
            LoadPolicy::PersistentFirst => self.read_persistent_first(),
        };
        match loaded {
            Ok((user, remember)) => {
                let logged_in = user.is_some();
                debug!("session loaded: logged_in={logged_in} remember={remember}");
                self.user = user;
                self.remember = remember;
            }
            Err(e) => {
                warn!("session load failed, treating as logged out: {e}");
                self.user = None;
                self.remember = false;
            }
        }
    }

    /// Record a successful login.
    ///
    /// Session keys are first removed from both backends, then the payload is
    /// written to the backend `remember_me` selects. In-memory state always
    /// follows the payload, even when a storage write fails.
    pub fn save_auth(&mut self, payload: AuthPayload, remember_me: bool) {
        for store in [&self.persistent, &self.session] {
            remove_keys(store.as_ref(), &StorageKeys::SESSION);
        }

        let target = if remember_me {
            self.persistent.as_ref()
        } else {
            self.session.as_ref()
        };
        write_non_empty(target, StorageKeys::TOKEN, Some(&payload.token));
        write_non_empty(target, StorageKeys::EMAIL, payload.email.as_deref());
        write_non_empty(target, StorageKeys::USERNAME, payload.username.as_deref());

        let flag = if remember_me {
            self.persistent.set_item(StorageKeys::REMEMBER_ME, "true")
        } else {
            self.persistent.remove_item(StorageKeys::REMEMBER_ME)
        };
        if let Err(e) = flag {
            warn!("failed to update {}: {e}", StorageKeys::REMEMBER_ME);
        }

        self.remember = remember_me;
        self.user = user_from_parts(Some(payload.token), payload.email, payload.username);
        if self.is_logged_in() {
            info!("session saved: remember={remember_me}");
        } else {
            warn!("login payload had no token, session left logged out");
        }
    }

    /// Log out: remove every key from both backends and reset memory.
    pub fn clear_auth(&mut self) {
        for store in [&self.persistent, &self.session] {
            remove_keys(store.as_ref(), &StorageKeys::ALL);
        }
        self.user = None;
        self.remember = false;
        info!("session cleared");
    }

    /// True unless the persistent `profile_completed` flag is exactly `"true"`.
    pub fn should_complete_profile(&self) -> bool {
        match self.persistent.get_item(StorageKeys::PROFILE_COMPLETED) {
            Ok(value) => value.as_deref() != Some("true"),
            Err(e) => {
                warn!("failed to read {}: {e}", StorageKeys::PROFILE_COMPLETED);
                true
            }
        }
    }

    pub fn mark_profile_completed(&self, completed: bool) {
        let key = StorageKeys::PROFILE_COMPLETED;
        let value = if completed { "true" } else { "false" };
        if let Err(e) = self.persistent.set_item(key, value) {
            warn!("failed to write {key}: {e}");
        }
    }

    /// Remember where to send the user once they log in again.
    pub fn set_redirect_after_login(&self, path: &str) {
        let key = StorageKeys::REDIRECT_AFTER_LOGIN;
        if let Err(e) = self.persistent.set_item(key, path) {
            warn!("failed to write {key}: {e}");
        }
    }

    pub fn redirect_after_login(&self) -> Option<String> {
        let key = StorageKeys::REDIRECT_AFTER_LOGIN;
        self.persistent
            .get_item(key)
            .inspect_err(|e| warn!("failed to read {key}: {e}"))
            .ok()
            .flatten()
            .filter(|path| !path.is_empty())
    }

    /// Read and remove the stored redirect path.
    pub fn take_redirect_after_login(&self) -> Option<String> {
        let path = self.redirect_after_login()?;
        let keys = [StorageKeys::REDIRECT_AFTER_LOGIN];
        remove_keys(self.persistent.as_ref(), &keys);
        Some(path)
    }

    fn read_remember_gated(&self) -> StorageResult<(Option<AuthUser>, bool)> {
        let flag = self.persistent.get_item(StorageKeys::REMEMBER_ME)?;
        let remember = flag.as_deref() == Some("true");
        let source = if remember {
            self.persistent.as_ref()
        } else {
            self.session.as_ref()
        };
        Ok((read_user(source)?, remember))
    }

    fn read_persistent_first(&self) -> StorageResult<(Option<AuthUser>, bool)> {
        if let Some(user) = read_user(self.persistent.as_ref())? {
            return Ok((Some(user), true));
        }
        Ok((read_user(self.session.as_ref())?, false))
    }
}

fn read_user(store: &dyn KeyValueStore) -> StorageResult<Option<AuthUser>> {
    let token = store.get_item(StorageKeys::TOKEN)?;
    let email = store.get_item(StorageKeys::EMAIL)?;
    let username = store.get_item(StorageKeys::USERNAME)?;
    Ok(user_from_parts(token, email, username))
}

/// Build a user from raw fields. Empty strings count as absent; no token, no user.
fn user_from_parts(
    token: Option<String>,
    email: Option<String>,
    username: Option<String>,
) -> Option<AuthUser> {
    let token = token.filter(|t| !t.is_empty())?;
    Some(AuthUser {
        token,
        email: email.filter(|e| !e.is_empty()),
        username: username.filter(|u| !u.is_empty()),
    })
}

fn write_non_empty(store: &dyn KeyValueStore, key: &str, value: Option<&str>) {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return;
    };
    if let Err(e) = store.set_item(key, value) {
        warn!("failed to write {key}: {e}");
    }
}

fn remove_keys(store: &dyn KeyValueStore, keys: &[&str]) {
    for key in keys {
        if let Err(e) = store.remove_item(key) {
            warn!("failed to remove {key}: {e}");
        }
    }
}
