//! Reaction policy for 401/403 responses.
//!
//! SYSTEM CONTEXT
//! ==============
//! API call sites hand any error to [`UnauthorizedHandler::handle_api_error`].
//! Auth failures tear down the session, tell the user, remember where they
//! were, and send them to the login page. Everything else is left to the caller.
//!
//! Teardown order is fixed: clear session, notify, store redirect intent,
//! navigate. Notification and navigation are fire-and-forget.

#[cfg(test)]
#[path = "unauthorized_test.rs"]
mod unauthorized_test;

use log::info;
use serde_json::Value;

use super::error::{error_message, is_unauthorized_error};
use crate::config::ClientConfig;
use crate::state::session::SessionStore;
use crate::state::toast::Notifier;

/// Moves the UI to another route.
pub trait Navigator {
    fn navigate(&self, path: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str),
{
    fn navigate(&self, path: &str) {
        self(path);
    }
}

/// Stateless apart from its collaborators and message/route settings.
pub struct UnauthorizedHandler<N, V> {
    notifier: N,
    navigator: V,
    login_path: String,
    default_message: String,
    title: String,
}

impl<N: Notifier, V: Navigator> UnauthorizedHandler<N, V> {
    pub fn new(notifier: N, navigator: V) -> Self {
        Self::with_config(notifier, navigator, &ClientConfig::default())
    }

    pub fn with_config(notifier: N, navigator: V, config: &ClientConfig) -> Self {
        Self {
            notifier,
            navigator,
            login_path: config.login_path.clone(),
            default_message: config.session_expired_message.clone(),
            title: config.unauthorized_title.clone(),
        }
    }

    /// See [`is_unauthorized_error`].
    pub fn is_unauthorized_error(&self, error: Option<&Value>) -> bool {
        is_unauthorized_error(error)
    }

    /// Force a logout. Does not re-check that the error was an auth failure.
    pub fn handle_unauthorized(
        &self,
        session: &mut SessionStore,
        message: Option<&str>,
        redirect_path: Option<&str>,
        show_message: bool,
    ) {
        session.clear_auth();

        if show_message {
            let message = message
                .filter(|m| !m.is_empty())
                .unwrap_or(self.default_message.as_str());
            let title = self.title.as_str();
            self.notifier.notify_error(message, Some(title));
        }

        if let Some(path) = redirect_path.filter(|p| !p.is_empty()) {
            session.set_redirect_after_login(path);
        }

        info!("unauthorized response, redirecting to {}", self.login_path);
        self.navigator.navigate(&self.login_path);
    }

    /// Handle `error` if it is a 401/403 and report whether it was.
    pub fn handle_api_error(
        &self,
        session: &mut SessionStore,
        error: Option<&Value>,
        redirect_path: Option<&str>,
    ) -> bool {
        let Some(error) = error.filter(|e| is_unauthorized_error(Some(*e))) else {
            return false;
        };
        self.handle_unauthorized(session, error_message(error), redirect_path, true);
        true
    }
}
