//! Route guard and post-login routing.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected pages must apply identical unauthenticated redirect behavior,
//! and the login form must land users where they were headed. Both decisions
//! are plain functions over the session store; `install_route_guard` wires
//! the guard to the router.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use log::info;

use crate::config::ClientConfig;
use crate::state::session::{AuthPayload, SessionStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    RedirectToLogin,
}

/// True when `path` falls under one of the configured protected prefixes.
pub fn is_protected_route(path: &str, config: &ClientConfig) -> bool {
    config
        .protected_routes
        .iter()
        .any(|prefix| path.starts_with(prefix.as_str()))
}

/// Decide whether `path` may render.
///
/// The session is reloaded first so a logout in another tab is noticed. A
/// blocked path is stored as the redirect intent.
pub fn guard_route(
    session: &mut SessionStore,
    path: &str,
    config: &ClientConfig,
) -> RouteDecision {
    if !is_protected_route(path, config) {
        return RouteDecision::Allow;
    }
    session.load_from_storage();
    if session.is_logged_in() {
        return RouteDecision::Allow;
    }
    info!("not logged in, redirecting {path} to {}", config.login_path);
    session.set_redirect_after_login(path);
    RouteDecision::RedirectToLogin
}

/// Where to go right after a successful login.
///
/// An incomplete profile wins and leaves any redirect intent in place for
/// later; otherwise the intent is consumed, falling back to home.
pub fn post_login_destination(session: &SessionStore, config: &ClientConfig) -> String {
    if session.should_complete_profile() {
        return config.profile_path.clone();
    }
    session
        .take_redirect_after_login()
        .unwrap_or_else(|| config.home_path.clone())
}

/// Save the login and return the route to navigate to.
pub fn complete_login(
    session: &mut SessionStore,
    payload: AuthPayload,
    remember: bool,
    config: &ClientConfig,
) -> String {
    session.save_auth(payload, remember);
    post_login_destination(session, config)
}

/// Guard `path` against the shared session and navigate to the login page
/// when it is blocked. Disposed sessions allow everything.
pub fn run_route_guard<F>(
    session: RwSignal<SessionStore>,
    path: &str,
    config: &ClientConfig,
    navigate: &F,
) -> RouteDecision
where
    F: Fn(&str, NavigateOptions),
{
    let decision = session
        .try_update(|s| guard_route(s, path, config))
        .unwrap_or(RouteDecision::Allow);
    if decision == RouteDecision::RedirectToLogin {
        navigate(&config.login_path, NavigateOptions::default());
    }
    decision
}

/// Run [`run_route_guard`] whenever `pathname` changes.
pub fn install_route_guard<F>(
    session: RwSignal<SessionStore>,
    pathname: Memo<String>,
    config: ClientConfig,
    navigate: F,
) where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        let path = pathname.get();
        run_route_guard(session, &path, &config, &navigate);
    });
}
