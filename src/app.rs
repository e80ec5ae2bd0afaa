//! Application-wide context: one session store, one toast queue, one config.
//!
//! DESIGN
//! ======
//! The session store is built once at startup and shared by context rather
//! than living in a global, so tests can create as many independent stores
//! as they like.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::config::ClientConfig;
use crate::net::error::{ApiError, is_unauthorized_error};
use crate::net::unauthorized::{Navigator, UnauthorizedHandler};
use crate::state::session::SessionStore;
use crate::state::toast::{Notifier, ToastState};

/// Build the browser session, load it from storage, and provide all shared
/// contexts. Call once from the root component.
pub fn provide_session_context(config: ClientConfig) -> RwSignal<SessionStore> {
    let mut store = SessionStore::browser();
    store.load_from_storage();

    let session = RwSignal::new(store);
    provide_context(session);
    provide_context(RwSignal::new(ToastState::default()));
    provide_context(config);
    session
}

pub fn use_session() -> RwSignal<SessionStore> {
    expect_context::<RwSignal<SessionStore>>()
}

pub fn use_toasts() -> RwSignal<ToastState> {
    expect_context::<RwSignal<ToastState>>()
}

pub fn use_client_config() -> ClientConfig {
    expect_context::<ClientConfig>()
}

/// Closure API call sites hand failures to. Returns `true` when the error
/// was a 401/403 and the session has been torn down.
///
/// Must be called inside the router.
pub fn use_api_error_handler() -> impl Fn(&ApiError, Option<&str>) -> bool + Clone + 'static {
    let session = use_session();
    let toasts = use_toasts();
    let config = use_client_config();
    let navigate = use_navigate();

    move |error: &ApiError, redirect_path: Option<&str>| {
        let navigate = navigate.clone();
        let navigator = move |path: &str| navigate(path, NavigateOptions::default());
        let handler = UnauthorizedHandler::with_config(toasts, navigator, &config);
        handle_session_api_error(session, &handler, error, redirect_path)
    }
}

/// Run `handler` against the shared session signal.
///
/// The signal is logged out before the handler runs, so anything the
/// notifier or navigator triggers already sees the cleared session. The
/// handler itself works on a copy and never runs under the write lock.
pub fn handle_session_api_error<N, V>(
    session: RwSignal<SessionStore>,
    handler: &UnauthorizedHandler<N, V>,
    error: &ApiError,
    redirect_path: Option<&str>,
) -> bool
where
    N: Notifier,
    V: Navigator,
{
    let value = error.to_error_value();
    if !is_unauthorized_error(Some(&value)) {
        return false;
    }
    session.update(SessionStore::clear_auth);

    let Some(mut store) = session.try_get_untracked() else {
        log::debug!("session signal disposed, skipping unauthorized handling");
        return false;
    };
    handler.handle_api_error(&mut store, Some(&value), redirect_path)
}
