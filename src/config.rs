//! Client configuration: routes, auth messages, and backend location.
//!
//! WASM builds have no process environment, so `from_env` reads
//! `CONCERT_BACKEND_BASE_URL` at compile time.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_BACKEND_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_LOGIN_PATH: &str = "/LoginPage";
pub const DEFAULT_HOME_PATH: &str = "/";
pub const DEFAULT_PROFILE_PATH: &str = "/AccountPage";
pub const DEFAULT_SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please login again.";
pub const DEFAULT_UNAUTHORIZED_TITLE: &str = "Authentication Required";
pub const DEFAULT_PROTECTED_ROUTES: [&str; 5] = [
    "/AccountPage",
    "/MyBookingsPage",
    "/MyEventsPage",
    "/CreateEventPage",
    "/EditEventPage",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin API paths are joined onto.
    pub backend_base_url: String,
    /// Where forced logouts and the route guard send the user.
    pub login_path: String,
    /// Post-login landing page when no redirect intent is stored.
    pub home_path: String,
    /// Post-login landing page while the profile is incomplete.
    pub profile_path: String,
    pub session_expired_message: String,
    pub unauthorized_title: String,
    /// Path prefixes that require a token.
    pub protected_routes: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_base_url: DEFAULT_BACKEND_BASE_URL.to_owned(),
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
            home_path: DEFAULT_HOME_PATH.to_owned(),
            profile_path: DEFAULT_PROFILE_PATH.to_owned(),
            session_expired_message: DEFAULT_SESSION_EXPIRED_MESSAGE.to_owned(),
            unauthorized_title: DEFAULT_UNAUTHORIZED_TITLE.to_owned(),
            protected_routes: DEFAULT_PROTECTED_ROUTES
                .iter()
                .map(|r| (*r).to_owned())
                .collect(),
        }
    }
}

impl ClientConfig {
    /// Defaults, with the backend URL taken from `CONCERT_BACKEND_BASE_URL`
    /// when it was set at build time.
    pub fn from_env() -> Self {
        let url = option_env!("CONCERT_BACKEND_BASE_URL").unwrap_or("");
        Self::default().with_backend_base_url(url)
    }

    /// Set the backend URL. Blank values keep the default; trailing slashes are trimmed.
    #[must_use]
    pub fn with_backend_base_url(mut self, url: &str) -> Self {
        let trimmed = url.trim().trim_end_matches('/');
        if !trimmed.is_empty() {
            self.backend_base_url = trimmed.to_owned();
        }
        self
    }

    #[must_use]
    pub fn with_login_path(mut self, path: &str) -> Self {
        self.login_path = path.to_owned();
        self
    }

    #[must_use]
    pub fn with_protected_routes<I, S>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.protected_routes = routes.into_iter().map(Into::into).collect();
        self
    }
}
