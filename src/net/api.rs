//! REST API helpers for the concert backend.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR) and native tests: every call fails with
//! `ApiError::Request` since these endpoints are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become `ApiError::Status` carrying the JSON body when
//! there is one. Callers pass `err.to_error_value()` to the unauthorized
//! handler, which decides whether the failure ends the session.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::error::ApiError;
use crate::config::{ClientConfig, DEFAULT_BACKEND_BASE_URL};
use crate::state::session::AuthPayload;

pub const LOGIN_ENDPOINT: &str = "/api/auth/login";
pub const CURRENT_USER_ENDPOINT: &str = "/api/auth/me";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// Join `path` onto `base`. Absolute `http…` paths pass through unchanged.
pub fn build_backend_url(base: &str, path: &str) -> String {
    if path.is_empty() {
        return base.to_owned();
    }
    if path.starts_with("http") {
        return path.to_owned();
    }
    let base = match base.trim_end_matches('/') {
        "" => DEFAULT_BACKEND_BASE_URL,
        trimmed => trimmed,
    };
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// `Authorization` header value for a held token.
pub fn bearer_header(token: Option<&str>) -> Option<String> {
    token
        .filter(|t| !t.is_empty())
        .map(|t| format!("Bearer {t}"))
}

fn login_body(username_or_email: &str, password: &str) -> Value {
    json!({
        "usernameOrEmail": username_or_email,
        "password": password,
    })
}

/// HTTP client bound to one backend origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_owned(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.backend_base_url)
    }

    pub fn endpoint(&self, path: &str) -> String {
        build_backend_url(&self.base_url, path)
    }

    /// Send a JSON request, attaching `token` as a bearer credential.
    ///
    /// # Errors
    ///
    /// `Request` when the call cannot be made, `Status` for non-2xx responses,
    /// `Parse` when the body does not decode as `T`.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> Result<T, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            use gloo_net::http::Request;

            let url = self.endpoint(path);
            let mut builder = match method {
                HttpMethod::Get => Request::get(&url),
                HttpMethod::Post => Request::post(&url),
                HttpMethod::Put => Request::put(&url),
                HttpMethod::Delete => Request::delete(&url),
            }
            .header("Content-Type", "application/json");
            if let Some(auth) = bearer_header(token) {
                builder = builder.header("Authorization", &auth);
            }
            let request = match body {
                Some(body) => builder.json(body),
                None => builder.build(),
            }
            .map_err(|e| ApiError::Request(e.to_string()))?;

            let resp = request
                .send()
                .await
                .map_err(|e| ApiError::Request(e.to_string()))?;
            if !resp.ok() {
                let status = resp.status();
                let status_text = resp.status_text();
                let data = resp.json::<Value>().await.ok();
                log::debug!("{method:?} {url} failed with {status}");
                return Err(ApiError::Status {
                    status,
                    status_text,
                    data,
                });
            }
            resp.json::<T>()
                .await
                .map_err(|e| ApiError::Parse(e.to_string()))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (method, path, token, body);
            Err(ApiError::Request("not available on server".to_owned()))
        }
    }

    /// Exchange credentials for a token via `POST /api/auth/login`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch_json`].
    pub async fn login(
        &self,
        username_or_email: &str,
        password: &str,
    ) -> Result<AuthPayload, ApiError> {
        let body = login_body(username_or_email, password);
        self.fetch_json(HttpMethod::Post, LOGIN_ENDPOINT, None, Some(&body))
            .await
    }

    /// Fetch the authenticated user's profile from `/api/auth/me`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch_json`].
    pub async fn fetch_current_user(&self, token: Option<&str>) -> Result<Value, ApiError> {
        self.fetch_json(HttpMethod::Get, CURRENT_USER_ENDPOINT, token, None)
            .await
    }
}
