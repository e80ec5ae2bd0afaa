//! Networking modules for the concert backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` makes REST calls with the session's bearer token, `error` defines
//! and classifies failures, and `unauthorized` turns 401/403 into a logout.

pub mod api;
pub mod error;
pub mod unauthorized;
