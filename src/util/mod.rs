//! Cross-page helpers.

pub mod auth;
