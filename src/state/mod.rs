//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by concern (`session`, `toast`) so the API layer and route
//! guard depend only on the session store, and rendering code only on toasts.

pub mod session;
pub mod toast;
