//! Toast notification queue.
//!
//! DESIGN
//! ======
//! The queue is plain data so it can be tested natively; the app provides it
//! as `RwSignal<ToastState>` and the rendering layer owns presentation. The
//! signal implements [`Notifier`], which is how the unauthorized handler
//! reports a forced logout.

#[cfg(test)]
#[path = "toast_test.rs"]
mod toast_test;

use leptos::prelude::*;

pub const SUCCESS_TIMEOUT_MS: u32 = 5000;
pub const ERROR_TIMEOUT_MS: u32 = 7000;
pub const INFO_TIMEOUT_MS: u32 = 5000;
pub const WARNING_TIMEOUT_MS: u32 = 6000;

/// Severity of a toast.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    #[default]
    Info,
    Warning,
}

impl ToastKind {
    /// Auto-dismiss delay used when the caller does not pick one.
    pub fn default_timeout_ms(self) -> u32 {
        match self {
            Self::Success => SUCCESS_TIMEOUT_MS,
            Self::Error => ERROR_TIMEOUT_MS,
            Self::Info => INFO_TIMEOUT_MS,
            Self::Warning => WARNING_TIMEOUT_MS,
        }
    }
}

/// A single visible notification. `timeout_ms == 0` means sticky.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub title: Option<String>,
    pub timeout_ms: u32,
}

/// Ordered list of visible toasts, oldest first.
#[derive(Clone, Debug)]
pub struct ToastState {
    pub toasts: Vec<Toast>,
    next_id: u64,
}

impl Default for ToastState {
    fn default() -> Self {
        Self {
            toasts: Vec::new(),
            next_id: 1,
        }
    }
}

impl ToastState {
    /// Append a toast and return its id.
    pub fn push(
        &mut self,
        message: &str,
        kind: ToastKind,
        timeout_ms: u32,
        title: Option<&str>,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            kind,
            message: message.to_owned(),
            title: title.map(str::to_owned),
            timeout_ms,
        });
        id
    }

    pub fn success(&mut self, message: &str, title: Option<&str>) -> u64 {
        self.push(message, ToastKind::Success, SUCCESS_TIMEOUT_MS, title)
    }

    pub fn error(&mut self, message: &str, title: Option<&str>) -> u64 {
        self.push(message, ToastKind::Error, ERROR_TIMEOUT_MS, title)
    }

    pub fn info(&mut self, message: &str, title: Option<&str>) -> u64 {
        self.push(message, ToastKind::Info, INFO_TIMEOUT_MS, title)
    }

    pub fn warning(&mut self, message: &str, title: Option<&str>) -> u64 {
        self.push(message, ToastKind::Warning, WARNING_TIMEOUT_MS, title)
    }

    pub fn get(&self, id: u64) -> Option<&Toast> {
        self.toasts.iter().find(|t| t.id == id)
    }

    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|t| t.id != id);
    }

    pub fn dismiss_all(&mut self) {
        self.toasts.clear();
    }
}

/// Sink for user-facing error messages.
pub trait Notifier {
    fn notify_error(&self, message: &str, title: Option<&str>);
}

impl Notifier for RwSignal<ToastState> {
    fn notify_error(&self, message: &str, title: Option<&str>) {
        let Some(id) = self.try_update(|state| state.error(message, title)) else {
            log::debug!("toast signal disposed, dropping notification: {message}");
            return;
        };
        schedule_dismiss(*self, id, ERROR_TIMEOUT_MS);
    }
}

/// Remove toast `id` from `toasts` after `timeout_ms`. No-op outside the browser.
fn schedule_dismiss(toasts: RwSignal<ToastState>, id: u64, timeout_ms: u32) {
    #[cfg(feature = "hydrate")]
    {
        if timeout_ms > 0 {
            gloo_timers::callback::Timeout::new(timeout_ms, move || {
                toasts.try_update(|state| state.dismiss(id));
            })
            .forget();
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (toasts, id, timeout_ms);
    }
}
