//! API error values and their classification.
//!
//! DESIGN
//! ======
//! Errors reach the unauthorized handler as structured JSON values, whether
//! they came from [`ApiError::to_error_value`] or from a raw backend body. The
//! status and message are found by walking fixed, ordered lists of locations;
//! the first present one wins:
//!
//! - status: `statusCode`, `status`, `response.status` (non-zero number)
//! - message: `statusMessage`, `message`, `data.message` (non-empty string)
//!
//! Statuses compare by numeric value, so `401` and `401.0` are the same status.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde_json::{Map, Value, json};

/// Ordered status locations, each a path of object keys.
pub const STATUS_LOCATIONS: [&[&str]; 3] = [&["statusCode"], &["status"], &["response", "status"]];

/// Ordered human-readable message locations.
pub const MESSAGE_LOCATIONS: [&[&str]; 3] =
    [&["statusMessage"], &["message"], &["data", "message"]];

const UNAUTHORIZED: f64 = 401.0;
const FORBIDDEN: f64 = 403.0;

/// Failure of one backend call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("API request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("API Error: {status}")]
    Status {
        status: u16,
        status_text: String,
        data: Option<Value>,
    },

    /// The response body could not be decoded.
    #[error("API response parse failed: {0}")]
    Parse(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request(_) | Self::Parse(_) => None,
        }
    }

    /// Structured shape understood by [`status_code`] and [`error_message`].
    pub fn to_error_value(&self) -> Value {
        let mut shape = Map::new();
        shape.insert("message".to_owned(), json!(self.to_string()));
        if let Self::Status {
            status,
            status_text,
            data,
        } = self
        {
            shape.insert("statusCode".to_owned(), json!(status));
            if !status_text.is_empty() {
                shape.insert("statusMessage".to_owned(), json!(status_text));
            }
            if let Some(data) = data {
                shape.insert("data".to_owned(), data.clone());
            }
        }
        Value::Object(shape)
    }
}

impl From<&ApiError> for Value {
    fn from(err: &ApiError) -> Self {
        err.to_error_value()
    }
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(key))
}

fn status_at(error: &Value, path: &[&str]) -> Option<f64> {
    lookup(error, path)?.as_f64().filter(|s| *s != 0.0)
}

fn message_at<'a>(error: &'a Value, path: &[&str]) -> Option<&'a str> {
    lookup(error, path)?.as_str().filter(|m| !m.is_empty())
}

/// First present status, or `None` when no location holds one.
pub fn status_code(error: &Value) -> Option<f64> {
    STATUS_LOCATIONS
        .iter()
        .find_map(|path| status_at(error, path))
}

/// First present non-empty message.
pub fn error_message(error: &Value) -> Option<&str> {
    MESSAGE_LOCATIONS
        .iter()
        .find_map(|path| message_at(error, path))
}

/// True iff the error's status is 401 or 403. Absent errors are not unauthorized.
pub fn is_unauthorized_error(error: Option<&Value>) -> bool {
    let Some(status) = error.and_then(status_code) else {
        log::debug!("no status found on error value");
        return false;
    };
    status == UNAUTHORIZED || status == FORBIDDEN
}
