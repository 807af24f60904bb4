//! Response records shown to the learner.
//!
//! Every request outcome, whether it failed locally, never reached the
//! server, or came back with any HTTP status, is reduced to a single
//! [`DisplayRecord`]. The view doesn't distinguish them beyond the text.

use serde::{Deserialize, Serialize};

/// Status line used for failures detected on the client.
pub const LOCAL_FAILURE_STATUS: &str = "400 Bad Request";

/// Outcome of the last API interaction.
///
/// Replaced wholesale on every request, never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRecord {
    /// `true` for 2xx responses.
    pub success: bool,
    /// `"<code> <reason>"`, e.g. `"200 OK"`.
    pub status_line: String,
    /// Pretty-printed JSON or a literal message.
    pub body_text: String,
}

impl DisplayRecord {
    /// Creates a record from a received HTTP response.
    #[must_use]
    pub fn from_response(status: u16, body_text: impl Into<String>) -> Self {
        Self {
            success: (200..=299).contains(&status),
            status_line: status_line(status),
            body_text: body_text.into(),
        }
    }
}

impl From<RequestFailure> for DisplayRecord {
    fn from(failure: RequestFailure) -> Self {
        let body_text = serde_json::json!({ "error": failure.to_string() }).to_string();
        Self {
            success: false,
            status_line: LOCAL_FAILURE_STATUS.to_string(),
            body_text,
        }
    }
}

/// Formats `"<code> <canonical reason>"` for a status code.
#[must_use]
pub fn status_line(status: u16) -> String {
    let reason = reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason());
    match reason {
        Some(reason) => format!("{status} {reason}"),
        None => status.to_string(),
    }
}

/// A request that failed without an HTTP response to show.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestFailure {
    /// Input was missing or malformed; nothing was sent.
    #[error("{0}")]
    Validation(String),

    /// The server could not be reached or answered with something unreadable.
    #[error("Failed to {operation}. Make sure the server is running.")]
    Transport {
        /// What the learner tried to do, e.g. `"create book"`.
        operation: &'static str,
    },
}

impl RequestFailure {
    /// Creates a validation failure with the given message.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a transport failure for the given operation.
    #[must_use]
    pub const fn transport(operation: &'static str) -> Self {
        Self::Transport { operation }
    }
}
