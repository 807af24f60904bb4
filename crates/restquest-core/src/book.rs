//! The tutorial's example resource.

use serde::{Deserialize, Serialize};

/// A book as returned by the companion API.
///
/// The client mirrors server state and never derives fields. `author` and
/// `year` can be missing after a `PUT` that left them out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Server-assigned identifier.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Author, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Publication year, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    /// Whether the book can be borrowed.
    #[serde(default)]
    pub available: bool,
}
