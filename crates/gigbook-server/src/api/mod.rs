pub mod artists;
pub mod error;
pub mod payload;
pub mod performances;
pub mod users;

use serde::Serialize;

pub use error::ApiError;
pub use payload::Payload;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Parse a path segment as a row id. Anything that is not an integer matches
/// no row, so callers treat `None` exactly like a missing record.
pub fn parse_id(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}

/// Required text field: present and non-empty.
pub fn require_text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
