//! API error taxonomy

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, timeout, TLS failure
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("not found: {path}")]
    NotFound { path: String },

    /// Any other non-2xx response
    #[error("API request failed: {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            Self::Status { status, .. } => Some(*status),
            Self::Network(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Pull the human readable `message` out of an error body, if there is one
///
/// Validation errors may carry a list of messages; those are joined.
pub(crate) fn server_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(|v| v.get("message")).and_then(|m| match m {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("; "),
        ),
        _ => None,
    });
    message.unwrap_or_default()
}

/// Format an API error for the status line
pub fn format_api_error(error: &ApiError) -> String {
    match error {
        ApiError::Network(e) if e.is_timeout() => {
            "Request timed out. Is the club API running?".to_string()
        },
        ApiError::Network(e) if e.is_connect() => {
            "Cannot reach the club API. Check the API URL and your network.".to_string()
        },
        ApiError::Network(_) => {
            "Request failed. Check your network connection and try again.".to_string()
        },
        ApiError::NotFound { .. } => "Record not found. It may have been deleted.".to_string(),
        ApiError::Status { status, message } => {
            let friendly = match status.as_u16() {
                401 | 403 => "Permission denied.",
                409 => "Conflict. The record may already exist or be in use.",
                400 | 422 => "The server rejected the data.",
                429 => "Rate limit exceeded. Please try again later.",
                500..=599 => "Club API temporarily unavailable. Please try again.",
                _ => "Request failed.",
            };
            if message.is_empty() {
                friendly.to_string()
            } else {
                format!("{} {}", friendly, truncate(message, 80))
            }
        },
        ApiError::Decode(_) => "Unexpected response from the club API.".to_string(),
        ApiError::InvalidUrl(_) => "Invalid API URL.".to_string(),
    }
}

fn truncate(text: &str, max: usize) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_control())
        .take(max)
        .collect();
    if cleaned.chars().count() < text.chars().count() {
        format!("{}...", cleaned)
    } else {
        cleaned
    }
}
