//! Error types for the Frame frontend.
//!
//! - [`ErrorDetail`] - the `detail` payload of a backend error response
//! - [`ApiError`] - every failure an API call can end with
//!
//! [`ApiError`] keeps a developer-facing `Display` (used in console logs)
//! and a separate [`ApiError::user_message`] for the text shown in banners.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// =============================================================================
// Backend error payloads
// =============================================================================

/// One segment of a validation error location (`["body", "images", 0]`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocSegment {
    Index(i64),
    Key(String),
}

impl fmt::Display for LocSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocSegment::Index(i) => write!(f, "{}", i),
            LocSegment::Key(k) => f.write_str(k),
        }
    }
}

/// A field-level validation error as produced by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(default)]
    pub loc: Vec<LocSegment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The first segment is the request part ("body", "query"), not the field.
        let path = self
            .loc
            .iter()
            .skip(1)
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".");
        if !path.is_empty() {
            write!(f, "{}: ", path)?;
        }
        match &self.msg {
            Some(msg) => f.write_str(msg),
            None => {
                let raw = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&raw)
            }
        }
    }
}

/// The `detail` field of an error response.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    /// `{"detail": "Insufficient credits"}`
    Message(String),
    /// `{"detail": [{"loc": [...], "msg": "..."}]}`
    Validation(Vec<FieldError>),
    /// Any other shape, shown as JSON.
    Other(Value),
}

impl ErrorDetail {
    /// Parse the `detail` out of a response body, if there is one.
    pub fn from_body(body: &str) -> Option<Self> {
        #[derive(Deserialize)]
        struct Envelope {
            #[serde(default)]
            detail: Option<ErrorDetail>,
        }

        serde_json::from_str::<Envelope>(body).ok()?.detail
    }

    /// One human-readable line.
    pub fn to_message(&self) -> String {
        match self {
            ErrorDetail::Message(msg) => msg.clone(),
            ErrorDetail::Validation(errors) => errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            ErrorDetail::Other(value) => value.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ErrorDetail::Validation(_))
    }
}

// =============================================================================
// API errors
// =============================================================================

/// Failures of a backend call, classified.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ApiError {
    /// Rejected before any request was sent.
    #[error("Invalid input: {0}")]
    LocalValidation(String),

    /// The backend answered 401.
    #[error("Unauthorized: {}", .detail.as_deref().unwrap_or("no detail"))]
    Unauthorized { detail: Option<String> },

    /// The backend rejected some fields of the request.
    #[error("Validation failed ({status}): {message}")]
    ServerValidation { status: u16, message: String },

    /// Any other non-success status.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// No response: the connection failed.
    #[error("Network error talking to {backend} (reachable: {backend_reachable}): {message}")]
    Network {
        backend: String,
        backend_reachable: bool,
        message: String,
    },

    /// No response before the request deadline.
    #[error("Request to {backend} timed out (reachable: {backend_reachable})")]
    Timeout {
        backend: String,
        backend_reachable: bool,
    },

    /// No response, for a reason we could not classify.
    #[error("Request failed: {0}")]
    Unknown(String),

    /// The response body did not match the expected shape.
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::LocalValidation(msg) => msg.clone(),
            ApiError::Unauthorized { detail } => detail
                .clone()
                .unwrap_or_else(|| "Not authenticated".to_string()),
            ApiError::ServerValidation { message, .. } | ApiError::Server { message, .. } => {
                message.clone()
            }
            ApiError::Network {
                backend,
                backend_reachable: false,
                ..
            }
            | ApiError::Timeout {
                backend,
                backend_reachable: false,
            } => backend_down_message(backend),
            ApiError::Network { message, .. } => format!("Request failed: {}", message),
            ApiError::Timeout { .. } => {
                "Request timed out. The backend is running but did not respond in time.".to_string()
            }
            ApiError::Unknown(msg) if msg.is_empty() => {
                "Request failed. Check the browser console for details.".to_string()
            }
            ApiError::Unknown(msg) => msg.clone(),
            ApiError::Decode(msg) => format!("Unexpected response from server: {}", msg),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

fn backend_down_message(backend: &str) -> String {
    format!(
        "Network error: Cannot connect to backend. Please ensure the backend server is running on {}",
        backend
    )
}

/// Result type for backend calls.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_detail() {
        let detail = ErrorDetail::from_body(r#"{"detail": "Insufficient credits"}"#).unwrap();
        assert_eq!(detail, ErrorDetail::Message("Insufficient credits".into()));
        assert_eq!(detail.to_message(), "Insufficient credits");
    }

    #[test]
    fn test_validation_detail_is_joined() {
        let body = r#"{"detail": [
            {"loc": ["body", "images"], "msg": "field required", "type": "missing"},
            {"loc": ["body", "images", 3], "msg": "invalid file"},
            {"loc": ["body"], "msg": "bad form"}
        ]}"#;
        let detail = ErrorDetail::from_body(body).unwrap();
        assert!(detail.is_validation());
        assert_eq!(
            detail.to_message(),
            "images: field required, images.3: invalid file, bad form"
        );
    }

    #[test]
    fn test_validation_entry_without_msg_is_shown_as_json() {
        let body = r#"{"detail": [{"loc": ["body", "aspect_ratios"], "type": "missing"}]}"#;
        let message = ErrorDetail::from_body(body).unwrap().to_message();
        assert!(message.starts_with("aspect_ratios: {"));
        assert!(message.contains(r#""type":"missing""#));
    }

    #[test]
    fn test_object_detail_falls_back_to_json() {
        let detail = ErrorDetail::from_body(r#"{"detail": {"code": 7}}"#).unwrap();
        assert_eq!(detail.to_message(), r#"{"code":7}"#);
    }

    #[test]
    fn test_missing_or_non_json_detail() {
        assert_eq!(ErrorDetail::from_body(r#"{"message": "nope"}"#), None);
        assert_eq!(ErrorDetail::from_body(r#"{"detail": null}"#), None);
        assert_eq!(ErrorDetail::from_body("<html>502</html>"), None);
    }

    #[test]
    fn test_network_messages_depend_on_reachability() {
        let down = ApiError::Network {
            backend: "http://localhost:8000".into(),
            backend_reachable: false,
            message: "Failed to fetch".into(),
        };
        assert!(down.user_message().contains("Cannot connect to backend"));
        assert!(down.user_message().contains("http://localhost:8000"));

        let up = ApiError::Network {
            backend: "http://localhost:8000".into(),
            backend_reachable: true,
            message: "Failed to fetch".into(),
        };
        assert_eq!(up.user_message(), "Request failed: Failed to fetch");

        let slow = ApiError::Timeout {
            backend: "http://localhost:8000".into(),
            backend_reachable: true,
        };
        assert!(slow.user_message().contains("did not respond in time"));
    }

    #[test]
    fn test_unauthorized_message_uses_detail() {
        let err = ApiError::Unauthorized {
            detail: Some("Incorrect email or password".into()),
        };
        assert!(err.is_unauthorized());
        assert_eq!(err.user_message(), "Incorrect email or password");
        assert_eq!(
            ApiError::Unauthorized { detail: None }.user_message(),
            "Not authenticated"
        );
    }
}
