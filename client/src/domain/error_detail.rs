//! Decoder for backend error payloads.
//!
//! The backend reports failures under a `detail` key whose shape depends on
//! where the failure was raised: handler errors carry a string, request
//! validation carries a list of field errors, and anything else may appear as
//! an arbitrary JSON value. [`ErrorDetail`] records which shape arrived, in
//! that priority order, so components can render one message.

use std::fmt;

use serde_json::Value;

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Path to the offending input, e.g. `["body", "email"]`.
    pub location: Vec<String>,
    /// Backend explanation for the failure.
    pub message: String,
}

impl FieldError {
    fn from_value(value: &Value) -> Option<Self> {
        let location = match value.get("loc").or_else(|| value.get("location"))? {
            Value::Array(parts) => parts.iter().map(location_part).collect::<Option<Vec<_>>>()?,
            other => vec![location_part(other)?],
        };
        let message = value
            .get("msg")
            .or_else(|| value.get("message"))?
            .as_str()?
            .to_owned();
        Some(Self { location, message })
    }

    fn render(&self) -> String {
        if self.location.is_empty() {
            self.message.clone()
        } else {
            format!("{}: {}", self.location.join("."), self.message)
        }
    }
}

fn location_part(value: &Value) -> Option<String> {
    match value {
        Value::String(part) => Some(part.clone()),
        Value::Number(index) => Some(index.to_string()),
        _ => None,
    }
}

/// Error detail extracted from a backend response body.
///
/// # Examples
/// ```
/// use landslide_client::domain::ErrorDetail;
///
/// let body = br#"{"detail":[{"loc":["body","email"],"msg":"field required"}]}"#;
/// let detail = ErrorDetail::from_body(body);
/// assert_eq!(detail.message().as_deref(), Some("body.email: field required"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorDetail {
    /// `detail` (or a top-level `message`) was a plain string.
    Message(String),
    /// `detail` was a non-empty list of field errors.
    FieldErrors(Vec<FieldError>),
    /// `detail` had some other shape; kept as compact JSON text.
    Opaque(String),
    /// No usable detail was present.
    Missing,
}

impl ErrorDetail {
    /// Decode a raw response body. Bodies that are not JSON yield
    /// [`ErrorDetail::Missing`].
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice::<Value>(body).map_or(Self::Missing, |value| Self::from_value(&value))
    }

    /// Decode an already parsed response body.
    pub fn from_value(value: &Value) -> Self {
        if let Some(detail) = value.get("detail").filter(|detail| is_present(detail)) {
            return Self::from_detail(detail);
        }
        match value.get("message") {
            Some(Value::String(message)) if !message.is_empty() => Self::Message(message.clone()),
            _ => Self::Missing,
        }
    }

    fn from_detail(detail: &Value) -> Self {
        match detail {
            Value::String(message) => Self::Message(message.clone()),
            Value::Array(items) if !items.is_empty() => items
                .iter()
                .map(FieldError::from_value)
                .collect::<Option<Vec<_>>>()
                .map_or_else(|| Self::Opaque(detail.to_string()), Self::FieldErrors),
            other => Self::Opaque(other.to_string()),
        }
    }

    /// Render the detail as one message, if any detail was present.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Message(message) | Self::Opaque(message) => Some(message.clone()),
            Self::FieldErrors(errors) => Some(
                errors
                    .iter()
                    .map(FieldError::render)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            Self::Missing => None,
        }
    }

    /// Render the detail, or `fallback` when nothing usable arrived.
    pub fn message_or(&self, fallback: impl Into<String>) -> String {
        self.message().unwrap_or_else(|| fallback.into())
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => f.write_str(&message),
            None => f.write_str("no detail"),
        }
    }
}

/// Mirrors the truthiness check browsers apply to `detail`: `null`, `false`,
/// `0` and `""` count as absent.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
