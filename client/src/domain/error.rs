//! Client-level error taxonomy.
//!
//! Every component converts port failures into a [`ClientError`] at its own
//! boundary. Callers only ever see a failure category plus a message that is
//! ready to show to the person at the keyboard.

use std::fmt;

/// Failure category shared by every component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Rejected locally before any network call was made.
    Validation,
    /// Credentials, token or registration were refused by the backend.
    Authentication,
    /// The backend reported that nothing matched.
    NotFound,
    /// Any other non-success response.
    Server,
    /// The request never produced a usable response.
    Connectivity,
}

impl ErrorKind {
    /// Stable snake_case name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Authentication => "authentication",
            Self::NotFound => "not_found",
            Self::Server => "server",
            Self::Connectivity => "connectivity",
        }
    }

    fn fallback_message(self) -> &'static str {
        match self {
            Self::Validation => "Please check the form and try again.",
            Self::Authentication => "Authentication failed.",
            Self::NotFound => "No records found matching your criteria.",
            Self::Server => "The server could not complete the request.",
            Self::Connectivity => "Network error. Please try again.",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-visible failure produced by a component.
///
/// ## Invariants
/// - `message` is never blank; blank input is replaced by a generic message
///   for the kind.
///
/// # Examples
/// ```
/// use landslide_client::domain::{ClientError, ErrorKind};
///
/// let err = ClientError::not_found("   ");
/// assert_eq!(err.kind(), ErrorKind::NotFound);
/// assert_eq!(err.message(), "No records found matching your criteria.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientError {
    kind: ErrorKind,
    message: String,
}

impl ClientError {
    /// Create an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let raw = message.into();
        let text = if raw.trim().is_empty() {
            kind.fallback_message().to_owned()
        } else {
            raw
        };
        Self {
            kind,
            message: text,
        }
    }

    /// Failure category.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Message suitable for display.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Whether the failure was detected without contacting the backend.
    pub fn is_local(&self) -> bool {
        self.kind == ErrorKind::Validation
    }

    /// Convenience constructor for [`ErrorKind::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Convenience constructor for [`ErrorKind::Authentication`].
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// Convenience constructor for [`ErrorKind::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Convenience constructor for [`ErrorKind::Server`].
    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Server, message)
    }

    /// Convenience constructor for [`ErrorKind::Connectivity`].
    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Connectivity, message)
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ClientError {}
