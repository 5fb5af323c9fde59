//! Session value objects: bearer token, identity, and the pair of both.
//!
//! A [`Session`] always carries both halves; "no session" is expressed as
//! `Option<Session>` rather than a struct with optional fields.

use std::fmt;

use zeroize::Zeroizing;

/// Validation errors raised while building session values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionValidationError {
    /// Token was missing or blank once trimmed.
    EmptyToken,
    /// User id was missing or blank once trimmed.
    EmptyUserId,
    /// Email was missing or blank once trimmed.
    EmptyEmail,
}

impl fmt::Display for SessionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyToken => write!(f, "token must not be empty"),
            Self::EmptyUserId => write!(f, "user id must not be empty"),
            Self::EmptyEmail => write!(f, "user email must not be empty"),
        }
    }
}

impl std::error::Error for SessionValidationError {}

/// Opaque bearer credential issued by the backend.
///
/// The raw value is zeroed on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(Zeroizing<String>);

impl AuthToken {
    /// Wrap a raw token, trimming surrounding whitespace.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, SessionValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SessionValidationError::EmptyToken);
        }
        Ok(Self(Zeroizing::new(trimmed.to_owned())))
    }

    /// Raw token text, for the `Authorization` header and the durable slot.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Identity of the signed-in user as reported by the backend.
///
/// ## Invariants
/// - `id` and `email` are non-empty once trimmed.
/// - `username` may be empty; [`UserIdentity::display_name`] then falls back
///   to the email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    id: String,
    email: String,
    username: String,
}

impl UserIdentity {
    /// Build an identity from raw parts.
    ///
    /// # Examples
    /// ```
    /// use landslide_client::domain::UserIdentity;
    ///
    /// let user = UserIdentity::try_from_parts("u-1", "ada@example.com", "").unwrap();
    /// assert_eq!(user.display_name(), "ada@example.com");
    /// ```
    pub fn try_from_parts(
        id: &str,
        email: &str,
        username: &str,
    ) -> Result<Self, SessionValidationError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(SessionValidationError::EmptyUserId);
        }
        let email = email.trim();
        if email.is_empty() {
            return Err(SessionValidationError::EmptyEmail);
        }
        Ok(Self {
            id: id.to_owned(),
            email: email.to_owned(),
            username: username.trim().to_owned(),
        })
    }

    /// Backend user identifier.
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Email address used to sign in.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Chosen username, possibly empty.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Name to greet the user with.
    pub fn display_name(&self) -> &str {
        if self.username.is_empty() {
            self.email()
        } else {
            self.username()
        }
    }
}

/// Authenticated session: token plus the identity it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: AuthToken,
    user: UserIdentity,
}

impl Session {
    /// Pair a token with its identity.
    pub fn new(token: AuthToken, user: UserIdentity) -> Self {
        Self { token, user }
    }

    /// Bearer token.
    pub fn token(&self) -> &AuthToken {
        &self.token
    }

    /// Identity of the signed-in user.
    pub fn user(&self) -> &UserIdentity {
        &self.user
    }
}
