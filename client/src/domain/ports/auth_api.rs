//! Driven port for the backend's authentication endpoints.
//!
//! Adapters translate HTTP outcomes into [`AuthApiError`]; the auth gateway
//! turns those into user-visible messages.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{
    AuthToken, ErrorDetail, Session, SignInCredentials, SignUpRequest, UserIdentity,
};

define_port_error! {
    /// Errors raised by authentication adapters.
    pub enum AuthApiError {
        /// The backend answered with a non-success status.
        Rejected { status: u16, detail: ErrorDetail } => "backend rejected request ({status}): {detail}",
        /// No response was obtained.
        Transport { message: String } => "authentication transport failed: {message}",
        /// A success response carried an unusable payload.
        Decode { message: String } => "authentication payload malformed: {message}",
    }
}

/// Port for sign-in, registration and token validation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Resolve the identity that owns `token`.
    async fn current_user(&self, token: &AuthToken) -> Result<UserIdentity, AuthApiError>;

    /// Exchange credentials for a session.
    async fn sign_in(&self, credentials: &SignInCredentials) -> Result<Session, AuthApiError>;

    /// Create an account. Does not sign in.
    async fn register(&self, request: &SignUpRequest) -> Result<(), AuthApiError>;
}

/// Fixed-account authenticator for demos and tests.
///
/// Accepts `ada@example.com` / `password` and the token it issues.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAuthApi;

impl FixtureAuthApi {
    const EMAIL: &'static str = "ada@example.com";
    const PASSWORD: &'static str = "password";
    const TOKEN: &'static str = "fixture-token";

    fn identity() -> Result<UserIdentity, AuthApiError> {
        UserIdentity::try_from_parts("1", Self::EMAIL, "ada")
            .map_err(|err| AuthApiError::decode(err.to_string()))
    }

    fn unauthorized(message: &str) -> AuthApiError {
        AuthApiError::rejected(401_u16, ErrorDetail::Message(message.to_owned()))
    }
}

#[async_trait]
impl AuthApi for FixtureAuthApi {
    async fn current_user(&self, token: &AuthToken) -> Result<UserIdentity, AuthApiError> {
        if token.expose() == Self::TOKEN {
            Self::identity()
        } else {
            Err(Self::unauthorized("Could not validate credentials"))
        }
    }

    async fn sign_in(&self, credentials: &SignInCredentials) -> Result<Session, AuthApiError> {
        if credentials.email() != Self::EMAIL || credentials.password() != Self::PASSWORD {
            return Err(Self::unauthorized("Incorrect email or password"));
        }
        let token =
            AuthToken::new(Self::TOKEN).map_err(|err| AuthApiError::decode(err.to_string()))?;
        Ok(Session::new(token, Self::identity()?))
    }

    async fn register(&self, request: &SignUpRequest) -> Result<(), AuthApiError> {
        if request.email() == Self::EMAIL {
            return Err(AuthApiError::rejected(
                400_u16,
                ErrorDetail::Message("Email already registered".to_owned()),
            ));
        }
        Ok(())
    }
}
