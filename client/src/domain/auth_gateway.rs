//! Authentication state machine.
//!
//! The gateway owns the session store and the authentication port. It starts
//! in [`AuthState::Loading`], settles once [`AuthGateway::restore_session`]
//! has run, and afterwards moves between unauthenticated and authenticated
//! through sign-in, sign-up and sign-out. Every port failure is converted to
//! a [`ClientError`] here; nothing escapes as a raw port error.
//!
//! Operations take `&mut self`, so at most one sign-in or sign-up can be in
//! flight per gateway.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ports::{AuthApi, AuthApiError, SessionStore};
use crate::domain::{ClientError, ErrorKind, Session, SignInCredentials, SignUpRequest};

/// Shown after a successful sign-in.
pub const SIGNED_IN_MESSAGE: &str = "Logged in successfully!";
/// Shown after registration and the automatic sign-in both succeed.
pub const SIGNED_UP_MESSAGE: &str = "Account created successfully! You are now logged in.";
/// Shown when registration succeeded but the automatic sign-in did not.
pub const AUTO_LOGIN_FAILED_MESSAGE: &str =
    "Account created, but automatic login failed. Please sign in manually.";
/// Shown after sign-out.
pub const SIGNED_OUT_MESSAGE: &str = "Logged out successfully.";

const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password.";
const REGISTRATION_FAILED_MESSAGE: &str = "An unknown error occurred.";
const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// Gateway lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Waiting for the startup restore.
    Loading,
    /// No valid session.
    Unauthenticated,
    /// Signed in.
    Authenticated(Session),
}

/// Request-level view of the gateway used to drive UI gating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRequestState {
    /// Nothing in progress and no error to show.
    Idle,
    /// A restore, sign-in or sign-up is pending.
    Loading,
    /// A session is active.
    Authenticated,
    /// The last operation failed with this message.
    Error(String),
}

/// Last user-facing message produced by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Informational message.
    Info(String),
    /// Failure message.
    Error(ClientError),
}

/// Result of [`AuthGateway::sign_up`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The account was created and the user is signed in.
    SignedIn(Session),
    /// The account was created but the automatic sign-in failed.
    CreatedLoginFailed(ClientError),
    /// Validation or registration failed; no account was created.
    Failed(ClientError),
}

impl SignUpOutcome {
    /// Message to show for this outcome.
    pub fn user_message(&self) -> &str {
        match self {
            Self::SignedIn(_) => SIGNED_UP_MESSAGE,
            Self::CreatedLoginFailed(_) => AUTO_LOGIN_FAILED_MESSAGE,
            Self::Failed(error) => error.message(),
        }
    }

    /// Session, when sign-up ended signed in.
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::SignedIn(session) => Some(session),
            Self::CreatedLoginFailed(_) | Self::Failed(_) => None,
        }
    }
}

/// Authentication gateway over an [`AuthApi`] and a [`SessionStore`].
pub struct AuthGateway<A, S> {
    api: Arc<A>,
    store: Arc<S>,
    state: AuthState,
    notice: Option<Notice>,
}

impl<A, S> AuthGateway<A, S>
where
    A: AuthApi,
    S: SessionStore,
{
    /// Create a gateway in the [`AuthState::Loading`] state.
    pub fn new(api: Arc<A>, store: Arc<S>) -> Self {
        Self {
            api,
            store,
            state: AuthState::Loading,
            notice: None,
        }
    }

    /// Validate the persisted token, if any, and leave the loading state.
    ///
    /// Any failure clears the persisted token, so a second restore finds
    /// nothing. Calling this outside the loading state does nothing.
    pub async fn restore_session(&mut self) -> &AuthState {
        if self.state != AuthState::Loading {
            return &self.state;
        }

        let Some(token) = self.store.restore() else {
            info!("no persisted session");
            self.state = AuthState::Unauthenticated;
            return &self.state;
        };

        match self.api.current_user(&token).await {
            Ok(user) => {
                info!(user_id = user.id(), "restored persisted session");
                self.state = AuthState::Authenticated(Session::new(token, user));
            }
            Err(error) => {
                warn!(%error, "persisted session rejected; clearing it");
                self.persist(None);
                self.state = AuthState::Unauthenticated;
            }
        }
        &self.state
    }

    /// Sign in with raw form input.
    ///
    /// Missing fields are rejected without contacting the backend.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<Session, ClientError> {
        let credentials = SignInCredentials::try_from_parts(email, password)
            .map_err(|err| self.fail(ClientError::validation(err.to_string())))?;
        self.sign_in_with(&credentials, SIGNED_IN_MESSAGE).await
    }

    /// Register a new account, then sign in with the same credentials.
    pub async fn sign_up(&mut self, username: &str, email: &str, password: &str) -> SignUpOutcome {
        let request = match SignUpRequest::try_from_parts(username, email, password) {
            Ok(request) => request,
            Err(err) => {
                return SignUpOutcome::Failed(self.fail(ClientError::validation(err.to_string())));
            }
        };

        let previous = self.enter_loading();
        if let Err(error) = self.api.register(&request).await {
            warn!(%error, "registration failed");
            self.state = previous;
            return SignUpOutcome::Failed(self.fail(map_api_error(error, REGISTRATION_FAILED_MESSAGE)));
        }
        info!("account registered; signing in");
        self.state = previous;

        match self.sign_in_with(request.credentials(), SIGNED_UP_MESSAGE).await {
            Ok(session) => SignUpOutcome::SignedIn(session),
            Err(error) => {
                self.fail(ClientError::new(error.kind(), AUTO_LOGIN_FAILED_MESSAGE));
                SignUpOutcome::CreatedLoginFailed(error)
            }
        }
    }

    /// Drop the session and clear the persisted token. Never fails.
    pub fn sign_out(&mut self) {
        self.persist(None);
        self.state = AuthState::Unauthenticated;
        self.notice = Some(Notice::Info(SIGNED_OUT_MESSAGE.to_owned()));
        info!("signed out");
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Active session, if signed in.
    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            AuthState::Authenticated(session) => Some(session),
            AuthState::Loading | AuthState::Unauthenticated => None,
        }
    }

    /// Last message produced by an operation.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Request-level view of the state and the last notice.
    pub fn request_state(&self) -> AuthRequestState {
        match (&self.state, &self.notice) {
            (AuthState::Loading, _) => AuthRequestState::Loading,
            (_, Some(Notice::Error(error))) => AuthRequestState::Error(error.message().to_owned()),
            (AuthState::Authenticated(_), _) => AuthRequestState::Authenticated,
            (AuthState::Unauthenticated, _) => AuthRequestState::Idle,
        }
    }

    async fn sign_in_with(
        &mut self,
        credentials: &SignInCredentials,
        success_message: &str,
    ) -> Result<Session, ClientError> {
        let previous = self.enter_loading();
        match self.api.sign_in(credentials).await {
            Ok(session) => {
                self.persist(Some(&session));
                info!(user_id = session.user().id(), "signed in");
                self.state = AuthState::Authenticated(session.clone());
                self.notice = Some(Notice::Info(success_message.to_owned()));
                Ok(session)
            }
            Err(error) => {
                warn!(%error, "sign-in failed");
                self.state = previous;
                Err(self.fail(map_api_error(error, INVALID_CREDENTIALS_MESSAGE)))
            }
        }
    }

    /// Switch to loading and return the state to fall back to on failure.
    fn enter_loading(&mut self) -> AuthState {
        self.notice = None;
        match std::mem::replace(&mut self.state, AuthState::Loading) {
            AuthState::Loading => AuthState::Unauthenticated,
            other => other,
        }
    }

    fn fail(&mut self, error: ClientError) -> ClientError {
        self.notice = Some(Notice::Error(error.clone()));
        error
    }

    fn persist(&self, session: Option<&Session>) {
        if let Err(error) = self.store.persist(session) {
            warn!(%error, "session store update failed");
        }
    }
}

fn map_api_error(error: AuthApiError, fallback: &str) -> ClientError {
    match error {
        AuthApiError::Rejected { status, detail } => {
            let kind = if status >= 500 {
                ErrorKind::Server
            } else {
                ErrorKind::Authentication
            };
            ClientError::new(kind, detail.message_or(fallback))
        }
        AuthApiError::Transport { .. } | AuthApiError::Decode { .. } => {
            ClientError::connectivity(NETWORK_ERROR_MESSAGE)
        }
    }
}

#[cfg(test)]
#[path = "auth_gateway_tests.rs"]
mod tests;
