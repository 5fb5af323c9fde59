//! Driven port for the durable session slot.
//!
//! The slot holds one bearer token. Reading never fails: a missing or
//! unreadable slot is reported as "no token", and validating the token is
//! left to the auth gateway.

use std::sync::Mutex;

use super::define_port_error;
use crate::domain::{AuthToken, Session};

define_port_error! {
    /// Errors raised while writing the durable slot.
    pub enum SessionStoreError {
        /// The slot could not be written or cleared.
        Io { message: String } => "session store write failed: {message}",
    }
}

/// Port for reading and writing the persisted bearer token.
pub trait SessionStore: Send + Sync {
    /// Read the persisted token, treating missing or corrupt contents as
    /// absent.
    fn restore(&self) -> Option<AuthToken>;

    /// Write the session's token, or clear the slot when `session` is `None`.
    fn persist(&self, session: Option<&Session>) -> Result<(), SessionStoreError>;
}

/// In-memory slot used by tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<String>>,
}

impl MemorySessionStore {
    /// Create a store whose slot already holds `raw`.
    pub fn with_token(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
        }
    }

    /// Raw slot contents, including values `restore` would reject.
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl SessionStore for MemorySessionStore {
    fn restore(&self) -> Option<AuthToken> {
        let slot = self.slot.lock().ok()?;
        AuthToken::new(slot.as_deref()?).ok()
    }

    fn persist(&self, session: Option<&Session>) -> Result<(), SessionStoreError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|err| SessionStoreError::io(err.to_string()))?;
        *slot = session.map(|session| session.token().expose().to_owned());
        Ok(())
    }
}
