//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_api;
mod records_api;
mod session_store;

#[cfg(test)]
pub use auth_api::MockAuthApi;
pub use auth_api::{AuthApi, AuthApiError, FixtureAuthApi};
#[cfg(test)]
pub use records_api::MockRecordsApi;
pub use records_api::{FixtureRecordsApi, RecordsApi, RecordsApiError};
pub use session_store::{MemorySessionStore, SessionStore, SessionStoreError};
