//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http**: reqwest-backed client for the landslide backend
//! - **session_file**: cap-std file holding the persisted bearer token
//!
//! Adapters are thin translators between domain types and transport
//! representations. They contain no business logic.

pub mod http;
pub mod session_file;

pub use self::http::HttpBackend;
pub use self::session_file::{FileSessionStore, default_session_path};
