//! Session-gated client for the landslide reporting backend.
//!
//! The [`domain`] module holds the session, query and report rules behind
//! port traits; [`outbound`] adapts those ports to HTTP and the filesystem;
//! [`inbound`] exposes the command line; [`config`] loads settings.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
