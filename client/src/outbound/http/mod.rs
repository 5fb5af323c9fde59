//! HTTP outbound adapter.
//!
//! This module provides a thin reqwest implementation of the `AuthApi` and
//! `RecordsApi` ports.

mod backend;
mod dto;

pub use backend::HttpBackend;
