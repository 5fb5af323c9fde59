//! Inbound adapters that translate user input into domain service calls
//! while keeping terminal and argument-parsing details at the edge.
//!
//! The command-line surface lives under [`cli`].

pub mod cli;
