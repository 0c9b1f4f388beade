//! shopseg HTTP server library
//!
//! Exposes the REST API, configuration and service wiring for tests and reuse.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
