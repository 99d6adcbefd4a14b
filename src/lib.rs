//! Club H2H CLI Library
//!
//! Head-to-head football statistics backed by API-Football, with a 24-hour
//! expiring cache in front of every API call. The modules are exposed for
//! the binary and for integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod render;
