//! CIC console client - async resource layer for the admin console
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod api;
pub mod auth;
pub mod loader;
pub mod models;
pub mod traits;
