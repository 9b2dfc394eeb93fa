//! Concrete implementations of the collaborator traits.
//!
//! The production adapter wraps `reqwest`; the mock adapter records
//! requests so tests can count network calls.

pub mod mock;
mod reqwest_http;

pub use reqwest_http::ReqwestHttpClient;
