//! Trait abstractions for external collaborators.
//!
//! The resource layer talks to the backend exclusively through these
//! traits so tests can swap in mock implementations.

mod http;

pub use http::{Headers, HttpClient, HttpError, Response};
