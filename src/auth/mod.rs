//! Bearer-token state for authenticated API calls.
//!
//! Token persistence and refresh scheduling live outside this crate; the
//! session here only holds the current tokens and builds request headers.

mod credentials;

pub use credentials::{AuthSession, AuthTokens};
