use chrono::{Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

use crate::traits::Headers;

/// Bearer tokens for the CIC backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Backend sends a LocalDateTime, compared against UTC now
    #[serde(default)]
    pub expires_at: Option<NaiveDateTime>,
}

impl AuthTokens {
    /// True when an access token is present.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// True when the access token has passed its expiry time.
    ///
    /// Tokens without an expiry are treated as non-expiring.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= Utc::now().naive_utc(),
            None => false,
        }
    }

    /// True when the token expires within the given number of minutes and
    /// should be refreshed ahead of time.
    pub fn should_refresh(&self, margin_minutes: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                expires_at <= Utc::now().naive_utc() + Duration::minutes(margin_minutes)
            }
            None => false,
        }
    }
}

/// Shared, mutable token holder injected into the API client.
#[derive(Debug, Default)]
pub struct AuthSession {
    tokens: RwLock<AuthTokens>,
}

impl AuthSession {
    /// Create an unauthenticated session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session from existing tokens.
    pub fn with_tokens(tokens: AuthTokens) -> Self {
        Self {
            tokens: RwLock::new(tokens),
        }
    }

    /// Snapshot of the current tokens.
    pub fn tokens(&self) -> AuthTokens {
        self.tokens.read().unwrap().clone()
    }

    /// Replace the stored tokens, e.g. after sign-in or a refresh.
    pub fn set_tokens(&self, tokens: AuthTokens) {
        *self.tokens.write().unwrap() = tokens;
    }

    /// Drop all tokens (sign-out).
    pub fn clear(&self) {
        *self.tokens.write().unwrap() = AuthTokens::default();
    }

    /// Headers for an authenticated JSON request.
    ///
    /// Without an access token only the content type is set, matching the
    /// backend's expectation for anonymous endpoints.
    pub fn auth_headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        if let Some(token) = &self.tokens.read().unwrap().access_token {
            headers.insert("Authorization".to_string(), format!("Bearer {token}"));
        }
        headers
    }
}
