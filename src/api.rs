//! Typed client for the CIC REST API.
//!
//! Wraps an [`HttpClient`] implementation, attaches bearer-auth headers,
//! and normalizes the backend's `{message, data}` envelope into typed
//! results. The resource loader consumes this client and absorbs its
//! errors; nothing here reaches the UI directly.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

use crate::auth::{AuthSession, AuthTokens};
use crate::models::{Category, Chat, Session, User};
use crate::traits::{Headers, HttpClient, HttpError};

/// Errors from one API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection, timeout, body read)
    #[error("transport error: {0}")]
    Transport(#[from] HttpError),
    /// Backend answered with a non-2xx status
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    /// Response body was not the expected JSON shape
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    /// Operation needs tokens the session does not hold
    #[error("not authenticated")]
    NotAuthenticated,
}

/// The backend's response envelope. Every endpoint wraps its payload as
/// `{ "message": ..., "data": ... }`; `data` may be absent.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<T>,
}

/// Client for the CIC backend REST API.
#[derive(Clone)]
pub struct ApiClient {
    http: Arc<dyn HttpClient>,
    base_url: String,
    session: Arc<AuthSession>,
}

impl ApiClient {
    /// Create a client against the given base URL.
    pub fn new(http: Arc<dyn HttpClient>, base_url: impl Into<String>, session: Arc<AuthSession>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    /// The auth session this client attaches to requests.
    pub fn session(&self) -> &Arc<AuthSession> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET an endpoint and unwrap the envelope's `data`, defaulting when
    /// the backend omits it.
    async fn get_data<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Default,
    {
        let response = self
            .http
            .get(&self.url(path), &self.session.auth_headers())
            .await?;

        if !response.is_success() {
            let message = response
                .json::<ApiEnvelope<serde_json::Value>>()
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or_else(|| "request failed".to_string());
            return Err(ApiError::Status {
                status: response.status,
                message,
            });
        }

        let envelope: ApiEnvelope<T> = response.json()?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// `GET /api/user/getAll`
    pub async fn get_all_users(&self) -> Result<Vec<User>, ApiError> {
        self.get_data("/api/user/getAll").await
    }

    /// `GET /api/category/getAll`
    pub async fn get_all_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get_data("/api/category/getAll").await
    }

    /// `GET /api/chat/getAll`
    pub async fn get_all_chats(&self) -> Result<Vec<Chat>, ApiError> {
        self.get_data("/api/chat/getAll").await
    }

    /// `GET /api/session/getAll`
    pub async fn get_all_sessions(&self) -> Result<Vec<Session>, ApiError> {
        self.get_data("/api/session/getAll").await
    }

    /// `POST /api/session/refresh-token` — exchange the stored refresh
    /// token for new tokens and store them in the session.
    ///
    /// Sent without the Authorization header: the refresh token itself is
    /// the credential.
    pub async fn refresh_token(&self) -> Result<AuthTokens, ApiError> {
        let refresh = self
            .session
            .tokens()
            .refresh_token
            .ok_or(ApiError::NotAuthenticated)?;

        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        let body = serde_json::json!({ "token": refresh }).to_string();

        let response = self
            .http
            .post(&self.url("/api/session/refresh-token"), &body, &headers)
            .await?;

        if !response.is_success() {
            let message = response
                .json::<ApiEnvelope<serde_json::Value>>()
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or_else(|| "token refresh failed".to_string());
            return Err(ApiError::Status {
                status: response.status,
                message,
            });
        }

        let envelope: ApiEnvelope<AuthTokens> = response.json()?;
        let tokens = envelope.data.ok_or(ApiError::Status {
            status: response.status,
            message: "token refresh returned no data".to_string(),
        })?;

        self.session.set_tokens(tokens.clone());
        Ok(tokens)
    }
}
