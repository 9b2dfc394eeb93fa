//! Common test utilities for integration tests.
//!
//! Provides sample backend payloads and a helper that wires an
//! [`AdminResources`] loader to a [`MockHttpClient`], so tests can
//! assert both observable behavior and the exact network traffic.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use cic_console::adapters::mock::MockHttpClient;
use cic_console::api::ApiClient;
use cic_console::auth::{AuthSession, AuthTokens};
use cic_console::loader::AdminResources;

pub const BASE_URL: &str = "http://backend";

/// Route test logs through `RUST_LOG`; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub const USERS_URL: &str = "http://backend/api/user/getAll";
pub const CATEGORIES_URL: &str = "http://backend/api/category/getAll";
pub const CHATS_URL: &str = "http://backend/api/chat/getAll";
pub const SESSIONS_URL: &str = "http://backend/api/session/getAll";

/// Tokens that will not expire during a test run.
pub fn test_tokens() -> AuthTokens {
    AuthTokens {
        access_token: Some("test-access-token-12345".to_string()),
        refresh_token: Some("test-refresh-token-67890".to_string()),
        expires_at: None,
    }
}

/// Two users, one of them banned, one recently joined.
pub fn users_payload() -> Value {
    json!({
        "message": "users fetched",
        "data": [
            {
                "id": 1,
                "email": "alice@campus.edu",
                "name": "Alice",
                "role": "ADMIN",
                "joinedAt": "2026-08-20T09:00:00",
                "banned": false
            },
            {
                "id": 2,
                "email": "bob@campus.edu",
                "name": "Bob",
                "joinedAt": "2025-01-01T09:00:00",
                "banned": true
            }
        ]
    })
}

pub fn categories_payload() -> Value {
    json!({
        "message": "categories fetched",
        "data": [
            {"id": 1, "name": "Enrollment", "presets": ["How do I enroll?"]},
            {"id": 2, "name": "Housing", "presets": []}
        ]
    })
}

/// Two chats for two users; three messages total, two categorized.
pub fn chats_payload() -> Value {
    json!({
        "message": "chats fetched",
        "data": [
            {
                "id": "7f5ef2a8-3e7c-4f0a-9a44-111111111111",
                "userId": 1,
                "title": "Enrollment questions",
                "messages": [
                    {
                        "id": 10,
                        "userMessage": "How do I enroll?",
                        "botMessage": "Visit the portal.",
                        "like": true,
                        "category": "Enrollment"
                    },
                    {
                        "id": 11,
                        "userMessage": "Thanks!",
                        "botMessage": "Anytime.",
                        "like": null,
                        "category": "Enrollment"
                    }
                ]
            },
            {
                "id": "7f5ef2a8-3e7c-4f0a-9a44-222222222222",
                "userId": 2,
                "title": "Hello",
                "messages": [
                    {
                        "id": 12,
                        "userMessage": "hi",
                        "botMessage": "Hello!",
                        "like": false,
                        "category": null
                    }
                ]
            }
        ]
    })
}

pub fn sessions_payload() -> Value {
    json!({
        "message": "sessions fetched",
        "data": [
            {"id": 1, "userId": 1, "active": true},
            {"id": 2, "userId": 2, "active": false}
        ]
    })
}

/// A loader wired to a mock with every endpoint stubbed successfully.
pub fn loader_with_mock() -> (AdminResources, MockHttpClient) {
    let mock = MockHttpClient::new();
    mock.set_json_response(USERS_URL, 200, &users_payload());
    mock.set_json_response(CATEGORIES_URL, 200, &categories_payload());
    mock.set_json_response(CHATS_URL, 200, &chats_payload());
    mock.set_json_response(SESSIONS_URL, 200, &sessions_payload());

    let api = ApiClient::new(
        Arc::new(mock.clone()),
        BASE_URL,
        Arc::new(AuthSession::with_tokens(test_tokens())),
    );
    (AdminResources::new(api), mock)
}

/// Same as [`loader_with_mock`] but every request takes `delay`, so
/// tests can overlap a second caller with an in-flight fetch.
pub fn slow_loader_with_mock(delay: Duration) -> (AdminResources, MockHttpClient) {
    let (loader, mock) = loader_with_mock();
    mock.set_delay(delay);
    (loader, mock)
}
