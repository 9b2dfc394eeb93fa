//! Integration tests for fetch deduplication, caching and per-resource
//! refresh in the resource loader.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use common::{loader_with_mock, slow_loader_with_mock, CHATS_URL, USERS_URL};
use cic_console::adapters::mock::MockResponse;
use cic_console::loader::{LoaderError, ResourceData, ResourceKind};
use cic_console::traits::HttpError;

// ============================================================================
// Deduplication of concurrent loads
// ============================================================================

#[tokio::test]
async fn test_concurrent_loads_share_one_fetch() {
    common::init_tracing();
    let (loader, mock) = slow_loader_with_mock(Duration::from_millis(50));

    let (first, second, third) =
        tokio::join!(loader.load_users(), loader.load_users(), loader.load_users());

    assert_eq!(mock.request_count("/api/user/getAll"), 1);
    assert_eq!(first, second);
    assert_eq!(second, third);
    assert_eq!(first.len(), 2);
}

#[tokio::test]
async fn test_loads_of_different_resources_do_not_share() {
    let (loader, mock) = slow_loader_with_mock(Duration::from_millis(30));

    tokio::join!(loader.load_users(), loader.load_categories());

    assert_eq!(mock.request_count("/api/user/getAll"), 1);
    assert_eq!(mock.request_count("/api/category/getAll"), 1);
}

#[tokio::test]
async fn test_load_after_completion_fetches_again() {
    let (loader, mock) = loader_with_mock();

    loader.load_users().await;
    loader.load_users().await;

    // Explicit load bypasses the cache; only concurrent calls coalesce.
    assert_eq!(mock.request_count("/api/user/getAll"), 2);
}

// ============================================================================
// Cached accessors
// ============================================================================

#[tokio::test]
async fn test_get_returns_cached_value_without_refetch() {
    let (loader, mock) = loader_with_mock();

    let loaded = loader.get_users().await;
    let cached = loader.get_users().await;

    assert_eq!(loaded, cached);
    assert_eq!(mock.request_count("/api/user/getAll"), 1);
}

#[tokio::test]
async fn test_get_joins_inflight_load() {
    let (loader, mock) = slow_loader_with_mock(Duration::from_millis(50));

    let (loaded, got) = tokio::join!(loader.load_chats(), loader.get_chats());

    assert_eq!(loaded, got);
    assert_eq!(mock.request_count("/api/chat/getAll"), 1);
}

// ============================================================================
// Failure fallbacks
// ============================================================================

#[tokio::test]
async fn test_failed_users_load_stores_empty_fallback() {
    let (loader, mock) = loader_with_mock();
    mock.set_response(
        USERS_URL,
        MockResponse::Error(HttpError::ConnectionFailed("refused".to_string())),
    );

    let users = loader.load_users().await;
    assert!(users.is_empty());

    // The empty fallback is cached; get does not retry.
    let cached = loader.get_users().await;
    assert!(cached.is_empty());
    assert_eq!(mock.request_count("/api/user/getAll"), 1);
}

#[tokio::test]
async fn test_failed_chats_load_keeps_previous_snapshot() {
    let (loader, mock) = loader_with_mock();

    let chats = loader.load_chats().await;
    assert_eq!(chats.len(), 2);
    let messages = loader.messages();
    assert_eq!(messages.len(), 3);

    mock.set_response(
        CHATS_URL,
        MockResponse::Error(HttpError::Timeout("deadline".to_string())),
    );
    let reloaded = loader.load_chats().await;

    // Cached chats and derived messages survive the failed reload, and
    // the caller gets that same retained snapshot back.
    assert_eq!(reloaded, chats);
    assert_eq!(loader.get_chats().await, chats);
    assert_eq!(loader.messages(), messages);
}

#[tokio::test]
async fn test_failed_chats_load_with_no_prior_snapshot_is_empty() {
    let (loader, mock) = loader_with_mock();
    mock.set_response(
        CHATS_URL,
        MockResponse::Error(HttpError::Timeout("deadline".to_string())),
    );

    let chats = loader.load_chats().await;
    assert!(chats.is_empty());
    assert!(loader.messages().is_empty());
}

#[tokio::test]
async fn test_http_error_status_stores_empty_fallback() {
    let (loader, mock) = loader_with_mock();
    mock.set_json_response(
        common::SESSIONS_URL,
        403,
        &serde_json::json!({"message": "admin only"}),
    );

    let sessions = loader.load_sessions().await;
    assert!(sessions.is_empty());
}

// ============================================================================
// refresh
// ============================================================================

#[tokio::test]
async fn test_refresh_refetches_one_resource() {
    let (loader, mock) = loader_with_mock();

    loader.get_users().await;
    loader.get_categories().await;
    mock.clear_requests();

    let data = loader.refresh("users").await.unwrap();
    assert!(matches!(data, ResourceData::Users(users) if users.len() == 2));

    assert_eq!(mock.request_count("/api/user/getAll"), 1);
    assert_eq!(mock.request_count("/api/category/getAll"), 0);
}

#[tokio::test]
async fn test_refresh_unknown_resource_is_an_error() {
    let (loader, mock) = loader_with_mock();

    let err = loader.refresh("presets").await.unwrap_err();
    assert_eq!(err, LoaderError::UnknownResource("presets".to_string()));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_refresh_messages_goes_through_chats() {
    let (loader, mock) = loader_with_mock();

    let data = loader.refresh("messages").await.unwrap();
    assert!(matches!(data, ResourceData::Messages(messages) if messages.len() == 3));
    assert_eq!(mock.request_count("/api/chat/getAll"), 1);
}

// ============================================================================
// is_loading
// ============================================================================

#[tokio::test]
async fn test_is_loading_tracks_inflight_fetch() {
    let (loader, _mock) = slow_loader_with_mock(Duration::from_millis(50));

    assert!(!loader.is_loading("users"));

    let load = {
        let loader = loader.clone();
        tokio::spawn(async move { loader.load_users().await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(loader.is_loading("users"));
    assert!(!loader.is_loading("categories"));

    load.await.unwrap();
    assert!(!loader.is_loading("users"));
}

#[tokio::test]
async fn test_is_loading_unknown_and_derived_names() {
    let (loader, _mock) = loader_with_mock();
    assert!(!loader.is_loading("presets"));
    assert!(!loader.is_loading("messages"));
}

// ============================================================================
// update_resource and listeners
// ============================================================================

#[tokio::test]
async fn test_update_resource_overwrites_without_network() {
    let (loader, mock) = loader_with_mock();
    loader.get_users().await;
    mock.clear_requests();

    loader.update_resource(ResourceData::Users(vec![]));

    assert!(loader.get_users().await.is_empty());
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_update_resource_messages_is_ignored() {
    let (loader, _mock) = loader_with_mock();
    loader.load_chats().await;
    let derived = loader.messages();

    loader.update_resource(ResourceData::Messages(vec![]));
    assert_eq!(loader.messages(), derived);
}

#[tokio::test]
async fn test_listener_fires_after_store() {
    let (loader, _mock) = loader_with_mock();
    let seen = Arc::new(AtomicUsize::new(0));

    let seen_clone = seen.clone();
    loader.on_resource_change(ResourceKind::Users, move |data| {
        if let ResourceData::Users(users) = data {
            seen_clone.store(users.len(), Ordering::SeqCst);
        }
    });

    loader.load_users().await;
    assert_eq!(seen.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_listener_not_notified_on_failed_load() {
    let (loader, mock) = loader_with_mock();
    mock.set_response(
        USERS_URL,
        MockResponse::Error(HttpError::ConnectionFailed("refused".to_string())),
    );

    let fired = Arc::new(AtomicUsize::new(0));
    let fired_clone = fired.clone();
    loader.on_resource_change(ResourceKind::Users, move |_| {
        fired_clone.fetch_add(1, Ordering::SeqCst);
    });

    loader.load_users().await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unsubscribed_listener_stops_firing() {
    let (loader, _mock) = loader_with_mock();
    let fired = Arc::new(AtomicUsize::new(0));

    let fired_clone = fired.clone();
    let handle = loader.on_resource_change(ResourceKind::Categories, move |_| {
        fired_clone.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(handle.kind(), ResourceKind::Categories);

    loader.load_categories().await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    assert!(loader.off_resource_change(&handle));
    assert!(!loader.off_resource_change(&handle));

    loader.load_categories().await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_listener_can_read_stored_value_reentrantly() {
    let (loader, _mock) = loader_with_mock();
    let seen = Arc::new(AtomicUsize::new(0));

    let seen_clone = seen.clone();
    let loader_clone = loader.clone();
    loader.on_resource_change(ResourceKind::Chats, move |_| {
        // Accessing the loader from inside a callback must not deadlock,
        // and must observe the value that triggered the notification.
        seen_clone.store(loader_clone.messages().len(), Ordering::SeqCst);
    });

    loader.load_chats().await;
    assert_eq!(seen.load(Ordering::SeqCst), 3);
}
