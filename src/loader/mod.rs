//! Centralized async resource loading for the admin console.
//!
//! [`AdminResources`] is the single source of truth for the admin-page
//! datasets. It deduplicates concurrent fetches per resource, derives
//! the flattened message list and the dashboard statistics, and notifies
//! registered listeners after a slot's value is stored.
//!
//! Fetch failures never escape the loader: a failed slot load is logged
//! and stored as an empty fallback, so views render an empty table
//! instead of an error banner.
//!
//! # Example
//!
//! ```ignore
//! use cic_console::loader::AdminResources;
//!
//! let resources = AdminResources::new(api);
//! resources.init().await;
//! let stats = resources.get_stats().await;
//! ```

mod listeners;
mod resource;
mod stats;

pub use listeners::ListenerHandle;
pub use resource::{LoaderError, ResourceData, ResourceKind};

use chrono::Utc;
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::models::{Category, Chat, DashboardStats, Message, Session, User};
use listeners::ListenerRegistry;

/// An in-flight load shared between every caller that joins it.
type SharedLoad<T> = Shared<BoxFuture<'static, T>>;

/// Stored slot values. `None` means absent (never loaded or
/// invalidated); `Some` may hold an empty collection.
#[derive(Default)]
struct Slots {
    users: Option<Vec<User>>,
    categories: Option<Vec<Category>>,
    chats: Option<Vec<Chat>>,
    messages: Option<Vec<Message>>,
    sessions: Option<Vec<Session>>,
    stats: Option<DashboardStats>,
}

/// At most one in-flight fetch per slot, tracked separately from the
/// stored value so "loading" is distinguishable from "loaded but empty".
/// `messages` has no entry; it only changes when `chats` loads.
#[derive(Default)]
struct InFlight {
    users: Option<SharedLoad<Vec<User>>>,
    categories: Option<SharedLoad<Vec<Category>>>,
    chats: Option<SharedLoad<Vec<Chat>>>,
    sessions: Option<SharedLoad<Vec<Session>>>,
    stats: Option<SharedLoad<DashboardStats>>,
}

struct Inner {
    api: ApiClient,
    slots: Mutex<Slots>,
    inflight: Mutex<InFlight>,
    listeners: ListenerRegistry,
    init: Mutex<Option<SharedLoad<()>>>,
    initialized: AtomicBool,
    ready: watch::Sender<bool>,
}

/// Cheaply clonable handle to the shared resource cache.
///
/// Construct once at startup and inject into views; clones share state.
#[derive(Clone)]
pub struct AdminResources {
    inner: Arc<Inner>,
}

impl AdminResources {
    /// Create a loader over the given API client. No fetches happen
    /// until [`init`](Self::init) or an accessor is called.
    pub fn new(api: ApiClient) -> Self {
        let (ready, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                api,
                slots: Mutex::new(Slots::default()),
                inflight: Mutex::new(InFlight::default()),
                listeners: ListenerRegistry::default(),
                init: Mutex::new(None),
                initialized: AtomicBool::new(false),
                ready,
            }),
        }
    }

    /// Load every slot concurrently.
    ///
    /// Resolves once all load attempts have settled; a failing slot
    /// never aborts the others. Calling `init` again while the first run
    /// is pending joins the same operation.
    pub async fn init(&self) {
        let fut = {
            let mut init = self.inner.init.lock().unwrap();
            match &*init {
                Some(fut) => fut.clone(),
                None => {
                    let this = self.clone();
                    let fut: SharedLoad<()> = async move {
                        let _ = tokio::join!(
                            this.load_users(),
                            this.load_categories(),
                            this.load_chats(),
                            this.load_sessions(),
                            this.load_stats(),
                        );
                        this.inner.initialized.store(true, Ordering::SeqCst);
                        // `send` is a no-op when no receiver is subscribed;
                        // `send_replace` always stores the latched value.
                        this.inner.ready.send_replace(true);
                        debug!("admin resources initialized");
                    }
                    .boxed()
                    .shared();
                    *init = Some(fut.clone());
                    fut
                }
            }
        };
        fut.await
    }

    /// Resolves once the first [`init`](Self::init) run has completed.
    ///
    /// Dependents await this instead of polling for the loader to become
    /// ready. Latches on first completion; `refresh_all` does not reset it.
    pub async fn ready(&self) {
        let mut rx = self.inner.ready.subscribe();
        // The sender lives in Inner, so the channel cannot close here.
        let _ = rx.wait_for(|ready| *ready).await;
    }

    /// Load users, joining an already in-flight fetch if one exists.
    pub async fn load_users(&self) -> Vec<User> {
        let fut = {
            let mut inflight = self.inner.inflight.lock().unwrap();
            match &inflight.users {
                Some(fut) => fut.clone(),
                None => {
                    let this = self.clone();
                    let fut: SharedLoad<Vec<User>> = async move {
                        let value = match this.inner.api.get_all_users().await {
                            Ok(users) => {
                                this.store_users(users.clone());
                                users
                            }
                            Err(err) => {
                                warn!(error = %err, "failed to load users");
                                this.inner.slots.lock().unwrap().users = Some(Vec::new());
                                Vec::new()
                            }
                        };
                        this.inner.inflight.lock().unwrap().users = None;
                        value
                    }
                    .boxed()
                    .shared();
                    inflight.users = Some(fut.clone());
                    fut
                }
            }
        };
        fut.await
    }

    /// Load categories, joining an already in-flight fetch if one exists.
    pub async fn load_categories(&self) -> Vec<Category> {
        let fut = {
            let mut inflight = self.inner.inflight.lock().unwrap();
            match &inflight.categories {
                Some(fut) => fut.clone(),
                None => {
                    let this = self.clone();
                    let fut: SharedLoad<Vec<Category>> = async move {
                        let value = match this.inner.api.get_all_categories().await {
                            Ok(categories) => {
                                this.store_categories(categories.clone());
                                categories
                            }
                            Err(err) => {
                                warn!(error = %err, "failed to load categories");
                                this.inner.slots.lock().unwrap().categories = Some(Vec::new());
                                Vec::new()
                            }
                        };
                        this.inner.inflight.lock().unwrap().categories = None;
                        value
                    }
                    .boxed()
                    .shared();
                    inflight.categories = Some(fut.clone());
                    fut
                }
            }
        };
        fut.await
    }

    /// Load chats and recompute the derived message list.
    ///
    /// On failure the chats slot keeps its previous snapshot so the
    /// derived messages never drift out of sync with it, and that
    /// retained snapshot is what the caller gets back.
    pub async fn load_chats(&self) -> Vec<Chat> {
        let fut = {
            let mut inflight = self.inner.inflight.lock().unwrap();
            match &inflight.chats {
                Some(fut) => fut.clone(),
                None => {
                    let this = self.clone();
                    let fut: SharedLoad<Vec<Chat>> = async move {
                        let value = match this.inner.api.get_all_chats().await {
                            Ok(chats) => {
                                this.store_chats(chats.clone());
                                chats
                            }
                            Err(err) => {
                                warn!(error = %err, "failed to load chats");
                                this.inner
                                    .slots
                                    .lock()
                                    .unwrap()
                                    .chats
                                    .clone()
                                    .unwrap_or_default()
                            }
                        };
                        this.inner.inflight.lock().unwrap().chats = None;
                        value
                    }
                    .boxed()
                    .shared();
                    inflight.chats = Some(fut.clone());
                    fut
                }
            }
        };
        fut.await
    }

    /// Load sessions, joining an already in-flight fetch if one exists.
    pub async fn load_sessions(&self) -> Vec<Session> {
        let fut = {
            let mut inflight = self.inner.inflight.lock().unwrap();
            match &inflight.sessions {
                Some(fut) => fut.clone(),
                None => {
                    let this = self.clone();
                    let fut: SharedLoad<Vec<Session>> = async move {
                        let value = match this.inner.api.get_all_sessions().await {
                            Ok(sessions) => {
                                this.store_sessions(sessions.clone());
                                sessions
                            }
                            Err(err) => {
                                warn!(error = %err, "failed to load sessions");
                                this.inner.slots.lock().unwrap().sessions = Some(Vec::new());
                                Vec::new()
                            }
                        };
                        this.inner.inflight.lock().unwrap().sessions = None;
                        value
                    }
                    .boxed()
                    .shared();
                    inflight.sessions = Some(fut.clone());
                    fut
                }
            }
        };
        fut.await
    }

    /// Compute the dashboard statistics.
    ///
    /// Stats are derived, not fetched: this first ensures users,
    /// categories, chats and sessions are loaded (joining in-flight
    /// fetches or reusing cached values), then derives the snapshot.
    pub async fn load_stats(&self) -> DashboardStats {
        let fut = {
            let mut inflight = self.inner.inflight.lock().unwrap();
            match &inflight.stats {
                Some(fut) => fut.clone(),
                None => {
                    let this = self.clone();
                    let fut: SharedLoad<DashboardStats> = async move {
                        let _ = tokio::join!(
                            this.get_users(),
                            this.get_categories(),
                            this.get_chats(),
                            this.get_sessions(),
                        );
                        let stats = {
                            let slots = this.inner.slots.lock().unwrap();
                            stats::derive_stats(
                                slots.users.as_deref().unwrap_or_default(),
                                slots.categories.as_deref().unwrap_or_default(),
                                slots.chats.as_deref().unwrap_or_default(),
                                slots.messages.as_deref().unwrap_or_default(),
                                slots.sessions.as_deref().unwrap_or_default(),
                                Utc::now().naive_utc(),
                            )
                        };
                        this.store_stats(stats.clone());
                        this.inner.inflight.lock().unwrap().stats = None;
                        stats
                    }
                    .boxed()
                    .shared();
                    inflight.stats = Some(fut.clone());
                    fut
                }
            }
        };
        fut.await
    }

    /// Cached users, loading them on first access.
    pub async fn get_users(&self) -> Vec<User> {
        let cached = self.inner.slots.lock().unwrap().users.clone();
        match cached {
            Some(users) => users,
            None => self.load_users().await,
        }
    }

    /// Cached categories, loading them on first access.
    pub async fn get_categories(&self) -> Vec<Category> {
        let cached = self.inner.slots.lock().unwrap().categories.clone();
        match cached {
            Some(categories) => categories,
            None => self.load_categories().await,
        }
    }

    /// Cached chats, loading them on first access.
    pub async fn get_chats(&self) -> Vec<Chat> {
        let cached = self.inner.slots.lock().unwrap().chats.clone();
        match cached {
            Some(chats) => chats,
            None => self.load_chats().await,
        }
    }

    /// Cached sessions, loading them on first access.
    pub async fn get_sessions(&self) -> Vec<Session> {
        let cached = self.inner.slots.lock().unwrap().sessions.clone();
        match cached {
            Some(sessions) => sessions,
            None => self.load_sessions().await,
        }
    }

    /// Cached stats, deriving them on first access.
    pub async fn get_stats(&self) -> DashboardStats {
        let cached = self.inner.slots.lock().unwrap().stats.clone();
        match cached {
            Some(stats) => stats,
            None => self.load_stats().await,
        }
    }

    /// Snapshot of the derived message list; empty when chats have not
    /// loaded yet.
    pub fn messages(&self) -> Vec<Message> {
        self.inner
            .slots
            .lock()
            .unwrap()
            .messages
            .clone()
            .unwrap_or_default()
    }

    /// Invalidate one named slot and reload it.
    ///
    /// Only the named slot is touched; refreshing `messages` goes
    /// through a chats reload since messages are derived.
    pub async fn refresh(&self, resource: &str) -> Result<ResourceData, LoaderError> {
        let kind: ResourceKind = resource.parse()?;
        debug!(resource = %kind, "refreshing resource");
        match kind {
            ResourceKind::Users => {
                self.inner.slots.lock().unwrap().users = None;
                Ok(ResourceData::Users(self.load_users().await))
            }
            ResourceKind::Categories => {
                self.inner.slots.lock().unwrap().categories = None;
                Ok(ResourceData::Categories(self.load_categories().await))
            }
            ResourceKind::Chats => {
                self.inner.slots.lock().unwrap().chats = None;
                Ok(ResourceData::Chats(self.load_chats().await))
            }
            ResourceKind::Messages => {
                self.inner.slots.lock().unwrap().messages = None;
                self.load_chats().await;
                Ok(ResourceData::Messages(self.messages()))
            }
            ResourceKind::Sessions => {
                self.inner.slots.lock().unwrap().sessions = None;
                Ok(ResourceData::Sessions(self.load_sessions().await))
            }
            ResourceKind::Stats => {
                self.inner.slots.lock().unwrap().stats = None;
                Ok(ResourceData::Stats(self.load_stats().await))
            }
        }
    }

    /// Clear every slot and re-run [`init`](Self::init) from scratch.
    pub async fn refresh_all(&self) {
        {
            let mut slots = self.inner.slots.lock().unwrap();
            *slots = Slots::default();
        }
        *self.inner.init.lock().unwrap() = None;
        self.inner.initialized.store(false, Ordering::SeqCst);
        self.init().await;
    }

    /// Register a listener for one slot. Returns the handle used to
    /// unsubscribe.
    pub fn on_resource_change(
        &self,
        kind: ResourceKind,
        callback: impl Fn(&ResourceData) + Send + Sync + 'static,
    ) -> ListenerHandle {
        self.inner.listeners.subscribe(kind, callback)
    }

    /// Remove a listener. Returns false if it was already removed.
    pub fn off_resource_change(&self, handle: &ListenerHandle) -> bool {
        self.inner.listeners.unsubscribe(handle)
    }

    /// Optimistic local update: overwrite a slot with a complete new
    /// value and notify its listeners, without a network round-trip.
    ///
    /// An update to chats re-derives the message list. Messages cannot
    /// be set directly; they are a computed view over chats.
    pub fn update_resource(&self, data: ResourceData) {
        match data {
            ResourceData::Users(users) => self.store_users(users),
            ResourceData::Categories(categories) => self.store_categories(categories),
            ResourceData::Chats(chats) => self.store_chats(chats),
            ResourceData::Sessions(sessions) => self.store_sessions(sessions),
            ResourceData::Stats(stats) => self.store_stats(stats),
            ResourceData::Messages(_) => {
                warn!("messages are derived from chats; ignoring direct update");
            }
        }
    }

    /// True iff a fetch for the named slot is currently in flight.
    /// Unknown names and `messages` are never loading.
    pub fn is_loading(&self, resource: &str) -> bool {
        let Ok(kind) = resource.parse::<ResourceKind>() else {
            return false;
        };
        let inflight = self.inner.inflight.lock().unwrap();
        match kind {
            ResourceKind::Users => inflight.users.is_some(),
            ResourceKind::Categories => inflight.categories.is_some(),
            ResourceKind::Chats => inflight.chats.is_some(),
            ResourceKind::Messages => false,
            ResourceKind::Sessions => inflight.sessions.is_some(),
            ResourceKind::Stats => inflight.stats.is_some(),
        }
    }

    /// True once [`init`](Self::init) has completed and every slot,
    /// including the derived messages, holds a value.
    pub fn all_resources_loaded(&self) -> bool {
        if !self.inner.initialized.load(Ordering::SeqCst) {
            return false;
        }
        let slots = self.inner.slots.lock().unwrap();
        slots.users.is_some()
            && slots.categories.is_some()
            && slots.chats.is_some()
            && slots.messages.is_some()
            && slots.sessions.is_some()
            && slots.stats.is_some()
    }

    // Store helpers: the slot value is written before listeners run, so
    // a listener re-querying the accessor sees the just-stored value.

    fn store_users(&self, users: Vec<User>) {
        self.inner.slots.lock().unwrap().users = Some(users.clone());
        self.inner
            .listeners
            .notify(ResourceKind::Users, &ResourceData::Users(users));
    }

    fn store_categories(&self, categories: Vec<Category>) {
        self.inner.slots.lock().unwrap().categories = Some(categories.clone());
        self.inner
            .listeners
            .notify(ResourceKind::Categories, &ResourceData::Categories(categories));
    }

    fn store_chats(&self, chats: Vec<Chat>) {
        let messages: Vec<Message> = chats
            .iter()
            .flat_map(|chat| chat.messages.iter().cloned())
            .collect();
        {
            let mut slots = self.inner.slots.lock().unwrap();
            slots.chats = Some(chats.clone());
            slots.messages = Some(messages.clone());
        }
        self.inner
            .listeners
            .notify(ResourceKind::Chats, &ResourceData::Chats(chats));
        self.inner
            .listeners
            .notify(ResourceKind::Messages, &ResourceData::Messages(messages));
    }

    fn store_sessions(&self, sessions: Vec<Session>) {
        self.inner.slots.lock().unwrap().sessions = Some(sessions.clone());
        self.inner
            .listeners
            .notify(ResourceKind::Sessions, &ResourceData::Sessions(sessions));
    }

    fn store_stats(&self, stats: DashboardStats) {
        self.inner.slots.lock().unwrap().stats = Some(stats.clone());
        self.inner
            .listeners
            .notify(ResourceKind::Stats, &ResourceData::Stats(stats));
    }
}
