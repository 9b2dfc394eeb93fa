//! Per-slot change listener registry.
//!
//! Subscribing returns a [`ListenerHandle`]; dropping a listener goes
//! through the handle, so there is no remove-by-reference scan and no
//! double-unsubscribe hazard.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::error;

use super::resource::{ResourceData, ResourceKind};

type Callback = Arc<dyn Fn(&ResourceData) + Send + Sync>;

/// Capability to unsubscribe one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerHandle {
    kind: ResourceKind,
    id: u64,
}

impl ListenerHandle {
    /// The slot this listener is registered for.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }
}

#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: AtomicU64,
    entries: Mutex<HashMap<ResourceKind, Vec<(u64, Callback)>>>,
}

impl ListenerRegistry {
    pub(crate) fn subscribe(
        &self,
        kind: ResourceKind,
        callback: impl Fn(&ResourceData) + Send + Sync + 'static,
    ) -> ListenerHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .push((id, Arc::new(callback)));
        ListenerHandle { kind, id }
    }

    /// Returns false if the handle was already unsubscribed.
    pub(crate) fn unsubscribe(&self, handle: &ListenerHandle) -> bool {
        let mut entries = self.entries.lock().unwrap();
        if let Some(listeners) = entries.get_mut(&handle.kind) {
            let before = listeners.len();
            listeners.retain(|(id, _)| *id != handle.id);
            return listeners.len() < before;
        }
        false
    }

    /// Invoke every listener registered for `kind`, in subscription order.
    ///
    /// Callbacks run outside the registry lock so a listener may
    /// re-query the loader or subscribe another listener. A panicking
    /// listener is logged and skipped; the rest are still notified.
    pub(crate) fn notify(&self, kind: ResourceKind, data: &ResourceData) {
        let callbacks: Vec<Callback> = self
            .entries
            .lock()
            .unwrap()
            .get(&kind)
            .map(|listeners| listeners.iter().map(|(_, cb)| cb.clone()).collect())
            .unwrap_or_default();

        for callback in callbacks {
            if catch_unwind(AssertUnwindSafe(|| callback(data))).is_err() {
                error!(resource = %kind, "resource change listener panicked");
            }
        }
    }
}
