//! Event stream facade.
//!
//! The socket transport publishes decoded events into an `EventHub`; the
//! adapter subscribes per event kind and receives a cancel handle back.
//! Cancelling takes the handler table's write lock, so it waits for any
//! delivery in progress and no handler runs after `cancel` returns.
//! Handlers must not subscribe or cancel on the hub that is calling them.

use super::events::{EventKind, PlatformEvent};
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::debug;

/// Callback invoked for each matching event.
pub type EventHandler = Arc<dyn Fn(&PlatformEvent) + Send + Sync>;

/// Cancel capability for a standing subscription.
///
/// Cancelling is idempotent. Dropping the handle cancels it as well.
pub struct Subscription {
    id: u64,
    cancel: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl Subscription {
    pub fn new(id: u64, cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            id,
            cancel: Mutex::new(Some(Box::new(cancel))),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Stop delivery. Returns once no further events can reach the handler.
    pub fn cancel(&self) {
        let cancel = self.cancel.lock().take();
        if let Some(cancel) = cancel {
            cancel();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.lock().is_none()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

struct HubInner {
    handlers: RwLock<BTreeMap<u64, (EventKind, EventHandler)>>,
    next_id: AtomicU64,
}

/// In-process dispatcher for typed platform events.
#[derive(Clone)]
pub struct EventHub {
    inner: Arc<HubInner>,
}

impl EventHub {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(HubInner {
                handlers: RwLock::new(BTreeMap::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Register a handler for one event kind.
    pub fn subscribe(&self, kind: EventKind, handler: EventHandler) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        self.inner.handlers.write().insert(id, (kind, handler));
        debug!(subscription = id, kind = %kind, "Event subscription opened");

        let weak: Weak<HubInner> = Arc::downgrade(&self.inner);
        Subscription::new(id, move || {
            if let Some(inner) = weak.upgrade() {
                inner.handlers.write().remove(&id);
                debug!(subscription = id, "Event subscription cancelled");
            }
        })
    }

    /// Deliver an event to every handler subscribed to its kind.
    ///
    /// Returns the number of handlers invoked.
    pub fn publish(&self, event: &PlatformEvent) -> usize {
        let handlers = self.inner.handlers.read();
        let mut delivered = 0;
        for (kind, handler) in handlers.values() {
            if *kind == event.kind {
                handler(event);
                delivered += 1;
            }
        }
        delivered
    }

    /// Number of live subscriptions, optionally restricted to one kind.
    pub fn subscriber_count(&self, kind: Option<EventKind>) -> usize {
        let handlers = self.inner.handlers.read();
        match kind {
            Some(kind) => handlers.values().filter(|(k, _)| *k == kind).count(),
            None => handlers.len(),
        }
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}
