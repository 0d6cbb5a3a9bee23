//! Subscriber manager - one entry per live connection.
//!
//! # Lifecycle
//!
//! ```text
//! register(scope) ──▶ EventQueue + bus subscription (filter = audience admits scope)
//!        │
//!        ▼
//! transport forwards queue → socket
//!        │
//!        ▼ (disconnect, push failure, push timeout, or bus closing a stalled queue)
//! deregister(id) ──▶ bus.unsubscribe (removes and closes queue in one step)
//! ```
//!
//! `deregister` is the only teardown path and is safe to call any number of
//! times from any task. `close_all` runs it for every entry at shutdown;
//! connections registered after that start out closed.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::domain::events::Event;
use crate::domain::foundation::AuthScope;
use crate::ports::{EventSink, EventSubscriber, SubscriptionId};

use super::queue::{EventQueue, QueueSettings};

/// Server-generated identifier of a live connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a transport holds for its connection.
#[derive(Debug, Clone)]
pub struct SubscriberHandle {
    id: SubscriberId,
    scope: AuthScope,
    queue: Arc<EventQueue>,
}

impl SubscriberHandle {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn scope(&self) -> AuthScope {
        self.scope
    }

    pub fn queue(&self) -> &Arc<EventQueue> {
        &self.queue
    }

    /// Next event for this connection; `None` once it has been torn down.
    pub async fn next_event(&self) -> Option<Arc<Event>> {
        self.queue.recv().await
    }
}

struct Entry {
    subscription: SubscriptionId,
    scope: AuthScope,
}

/// Tracks live connections and their bus subscriptions.
pub struct SubscriberManager {
    bus: Arc<dyn EventSubscriber>,
    settings: QueueSettings,
    entries: Mutex<HashMap<SubscriberId, Entry>>,
    closing: AtomicBool,
}

impl SubscriberManager {
    pub fn new(bus: Arc<dyn EventSubscriber>, settings: QueueSettings) -> Self {
        Self {
            bus,
            settings,
            entries: Mutex::new(HashMap::new()),
            closing: AtomicBool::new(false),
        }
    }

    /// Register a connection that has already been authorized as `scope`.
    pub fn register(&self, scope: AuthScope) -> SubscriberHandle {
        let id = SubscriberId::new();
        let queue = Arc::new(EventQueue::new(self.settings));

        let mut entries = self.entries();
        if self.closing.load(Ordering::SeqCst) {
            queue.close();
            tracing::debug!(subscriber_id = %id, "registration after shutdown, queue closed");
            return SubscriberHandle { id, scope, queue };
        }

        let subscription = self.bus.subscribe(
            Box::new(move |event: &Event| event.audience.admits(&scope)),
            queue.clone(),
        );
        entries.insert(id, Entry { subscription, scope });
        drop(entries);

        tracing::debug!(
            subscriber_id = %id,
            subscription = %subscription,
            role = ?scope.role,
            station_id = ?scope.station_id,
            "subscriber registered"
        );

        SubscriberHandle { id, scope, queue }
    }

    /// Tear a connection down. Returns false if it was already gone.
    pub fn deregister(&self, id: SubscriberId) -> bool {
        let entry = self.entries().remove(&id);
        match entry {
            Some(entry) => {
                let was_subscribed = self.bus.unsubscribe(entry.subscription);
                tracing::debug!(
                    subscriber_id = %id,
                    role = ?entry.scope.role,
                    stalled = !was_subscribed,
                    "subscriber deregistered"
                );
                true
            }
            None => false,
        }
    }

    /// Deregisters every connection and refuses new ones. Each transport
    /// sees its queue end and finishes its response.
    pub fn close_all(&self) -> usize {
        let drained: Vec<(SubscriberId, Entry)> = {
            let mut entries = self.entries();
            self.closing.store(true, Ordering::SeqCst);
            entries.drain().collect()
        };

        for (_, entry) in &drained {
            self.bus.unsubscribe(entry.subscription);
        }
        tracing::info!(closed = drained.len(), "closed all subscribers");
        drained.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.entries().len()
    }

    pub fn is_registered(&self, id: SubscriberId) -> bool {
        self.entries().contains_key(&id)
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<SubscriberId, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
