//! Keyed async locks.
//!
//! A handler that writes an aggregate and then publishes its event holds the
//! aggregate's lock across both steps, so event sequence numbers follow
//! commit order for that aggregate. Handlers that touch the same aggregate
//! must share one `KeyedLocks`.
//!
//! Placing an order takes the locks of every product it references, so a
//! concurrent discontinue either lands before the availability check or
//! waits until the order is written.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, Weak};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::foundation::{OrderId, ProductId};

/// Per-order serialization for fulfillment, cancel and announce.
pub type OrderLocks = KeyedLocks<OrderId>;

/// Per-product serialization for catalog edits.
pub type ProductLocks = KeyedLocks<ProductId>;

/// Dead entries are swept once the map grows past this many keys.
const SWEEP_THRESHOLD: usize = 256;

/// A map of async mutexes, one per key, created on demand.
///
/// Entries are held weakly; a key's mutex lives only as long as someone
/// holds or waits on its guard.
#[derive(Debug)]
pub struct KeyedLocks<K> {
    inner: Arc<Mutex<HashMap<K, Weak<AsyncMutex<()>>>>>,
}

impl<K> Clone for KeyedLocks<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<K> KeyedLocks<K>
where
    K: Eq + Hash + Copy,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `key`.
    pub async fn lock(&self, key: K) -> OwnedMutexGuard<()> {
        self.slot(key).lock_owned().await
    }

    /// Locks every key in `keys`, in ascending order so two callers with
    /// overlapping sets cannot deadlock.
    pub async fn lock_all(&self, keys: impl IntoIterator<Item = K>) -> Vec<OwnedMutexGuard<()>>
    where
        K: Ord,
    {
        let mut keys: Vec<K> = keys.into_iter().collect();
        keys.sort();
        keys.dedup();

        let mut guards = Vec::with_capacity(keys.len());
        for key in keys {
            guards.push(self.lock(key).await);
        }
        guards
    }

    /// Number of keys currently tracked, live or not yet swept.
    pub fn tracked(&self) -> usize {
        self.map().len()
    }

    fn slot(&self, key: K) -> Arc<AsyncMutex<()>> {
        let mut map = self.map();
        if let Some(existing) = map.get(&key).and_then(Weak::upgrade) {
            return existing;
        }
        if map.len() >= SWEEP_THRESHOLD {
            map.retain(|_, slot| slot.strong_count() > 0);
        }
        let slot = Arc::new(AsyncMutex::new(()));
        map.insert(key, Arc::downgrade(&slot));
        slot
    }

    fn map(&self) -> std::sync::MutexGuard<'_, HashMap<K, Weak<AsyncMutex<()>>>> {
        // The map holds only weak handles, so a poisoned guard is still consistent.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
