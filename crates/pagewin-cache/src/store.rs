use crate::cache::OrderedWindowCache;
use parking_lot::{RwLock, RwLockReadGuard};
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Emitted after every mutation of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEvent {
    pub revision: u64,
}

/// Externally owned home of an `OrderedWindowCache`.
///
/// Many readers, one writer: views take `read()` guards, the data source calls
/// `update`. Every `update` bumps the store revision and notifies subscribers,
/// which is what drives the next evaluation pass.
/// The broadcast channel has a buffer size of 64.
pub struct CacheStore<Id, T> {
    inner: Arc<RwLock<OrderedWindowCache<Id, T>>>,
    revision: Arc<AtomicU64>,
    tx: broadcast::Sender<CacheEvent>,
}

impl<Id, T> Clone for CacheStore<Id, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            revision: Arc::clone(&self.revision),
            tx: self.tx.clone(),
        }
    }
}

impl<Id, T> Default for CacheStore<Id, T> {
    fn default() -> Self {
        Self::new(OrderedWindowCache::default())
    }
}

impl<Id, T> CacheStore<Id, T> {
    pub fn new(cache: OrderedWindowCache<Id, T>) -> Self {
        let (tx, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(RwLock::new(cache)),
            revision: Arc::new(AtomicU64::new(0)),
            tx,
        }
    }

    /// Read view of the cache. Must not be held across an `update` on the
    /// same thread.
    pub fn read(&self) -> RwLockReadGuard<'_, OrderedWindowCache<Id, T>> {
        self.inner.read()
    }

    /// Number of updates applied so far.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.tx.subscribe()
    }

    /// Apply `f` under the write lock, then notify subscribers.
    pub fn update<R>(&self, f: impl FnOnce(&mut OrderedWindowCache<Id, T>) -> R) -> R {
        let result = {
            let mut guard = self.inner.write();
            f(&mut guard)
        };
        let revision = self.revision.fetch_add(1, Ordering::AcqRel) + 1;
        // No subscribers is fine.
        let _ = self.tx.send(CacheEvent { revision });
        result
    }
}

impl<Id, T> CacheStore<Id, T>
where
    Id: Eq + Hash + Clone,
    T: Clone,
{
    pub fn snapshot(&self) -> OrderedWindowCache<Id, T> {
        self.inner.read().clone()
    }
}

impl<Id, T> CacheStore<Id, T>
where
    Id: Eq + Hash,
{
    pub fn replace_order(&self, order: Vec<Id>) {
        self.update(|cache| cache.replace_order(order));
    }

    pub fn resolve_many<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (Id, T)>,
    {
        self.update(|cache| cache.resolve_many(entries));
    }

    pub fn set_dirty(&self, dirty: bool) {
        self.update(|cache| cache.set_dirty(dirty));
    }

    pub fn set_updating(&self, updating: bool) {
        self.update(|cache| cache.set_updating(updating));
    }
}
