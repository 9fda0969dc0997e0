//! Glue between the `Loader` seam and an `ItemSource`.
//!
//! `ChannelLoader` hands requests to a channel so `load` never blocks or
//! touches the cache. `SourceDriver` drains that channel, asks the source for
//! the requested rows and writes the results into the `CacheStore`.

use crate::store::CacheStore;
use pagewin_core::{ItemSource, LoadRequest, Loader, PagewinError, PagewinResult};
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Count of requests handed to the channel but not yet applied to the store.
#[derive(Debug, Clone, Default)]
pub struct PendingLoads(Arc<AtomicUsize>);

impl PendingLoads {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::Acquire)
    }

    pub fn is_idle(&self) -> bool {
        self.get() == 0
    }

    fn increment(&self) {
        self.0.fetch_add(1, Ordering::AcqRel);
    }

    fn decrement(&self) {
        // Never underflow, even if a request is applied twice.
        let _ = self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
    }
}

pub struct ChannelLoader {
    tx: mpsc::UnboundedSender<LoadRequest>,
    pending: PendingLoads,
}

impl ChannelLoader {
    pub fn pending(&self) -> PendingLoads {
        self.pending.clone()
    }
}

impl Loader for ChannelLoader {
    fn load(&self, request: LoadRequest) {
        self.pending.increment();
        if self.tx.send(request).is_err() {
            self.pending.decrement();
            tracing::warn!(
                "Data source is gone, dropping load for {}+{} (generation {})",
                request.start,
                request.length,
                request.generation
            );
        }
    }
}

/// Create a loader and the receiving end its requests arrive on.
pub fn channel_loader() -> (ChannelLoader, mpsc::UnboundedReceiver<LoadRequest>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let loader = ChannelLoader {
        tx,
        pending: PendingLoads::default(),
    };
    (loader, rx)
}

/// Applies load requests to a store, one at a time, in arrival order.
///
/// Requests are neither merged nor cancelled. The store stays marked updating
/// from the start of a request until no further request is pending. On
/// success the fetched rows are resolved and dirty is cleared; on failure the
/// rows stay unresolved and dirty is set.
pub struct SourceDriver<S, Id, T> {
    store: CacheStore<Id, T>,
    source: Arc<S>,
    pending: PendingLoads,
}

impl<S, Id, T> SourceDriver<S, Id, T>
where
    S: ItemSource<Id, T>,
    Id: Eq + Hash + Send + Sync,
    T: Send + Sync,
{
    pub fn new(store: CacheStore<Id, T>, source: Arc<S>, pending: PendingLoads) -> Self {
        Self {
            store,
            source,
            pending,
        }
    }

    /// Fill the order ahead of the first load.
    pub async fn prime_order(&self) -> PagewinResult<usize> {
        let order = self.source.order().await?;
        let total = order.len();
        self.store.replace_order(order);
        tracing::debug!("Primed order with {} identifiers", total);
        Ok(total)
    }

    /// Drain `rx` until every sender is dropped.
    pub async fn run(self, mut rx: mpsc::UnboundedReceiver<LoadRequest>) {
        while let Some(request) = rx.recv().await {
            // Failures are logged and recorded as dirty by `handle`.
            let _ = self.handle(request).await;
        }
        tracing::debug!("Load channel closed, driver stopping");
    }

    pub async fn handle(&self, request: LoadRequest) -> PagewinResult<()> {
        tracing::debug!(
            "Loading {}+{} (generation {})",
            request.start,
            request.length,
            request.generation
        );
        self.store.set_updating(true);

        let needs_order = self.store.read().is_empty();
        let order = if needs_order {
            match self.source.order().await {
                Ok(order) => Some(order),
                Err(e) => {
                    self.pending.decrement();
                    return self.fail(request, None, e);
                }
            }
        } else {
            None
        };
        let result = self.source.fetch(request.start, request.length).await;
        // Decrement before the final update so a reader woken by it already
        // sees the request as applied.
        self.pending.decrement();

        match result {
            Ok(items) => {
                let resolved = items.len();
                let more_queued = !self.pending.is_idle();
                self.store.update(|cache| {
                    if let Some(order) = order {
                        cache.replace_order_if_changed(order);
                    }
                    cache.resolve_many(items);
                    cache.set_dirty(false);
                    cache.set_updating(more_queued);
                });
                tracing::debug!(
                    "Resolved {} rows for generation {}",
                    resolved,
                    request.generation
                );
                Ok(())
            }
            Err(e) => self.fail(request, order, e),
        }
    }

    /// Leave the rows unresolved, keep any freshly fetched order, mark dirty.
    fn fail(
        &self,
        request: LoadRequest,
        order: Option<Vec<Id>>,
        err: PagewinError,
    ) -> PagewinResult<()> {
        tracing::warn!(
            "Load {}+{} failed: {}",
            request.start,
            request.length,
            err
        );
        let more_queued = !self.pending.is_idle();
        self.store.update(|cache| {
            if let Some(order) = order {
                cache.replace_order_if_changed(order);
            }
            cache.set_dirty(true);
            cache.set_updating(more_queued);
        });
        Err(err)
    }
}
