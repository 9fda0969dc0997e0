use crate::PagewinResult;
use async_trait::async_trait;
use serde::Serialize;

/// A request for the rows at `[start, start + length)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadRequest {
    pub start: usize,
    pub length: usize,
    /// Increases by one for every dispatched request. Lets a data source
    /// discard responses for windows that have since been superseded.
    pub generation: u64,
}

/// The single write channel from the view into the data source.
///
/// Fire-and-forget: results land back in the cache, not in a return value.
/// `load` may be called while the caller holds a read view of the cache, so
/// implementations hand the request off instead of mutating the cache inline.
pub trait Loader: Send + Sync {
    fn load(&self, request: LoadRequest);
}

/// Adapts a closure into a `Loader`.
pub struct LoaderFn<F>(pub F);

impl<F> Loader for LoaderFn<F>
where
    F: Fn(LoadRequest) + Send + Sync,
{
    fn load(&self, request: LoadRequest) {
        (self.0)(request)
    }
}

/// Backend that actually produces identifiers and records.
#[async_trait]
pub trait ItemSource<Id, T>: Send + Sync {
    /// The full ordered list of identifiers.
    async fn order(&self) -> PagewinResult<Vec<Id>>;

    /// Records for the identifiers at `[start, start + length)` of the order.
    async fn fetch(&self, start: usize, length: usize) -> PagewinResult<Vec<(Id, T)>>;
}
