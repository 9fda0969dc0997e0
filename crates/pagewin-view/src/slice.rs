use pagewin_cache::OrderedWindowCache;
use pagewin_core::PageWindow;
use serde::{Serialize, Serializer};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::ops::Range;

/// The current window's rows in display order, each resolved or not.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleSlice<'a, T> {
    entries: Vec<Option<&'a T>>,
}

impl<'a, T> VisibleSlice<'a, T> {
    pub fn new(entries: Vec<Option<&'a T>>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Option<&'a T>] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&'a T>> + '_ {
        self.entries.iter().copied()
    }

    /// True when no row is unresolved. Vacuously true for an empty slice.
    pub fn all_resolved(&self) -> bool {
        self.entries.iter().all(Option::is_some)
    }

    /// True when no row is resolved. Vacuously true for an empty slice.
    pub fn all_unresolved(&self) -> bool {
        self.entries.iter().all(Option::is_none)
    }

    pub fn resolved_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_some()).count()
    }

    pub fn into_entries(self) -> Vec<Option<&'a T>> {
        self.entries
    }
}

impl<T: Serialize> Serialize for VisibleSlice<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

/// Project `order[window]` through the item cache.
///
/// The result has the length of the window intersected with the order:
/// shorter on the last page, empty past the end or before offset 0.
pub fn build_visible_slice<'a, Id, T>(
    cache: &'a OrderedWindowCache<Id, T>,
    window: &PageWindow,
) -> VisibleSlice<'a, T>
where
    Id: Eq + Hash,
{
    let order = cache.order();
    let range = visible_range(window, order.len());

    VisibleSlice::new(order[range].iter().map(|id| cache.item(id)).collect())
}

/// Fingerprint of the rows `window` shows: their identifiers in order and
/// whether each is resolved.
///
/// Writes to rows outside the window leave it unchanged.
pub fn slice_identity<Id, T>(cache: &OrderedWindowCache<Id, T>, window: &PageWindow) -> u64
where
    Id: Eq + Hash,
{
    let order = cache.order();
    let range = visible_range(window, order.len());

    let mut hasher = DefaultHasher::new();
    range.len().hash(&mut hasher);
    for id in &order[range] {
        id.hash(&mut hasher);
        cache.is_resolved(id).hash(&mut hasher);
    }
    hasher.finish()
}

fn visible_range(window: &PageWindow, len: usize) -> Range<usize> {
    let range = window.range();
    let end = range.end.min(len);
    range.start.min(end)..end
}
