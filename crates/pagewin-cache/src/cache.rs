//! The shared order/items/flags state a paged view reads from.

use std::collections::HashMap;
use std::hash::Hash;

/// Order of identifiers, identifier-to-item cache and the two status flags.
///
/// `order.len()` is the authoritative total. `items` may be missing entries
/// for identifiers in the order (unresolved) and may hold entries for
/// identifiers no longer in it (stale, never surfaced through a window).
#[derive(Debug, Clone)]
pub struct OrderedWindowCache<Id, T> {
    order: Vec<Id>,
    items: HashMap<Id, Option<T>>,
    dirty: bool,
    updating: bool,
}

impl<Id, T> Default for OrderedWindowCache<Id, T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            items: HashMap::new(),
            dirty: false,
            updating: false,
        }
    }
}

impl<Id, T> OrderedWindowCache<Id, T>
where
    Id: Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(order: Vec<Id>) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    pub fn order(&self) -> &[Id] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The resolved item for `id`, or `None` when it is unresolved.
    pub fn item(&self, id: &Id) -> Option<&T> {
        self.items.get(id).and_then(Option::as_ref)
    }

    pub fn is_resolved(&self, id: &Id) -> bool {
        self.item(id).is_some()
    }

    /// Number of cache entries, resolved or not, including stale ones.
    pub fn cached_len(&self) -> usize {
        self.items.len()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_updating(&self) -> bool {
        self.updating
    }

    /// Replace the order wholesale. Existing item entries are kept.
    pub fn replace_order(&mut self, order: Vec<Id>) {
        self.order = order;
    }

    /// Replace the order only if it differs; returns whether it did.
    pub fn replace_order_if_changed(&mut self, order: Vec<Id>) -> bool {
        if self.order == order {
            return false;
        }
        self.replace_order(order);
        true
    }

    pub fn resolve(&mut self, id: Id, item: T) {
        self.items.insert(id, Some(item));
    }

    pub fn resolve_many<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (Id, T)>,
    {
        self.items
            .extend(entries.into_iter().map(|(id, item)| (id, Some(item))));
    }

    /// Put the unresolved sentinel in place of whatever `id` held.
    pub fn unresolve(&mut self, id: Id) {
        self.items.insert(id, None);
    }

    pub fn clear_items(&mut self) {
        self.items.clear();
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    pub fn set_updating(&mut self, updating: bool) {
        self.updating = updating;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cache_is_empty() {
        let cache: OrderedWindowCache<u32, String> = OrderedWindowCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.len(), 0);
        assert!(!cache.is_dirty());
        assert!(!cache.is_updating());
    }

    #[test]
    fn test_missing_entry_is_unresolved() {
        let cache: OrderedWindowCache<u32, String> = OrderedWindowCache::with_order(vec![1, 2]);
        assert_eq!(cache.len(), 2);
        assert!(cache.item(&1).is_none());
        assert!(!cache.is_resolved(&2));
    }

    #[test]
    fn test_resolve_and_unresolve() {
        let mut cache = OrderedWindowCache::with_order(vec![1, 2]);
        cache.resolve(1, "one".to_string());
        assert_eq!(cache.item(&1).map(String::as_str), Some("one"));

        cache.unresolve(1);
        assert!(cache.item(&1).is_none());
        assert_eq!(cache.cached_len(), 1);
    }

    #[test]
    fn test_resolve_many_overwrites_entries() {
        let mut cache = OrderedWindowCache::with_order(vec![1, 2, 3]);
        cache.resolve_many(vec![(1, 'a'), (2, 'b')]);
        cache.resolve_many(vec![(2, 'c')]);

        assert_eq!(cache.item(&1), Some(&'a'));
        assert_eq!(cache.item(&2), Some(&'c'));
        assert!(!cache.is_resolved(&3));
        assert_eq!(cache.cached_len(), 2);
    }

    #[test]
    fn test_flags_are_independent() {
        let mut cache: OrderedWindowCache<u32, char> = OrderedWindowCache::new();
        cache.set_dirty(true);
        assert!(cache.is_dirty());
        assert!(!cache.is_updating());

        cache.set_updating(true);
        cache.set_dirty(false);
        assert!(!cache.is_dirty());
        assert!(cache.is_updating());
    }

    #[test]
    fn test_stale_entries_survive_order_replacement() {
        let mut cache = OrderedWindowCache::with_order(vec![1, 2]);
        cache.resolve(1, 'a');
        cache.replace_order(vec![7, 8, 9]);

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.cached_len(), 1);
        assert_eq!(cache.item(&1), Some(&'a'));
    }

    #[test]
    fn test_replace_order_if_changed() {
        let mut cache: OrderedWindowCache<u32, char> = OrderedWindowCache::with_order(vec![1, 2]);
        assert!(!cache.replace_order_if_changed(vec![1, 2]));
        assert_eq!(cache.order(), &[1, 2]);

        assert!(cache.replace_order_if_changed(vec![2, 1]));
        assert_eq!(cache.order(), &[2, 1]);
    }

    #[test]
    fn test_clear_items() {
        let mut cache = OrderedWindowCache::with_order(vec![1]);
        cache.resolve(1, 'a');
        cache.clear_items();
        assert_eq!(cache.cached_len(), 0);
        assert!(cache.item(&1).is_none());
        assert_eq!(cache.len(), 1);
    }
}
