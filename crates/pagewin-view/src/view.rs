//! One evaluation pass per state change: window, slice, fetch trigger and
//! render mode, always derived from the same cache read.

use crate::fetch::{FetchTrigger, TriggerKey, TriggerOutcome};
use crate::loading::{resolve_render_mode, RenderMode};
use crate::slice::{build_visible_slice, slice_identity, VisibleSlice};
use pagewin_cache::OrderedWindowCache;
use pagewin_core::{
    AppConfig, IndexPolicy, LoadLog, LoadLogEntry, Loader, Loggable, PageControl, PageWindow,
    PageWindowController,
};
use serde::Serialize;
use std::hash::Hash;
use std::sync::Arc;

/// Output of one pass, for a table renderer and a page-number widget.
#[derive(Debug, Serialize)]
pub struct PageRender<'a, T> {
    pub window: PageWindow,
    pub control: PageControl,
    pub slice: VisibleSlice<'a, T>,
    pub mode: RenderMode,
    pub trigger: TriggerOutcome,
    /// First pass, or the page index differs from the previous pass.
    pub page_changed: bool,
}

/// Paged view over an externally owned `OrderedWindowCache`.
///
/// Owns only the page index. The cache is read, never written; the loader is
/// the one way to ask for it to change.
pub struct AsyncPageView {
    controller: PageWindowController,
    loader: Arc<dyn Loader>,
    loader_epoch: u64,
    trigger: FetchTrigger,
    log: LoadLog,
    last_page_index: Option<isize>,
}

impl AsyncPageView {
    pub fn new(loader: Arc<dyn Loader>, policy: IndexPolicy) -> Self {
        Self {
            controller: PageWindowController::new(policy),
            loader,
            loader_epoch: 0,
            trigger: FetchTrigger::new(),
            log: LoadLog::new(pagewin_core::config::DEFAULT_LOAD_LOG_CAPACITY),
            last_page_index: None,
        }
    }

    pub fn from_config(loader: Arc<dyn Loader>, config: &AppConfig) -> Self {
        Self::new(loader, config.index_policy()).with_log_capacity(config.load_log_capacity)
    }

    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log = LoadLog::new(capacity);
        self
    }

    /// Swap the loader. The next pass re-evaluates even if nothing else moved.
    pub fn set_loader(&mut self, loader: Arc<dyn Loader>) {
        self.loader = loader;
        self.loader_epoch += 1;
    }

    pub fn page_index(&self) -> isize {
        self.controller.page_index()
    }

    pub fn policy(&self) -> IndexPolicy {
        self.controller.policy()
    }

    pub fn previous(&mut self) {
        self.controller.previous();
    }

    pub fn next(&mut self) {
        self.controller.next();
    }

    pub fn goto(&mut self, index: isize) {
        self.controller.goto(index);
    }

    pub fn latest_generation(&self) -> u64 {
        self.trigger.latest_generation()
    }

    /// Whether `generation` belongs to the most recently dispatched request.
    pub fn is_current(&self, generation: u64) -> bool {
        self.trigger.is_current(generation)
    }

    pub fn load_log(&self) -> &[LoadLogEntry] {
        self.log.get_logs()
    }

    pub fn render<'a, Id, T>(
        &mut self,
        cache: &'a OrderedWindowCache<Id, T>,
        page_size: usize,
    ) -> PageRender<'a, T>
    where
        Id: Eq + Hash,
    {
        let window = self.controller.sync_extent(cache.len(), page_size);
        let slice = build_visible_slice(cache, &window);

        let key = TriggerKey {
            slice: slice_identity(cache, &window),
            start: window.start(),
            page_size,
            loader_epoch: self.loader_epoch,
            dirty: cache.is_dirty(),
        };
        let trigger = self
            .trigger
            .evaluate(key, &slice, &window, self.loader.as_ref());
        if let TriggerOutcome::Dispatched { decision, request } = trigger {
            self.log.add_log(LoadLogEntry::new(
                request,
                decision.need_fetch,
                decision.need_refresh,
            ));
        }

        let mode = resolve_render_mode(cache.is_updating(), &slice);

        let page_changed = self.last_page_index != Some(window.page_index);
        self.last_page_index = Some(window.page_index);

        tracing::debug!(
            "Pass for page {} of {}: {} rows ({} resolved), {:?}, {:?}",
            window.page_index,
            window.page_count(),
            slice.len(),
            slice.resolved_count(),
            mode,
            trigger
        );

        PageRender {
            window,
            control: window.control(),
            slice,
            mode,
            trigger,
            page_changed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagewin_core::{LoadRequest, LoaderFn};

    fn noop_view() -> AsyncPageView {
        AsyncPageView::new(Arc::new(LoaderFn(|_: LoadRequest| {})), IndexPolicy::Unclamped)
    }

    #[test]
    fn test_first_pass_marks_page_changed() {
        let cache: OrderedWindowCache<u32, u32> = OrderedWindowCache::with_order((0..23).collect());
        let mut view = noop_view();

        assert!(view.render(&cache, 10).page_changed);
        assert!(!view.render(&cache, 10).page_changed);

        view.next();
        assert!(view.render(&cache, 10).page_changed);
    }

    #[test]
    fn test_config_sets_policy_and_log_capacity() {
        let config = AppConfig {
            clamp_page_index: true,
            load_log_capacity: 1,
            ..AppConfig::default()
        };
        let mut view = AsyncPageView::from_config(Arc::new(LoaderFn(|_: LoadRequest| {})), &config);
        assert_eq!(view.policy(), IndexPolicy::Clamped);

        let mut cache: OrderedWindowCache<u32, u32> = OrderedWindowCache::with_order((0..23).collect());
        view.render(&cache, 10);
        cache.set_dirty(true);
        view.render(&cache, 10);

        assert_eq!(view.load_log().len(), 1);
        assert_eq!(view.load_log()[0].request.generation, 2);
    }

    #[test]
    fn test_control_reflects_window() {
        let cache: OrderedWindowCache<u32, u32> = OrderedWindowCache::with_order((0..23).collect());
        let mut view = noop_view();
        view.goto(2);

        let render = view.render(&cache, 10);
        assert_eq!(render.control.count, 3);
        assert_eq!(render.control.index, 2);
        assert_eq!(render.control.total, 23);
        assert!(render.control.can_previous);
        assert!(!render.control.can_next);
        assert_eq!(render.slice.len(), 3);
    }
}
