//! Deciding when the visible window must be (re-)fetched.

use crate::slice::VisibleSlice;
use pagewin_core::{LoadRequest, Loader, PageWindow};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FetchDecision {
    /// The window is empty or the cache is dirty.
    pub need_fetch: bool,
    /// Some row in the window is unresolved.
    pub need_refresh: bool,
}

impl FetchDecision {
    pub fn evaluate<T>(slice: &VisibleSlice<'_, T>, dirty: bool) -> Self {
        Self {
            need_fetch: slice.is_empty() || dirty,
            need_refresh: !slice.all_resolved(),
        }
    }

    pub fn should_load(&self) -> bool {
        self.need_fetch || self.need_refresh
    }
}

/// Everything a fetch decision depends on.
///
/// The updating flag is not part of the key: toggling it must never re-issue
/// a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerKey {
    /// See `slice_identity`.
    pub slice: u64,
    pub start: isize,
    pub page_size: usize,
    pub loader_epoch: u64,
    pub dirty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TriggerOutcome {
    /// Key unchanged since the previous pass, nothing evaluated.
    Skipped,
    /// Evaluated; the window is good enough as it is.
    Idle { decision: FetchDecision },
    /// The loader was invoked.
    Dispatched {
        decision: FetchDecision,
        request: LoadRequest,
    },
    /// A load was needed but the window cannot be expressed as a request
    /// (negative start or zero page size).
    InvalidWindow { decision: FetchDecision },
}

impl TriggerOutcome {
    pub fn request(&self) -> Option<LoadRequest> {
        match self {
            TriggerOutcome::Dispatched { request, .. } => Some(*request),
            _ => None,
        }
    }

    pub fn decision(&self) -> Option<FetchDecision> {
        match self {
            TriggerOutcome::Skipped => None,
            TriggerOutcome::Idle { decision }
            | TriggerOutcome::Dispatched { decision, .. }
            | TriggerOutcome::InvalidWindow { decision } => Some(*decision),
        }
    }
}

/// Remembers the last evaluated key and numbers dispatched requests.
#[derive(Debug, Clone, Default)]
pub struct FetchTrigger {
    last_key: Option<TriggerKey>,
    generation: u64,
}

impl FetchTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation of the most recently dispatched request, 0 before the first.
    pub fn latest_generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation != 0 && generation == self.generation
    }

    /// Forget the last key so the next pass evaluates unconditionally.
    pub fn invalidate(&mut self) {
        self.last_key = None;
    }

    pub fn evaluate<T>(
        &mut self,
        key: TriggerKey,
        slice: &VisibleSlice<'_, T>,
        window: &PageWindow,
        loader: &dyn Loader,
    ) -> TriggerOutcome {
        if self.last_key == Some(key) {
            return TriggerOutcome::Skipped;
        }
        self.last_key = Some(key);

        let decision = FetchDecision::evaluate(slice, key.dirty);
        if !decision.should_load() {
            return TriggerOutcome::Idle { decision };
        }

        let start = match usize::try_from(window.start()) {
            Ok(start) if window.page_size > 0 => start,
            _ => {
                tracing::warn!(
                    "Not loading page {}: window start {} with page size {} is not a valid request",
                    window.page_index,
                    window.start(),
                    window.page_size
                );
                return TriggerOutcome::InvalidWindow { decision };
            }
        };

        self.generation += 1;
        let request = LoadRequest {
            start,
            length: window.page_size,
            generation: self.generation,
        };
        tracing::info!(
            "Loading {}+{} (generation {}, fetch={}, refresh={})",
            request.start,
            request.length,
            request.generation,
            decision.need_fetch,
            decision.need_refresh
        );
        loader.load(request);

        TriggerOutcome::Dispatched { decision, request }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingLoader {
        requests: Mutex<Vec<LoadRequest>>,
    }

    impl Loader for RecordingLoader {
        fn load(&self, request: LoadRequest) {
            self.requests.lock().push(request);
        }
    }

    fn key(start: isize, dirty: bool) -> TriggerKey {
        TriggerKey {
            slice: 1,
            start,
            page_size: 10,
            loader_epoch: 0,
            dirty,
        }
    }

    fn resolved(values: &[u32]) -> Vec<Option<&u32>> {
        values.iter().map(Some).collect()
    }

    #[test]
    fn test_empty_slice_needs_fetch_regardless_of_dirty() {
        let slice: VisibleSlice<'_, u32> = VisibleSlice::new(Vec::new());
        assert!(FetchDecision::evaluate(&slice, false).need_fetch);
        assert!(FetchDecision::evaluate(&slice, true).need_fetch);
        assert!(!FetchDecision::evaluate(&slice, false).need_refresh);
    }

    #[test]
    fn test_dirty_overrides_resolution() {
        let values = [1, 2, 3];
        let slice = VisibleSlice::new(resolved(&values));
        let decision = FetchDecision::evaluate(&slice, true);
        assert!(decision.need_fetch);
        assert!(!decision.need_refresh);
        assert!(decision.should_load());
    }

    #[test]
    fn test_unresolved_row_needs_refresh() {
        let value = 1;
        let slice = VisibleSlice::new(vec![Some(&value), None]);
        let decision = FetchDecision::evaluate(&slice, false);
        assert!(!decision.need_fetch);
        assert!(decision.need_refresh);
    }

    #[test]
    fn test_fully_resolved_clean_window_is_idle() {
        let values = [1, 2];
        let slice = VisibleSlice::new(resolved(&values));
        assert!(!FetchDecision::evaluate(&slice, false).should_load());
    }

    #[test]
    fn test_dispatch_uses_window_start_and_page_size() {
        let loader = RecordingLoader::default();
        let mut trigger = FetchTrigger::new();
        let slice: VisibleSlice<'_, u32> = VisibleSlice::new(vec![None, None, None]);

        let outcome = trigger.evaluate(key(20, false), &slice, &PageWindow::new(2, 10, 23), &loader);

        let request = outcome.request().unwrap();
        assert_eq!((request.start, request.length, request.generation), (20, 10, 1));
        assert_eq!(loader.requests.lock().len(), 1);
    }

    #[test]
    fn test_same_key_is_skipped() {
        let loader = RecordingLoader::default();
        let mut trigger = FetchTrigger::new();
        let slice: VisibleSlice<'_, u32> = VisibleSlice::new(vec![None]);
        let window = PageWindow::new(0, 10, 1);

        trigger.evaluate(key(0, false), &slice, &window, &loader);
        let outcome = trigger.evaluate(key(0, false), &slice, &window, &loader);

        assert_eq!(outcome, TriggerOutcome::Skipped);
        assert_eq!(loader.requests.lock().len(), 1);
    }

    #[test]
    fn test_invalidate_forces_reevaluation() {
        let loader = RecordingLoader::default();
        let mut trigger = FetchTrigger::new();
        let slice: VisibleSlice<'_, u32> = VisibleSlice::new(vec![None]);
        let window = PageWindow::new(0, 10, 1);

        trigger.evaluate(key(0, false), &slice, &window, &loader);
        trigger.invalidate();
        trigger.evaluate(key(0, false), &slice, &window, &loader);

        assert_eq!(loader.requests.lock().len(), 2);
        assert_eq!(trigger.latest_generation(), 2);
        assert!(trigger.is_current(2));
        assert!(!trigger.is_current(1));
    }

    #[test]
    fn test_negative_start_is_not_dispatched() {
        let loader = RecordingLoader::default();
        let mut trigger = FetchTrigger::new();
        let slice: VisibleSlice<'_, u32> = VisibleSlice::new(Vec::new());

        let outcome = trigger.evaluate(key(-10, false), &slice, &PageWindow::new(-1, 10, 23), &loader);

        assert!(matches!(outcome, TriggerOutcome::InvalidWindow { decision } if decision.need_fetch));
        assert!(loader.requests.lock().is_empty());
        assert_eq!(trigger.latest_generation(), 0);
        assert!(!trigger.is_current(0));
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let outcome = TriggerOutcome::Idle {
            decision: FetchDecision::default(),
        };
        let json = serde_json::to_value(outcome).unwrap();
        assert_eq!(json["outcome"], "idle");
        assert_eq!(json["decision"]["need_fetch"], false);
    }
}
