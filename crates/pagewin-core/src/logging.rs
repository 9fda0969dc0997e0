use crate::traits::LoadRequest;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;

#[derive(Debug, Clone, Serialize)]
pub struct LoadLogEntry {
    pub timestamp: DateTime<Utc>,
    pub request: LoadRequest,
    /// Window was empty or the cache was dirty.
    pub need_fetch: bool,
    /// Window contained unresolved rows.
    pub need_refresh: bool,
}

impl LoadLogEntry {
    pub fn new(request: LoadRequest, need_fetch: bool, need_refresh: bool) -> Self {
        Self {
            timestamp: Utc::now(),
            request,
            need_fetch,
            need_refresh,
        }
    }
}

pub trait Loggable {
    fn add_log(&mut self, entry: LoadLogEntry);
    fn get_logs(&self) -> &[LoadLogEntry];
}

/// Most recent issued loads, oldest first, bounded by `capacity`.
#[derive(Debug, Clone)]
pub struct LoadLog {
    /// Always contiguous after `add_log`, so `get_logs` can return one slice.
    entries: VecDeque<LoadLogEntry>,
    capacity: usize,
}

impl LoadLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Loggable for LoadLog {
    fn add_log(&mut self, entry: LoadLogEntry) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
        self.entries.make_contiguous();
    }

    fn get_logs(&self) -> &[LoadLogEntry] {
        self.entries.as_slices().0
    }
}
