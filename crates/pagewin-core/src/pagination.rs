//! Page window arithmetic and navigation.
//!
//! Turns a page index and a page size into an offset range over an ordered
//! collection. Knows nothing about items or rendering; it only tracks which
//! offsets the current page covers.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// How navigation treats indices outside `[0, page_count - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IndexPolicy {
    /// Indices are stored verbatim, including negative and past-the-end values.
    #[default]
    Unclamped,
    /// Indices are kept inside the known page range.
    Clamped,
}

impl IndexPolicy {
    pub fn from_clamp(clamp: bool) -> Self {
        if clamp {
            IndexPolicy::Clamped
        } else {
            IndexPolicy::Unclamped
        }
    }
}

/// The offsets covered by one page.
///
/// Derived on every pass, never stored by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    /// Current page number (0-indexed, may be out of range).
    pub page_index: isize,
    /// Number of rows per page.
    pub page_size: usize,
    /// Total number of identifiers in the order.
    pub total: usize,
}

impl PageWindow {
    pub fn new(page_index: isize, page_size: usize, total: usize) -> Self {
        Self {
            page_index,
            page_size,
            total,
        }
    }

    /// `ceil(total / page_size)`, or 0 for a zero page size.
    pub fn page_count(&self) -> usize {
        if self.page_size == 0 {
            0
        } else {
            self.total.div_ceil(self.page_size)
        }
    }

    /// `page_index * page_size`. Negative for a negative page index.
    pub fn start(&self) -> isize {
        self.page_index.saturating_mul(signed(self.page_size))
    }

    /// `start + page_size`. Not truncated to `total`.
    pub fn end(&self) -> isize {
        self.start().saturating_add(signed(self.page_size))
    }

    /// The window intersected with `[0, total)`.
    pub fn range(&self) -> Range<usize> {
        let lo = clip(self.start(), self.total);
        let hi = clip(self.end(), self.total);
        lo..hi.max(lo)
    }

    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self) -> bool {
        self.page_index < signed(self.page_count()) - 1
    }

    pub fn control(&self) -> PageControl {
        PageControl {
            count: self.page_count(),
            index: self.page_index,
            size: self.page_size,
            total: self.total,
            can_previous: self.can_previous(),
            can_next: self.can_next(),
        }
    }
}

/// Navigation outputs consumed by a page-number widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageControl {
    pub count: usize,
    pub index: isize,
    pub size: usize,
    pub total: usize,
    pub can_previous: bool,
    pub can_next: bool,
}

fn signed(value: usize) -> isize {
    isize::try_from(value).unwrap_or(isize::MAX)
}

fn clip(offset: isize, total: usize) -> usize {
    usize::try_from(offset).unwrap_or(0).min(total)
}

/// Owns the page index and applies navigation to it.
#[derive(Debug, Clone, Default)]
pub struct PageWindowController {
    page_index: isize,
    policy: IndexPolicy,
    /// Page count seen by the last `sync_extent`, if any.
    known_page_count: Option<usize>,
}

impl PageWindowController {
    pub fn new(policy: IndexPolicy) -> Self {
        Self {
            page_index: 0,
            policy,
            known_page_count: None,
        }
    }

    pub fn page_index(&self) -> isize {
        self.page_index
    }

    pub fn policy(&self) -> IndexPolicy {
        self.policy
    }

    /// Window for the current index without touching controller state.
    pub fn window(&self, total: usize, page_size: usize) -> PageWindow {
        PageWindow::new(self.page_index, page_size, total)
    }

    /// Record the current extent and return the window for it.
    ///
    /// Under `Unclamped` the index is left alone even when the extent shrinks
    /// below it.
    pub fn sync_extent(&mut self, total: usize, page_size: usize) -> PageWindow {
        let window = self.window(total, page_size);
        self.known_page_count = Some(window.page_count());
        if self.policy == IndexPolicy::Clamped {
            self.page_index = self.clamped(self.page_index);
        }
        self.window(total, page_size)
    }

    /// Step back one page. Callers gate this with `PageWindow::can_previous`.
    pub fn previous(&mut self) {
        self.page_index = self.clamped(self.page_index.saturating_sub(1));
    }

    /// Step forward one page. Callers gate this with `PageWindow::can_next`.
    pub fn next(&mut self) {
        self.page_index = self.clamped(self.page_index.saturating_add(1));
    }

    /// Jump to `index` as given.
    pub fn goto(&mut self, index: isize) {
        self.page_index = self.clamped(index);
    }

    fn clamped(&self, index: isize) -> isize {
        match (self.policy, self.known_page_count) {
            (IndexPolicy::Clamped, Some(count)) => {
                let last = signed(count).saturating_sub(1).max(0);
                index.clamp(0, last)
            }
            _ => index,
        }
    }
}
