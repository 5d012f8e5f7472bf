//! Page navigation with transition gating

use std::time::Duration;

pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(200);

/// Current page and the in-flight page turn, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNavigator {
    current: u32,
    total: u32,
    pending: Option<u32>,
}

impl PageNavigator {
    /// Start on page 1 of a `total`-page document
    pub fn new(total: u32) -> Self {
        Self {
            current: 1,
            total,
            pending: None,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Update the page count once the document is loaded; keeps `current` in range
    pub fn set_total(&mut self, total: u32) {
        self.total = total;
        self.current = self.current.clamp(1, total.max(1));
        if self.pending.is_some_and(|p| p > total) {
            self.pending = None;
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    /// Start turning to the next page; `None` if refused
    pub fn begin_next(&mut self) -> Option<u32> {
        if !self.has_next() {
            return None;
        }
        self.begin(self.current + 1)
    }

    /// Start turning to the previous page; `None` if refused
    pub fn begin_previous(&mut self) -> Option<u32> {
        if !self.has_previous() {
            return None;
        }
        self.begin(self.current - 1)
    }

    /// Start a jump to `page`; `None` if out of range, current, or busy
    pub fn begin_jump(&mut self, page: u32) -> Option<u32> {
        if page < 1 || page > self.total || page == self.current {
            return None;
        }
        self.begin(page)
    }

    fn begin(&mut self, target: u32) -> Option<u32> {
        if self.pending.is_some() {
            tracing::debug!(target, "Page turn refused mid-transition");
            return None;
        }
        self.pending = Some(target);
        Some(target)
    }

    /// Commit the in-flight page turn; returns the new current page
    pub fn finish_transition(&mut self) -> Option<u32> {
        let page = self.pending.take()?;
        self.current = page;
        Some(page)
    }
}
