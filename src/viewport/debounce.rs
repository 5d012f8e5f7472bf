//! Resize debouncing
//!
//! Container resizes arrive in bursts; the render scale is recomputed once
//! the container has been still for the quiet period.

use std::time::{Duration, Instant};

pub const DEFAULT_RESIZE_QUIET: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    quiet: Duration,
    last_resize: Option<Instant>,
}

impl ResizeDebouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            last_resize: None,
        }
    }

    /// Record a resize at `now`, restarting the quiet period
    pub fn notify(&mut self, now: Instant) {
        self.last_resize = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.last_resize.is_some()
    }

    /// True exactly once, when the quiet period has elapsed since the last resize
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.last_resize {
            Some(at) if now.saturating_duration_since(at) >= self.quiet => {
                self.last_resize = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for ResizeDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_RESIZE_QUIET)
    }
}
