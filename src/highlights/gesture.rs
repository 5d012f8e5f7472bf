//! Pointer drag gesture for drawing highlight rectangles
//!
//! Coordinates are overlay pixels, which coincide with raster pixels.

use crate::coords::PixelRect;

/// Drags must exceed this size in both axes to produce a highlight
pub const DEFAULT_MIN_DRAG_PX: f64 = 5.0;

/// Tracks one pointer drag while drawing mode is on
#[derive(Debug, Clone)]
pub struct DragGesture {
    drawing: bool,
    min_size: f64,
    start: Option<(f64, f64)>,
    current: Option<PixelRect>,
}

impl DragGesture {
    pub fn new(min_size: f64) -> Self {
        Self {
            drawing: false,
            min_size,
            start: None,
            current: None,
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Enter or leave drawing mode; leaving abandons any drag in progress
    pub fn set_drawing(&mut self, drawing: bool) {
        self.drawing = drawing;
        if !drawing {
            self.cancel();
        }
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        if !self.drawing {
            return;
        }
        self.start = Some((x, y));
        self.current = Some(PixelRect::new(x, y, 0.0, 0.0));
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if !self.drawing {
            return;
        }
        if let Some(start) = self.start {
            self.current = Some(PixelRect::from_corners(start, (x, y)));
        }
    }

    /// Finish the drag (pointer up or pointer leaving the overlay).
    ///
    /// Returns the drawn rect only when it is larger than the minimum size in
    /// both axes.
    pub fn pointer_up(&mut self) -> Option<PixelRect> {
        if !self.drawing {
            return None;
        }
        let rect = self.current.take();
        self.start = None;

        rect.filter(|r| r.width > self.min_size && r.height > self.min_size)
    }

    /// Rect to draw as a dashed preview while dragging
    pub fn preview(&self) -> Option<PixelRect> {
        self.start.and(self.current)
    }

    /// Abandon the drag in progress, staying in drawing mode
    pub fn cancel(&mut self) {
        self.start = None;
        self.current = None;
    }
}

impl Default for DragGesture {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DRAG_PX)
    }
}
