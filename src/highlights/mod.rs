//! Highlight module
//!
//! Rectangular page highlights stored in resolution-independent form.
//!
//! # Features
//!
//! - Fixed six-color palette
//! - Drag gesture with a minimum size threshold
//! - Per-document store with synchronous flush on every mutation
//! - Overlay rects computed for whatever raster is on screen

mod gesture;
mod store;
mod types;

pub use gesture::{DragGesture, DEFAULT_MIN_DRAG_PX};
pub use store::HighlightStore;
pub use types::{Highlight, HighlightColor, HighlightDocument};
