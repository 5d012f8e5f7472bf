//! Viewport module
//!
//! Zoom resolution, the render request pipeline, page navigation and
//! resize debouncing for the page viewer.

mod debounce;
mod navigation;
mod render;
mod zoom;

pub use debounce::{ResizeDebouncer, DEFAULT_RESIZE_QUIET};
pub use navigation::{PageNavigator, DEFAULT_TRANSITION};
pub use render::{PageRenderer, RenderTicket, RenderTracker};
pub use zoom::{
    resolve, resolve_with_ceiling, ContainerSize, PageSize, ParseZoomError, ZoomDirective,
    ZoomLevel, DEFAULT_PADDING_PX, MAX_FIT_SCALE, MIN_FIT_SCALE, ZOOM_LEVELS,
};
