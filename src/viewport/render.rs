//! Render pipeline seam
//!
//! Rasterization is external. A render is requested with a [`RenderTicket`];
//! only the latest ticket's result is accepted, older ones are dropped when
//! they complete.

use async_trait::async_trait;

use crate::coords::RasterSize;
use crate::error::Result;

use super::zoom::PageSize;

/// External page rasterizer
#[async_trait]
pub trait PageRenderer: Send + Sync {
    fn page_count(&self) -> u32;

    /// Native size of `page` at scale 1
    async fn page_size(&self, page: u32) -> Result<PageSize>;

    /// Rasterize `page` at `scale`; returns the produced raster size
    async fn render_page(&self, page: u32, scale: f64) -> Result<RasterSize>;
}

/// Identity of one render request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTicket {
    pub page: u32,
    pub generation: u64,
}

/// Tracks the latest render request and the raster it produced
#[derive(Debug, Default)]
pub struct RenderTracker {
    generation: u64,
    raster: Option<RasterSize>,
}

impl RenderTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket, superseding every earlier one
    pub fn begin(&mut self, page: u32) -> RenderTicket {
        self.generation += 1;
        RenderTicket {
            page,
            generation: self.generation,
        }
    }

    pub fn is_current(&self, ticket: &RenderTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Accept a finished render if its ticket is still the latest
    pub fn complete(&mut self, ticket: RenderTicket, raster: RasterSize) -> bool {
        if !self.is_current(&ticket) {
            tracing::debug!(
                page = ticket.page,
                generation = ticket.generation,
                latest = self.generation,
                "Discarding stale render"
            );
            return false;
        }
        self.raster = Some(raster);
        true
    }

    /// Raster size of the latest accepted render
    pub fn raster(&self) -> Option<RasterSize> {
        self.raster
    }

    /// Forget the current raster and abandon every in-flight render
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.raster = None;
    }
}
