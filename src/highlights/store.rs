//! In-memory highlight collection for one open document
//!
//! Every mutation is flushed through the [`PersistenceGateway`] before it is
//! committed in memory, so the two never disagree.

use crate::coords::{denormalize, FractionalRect, PixelRect, RasterSize};
use crate::error::{ReaderError, Result};
use crate::persistence::PersistenceGateway;

use super::types::{Highlight, HighlightColor};

/// Highlights of the currently open document
pub struct HighlightStore {
    document_id: String,
    highlights: Vec<Highlight>,
    gateway: PersistenceGateway,
}

impl HighlightStore {
    /// Load the document's highlights from storage
    pub fn load(gateway: PersistenceGateway, document_id: &str) -> Self {
        let highlights = gateway.load_highlights(document_id);
        tracing::debug!(
            document_id = %document_id,
            count = highlights.len(),
            "Loaded highlights"
        );
        Self {
            document_id: document_id.to_string(),
            highlights,
            gateway,
        }
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// All highlights in insertion order
    pub fn all(&self) -> &[Highlight] {
        &self.highlights
    }

    pub fn len(&self) -> usize {
        self.highlights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.highlights.is_empty()
    }

    pub fn on_page(&self, page: u32) -> impl Iterator<Item = &Highlight> {
        self.highlights.iter().filter(move |h| h.page_number == page)
    }

    /// Pixel rects for drawing a page's highlights on the current raster
    pub fn overlays(&self, page: u32, current: RasterSize) -> Vec<(&Highlight, PixelRect)> {
        self.on_page(page)
            .map(|h| (h, denormalize(h, current.width, current.height)))
            .collect()
    }

    /// Add a highlight anchored to `raster`.
    ///
    /// Refused with [`ReaderError::InvalidRasterState`] when no valid raster
    /// size is available; nothing is written in that case.
    pub fn add(
        &mut self,
        rect: FractionalRect,
        page: u32,
        color: HighlightColor,
        raster: Option<RasterSize>,
    ) -> Result<Highlight> {
        let raster = match raster {
            Some(r) if r.is_valid() => r,
            other => {
                let r = other.unwrap_or(RasterSize::new(0.0, 0.0));
                return Err(ReaderError::InvalidRasterState {
                    width: r.width,
                    height: r.height,
                });
            }
        };

        let highlight = Highlight::new(page, rect, color, raster);

        let mut updated = self.highlights.clone();
        updated.push(highlight.clone());
        self.commit(updated)?;

        tracing::debug!(id = %highlight.id, page, "Added highlight");
        Ok(highlight)
    }

    /// Remove every highlight on `page`; returns how many were removed
    pub fn clear_page(&mut self, page: u32) -> Result<usize> {
        let updated: Vec<Highlight> = self
            .highlights
            .iter()
            .filter(|h| h.page_number != page)
            .cloned()
            .collect();

        let removed = self.highlights.len() - updated.len();
        if removed > 0 {
            self.commit(updated)?;
            tracing::debug!(page, removed, "Cleared page highlights");
        }
        Ok(removed)
    }

    /// Replace the whole collection (after an import merge)
    pub fn replace_all(&mut self, highlights: Vec<Highlight>) -> Result<()> {
        self.commit(highlights)
    }

    fn commit(&mut self, highlights: Vec<Highlight>) -> Result<()> {
        self.gateway.save_highlights(&self.document_id, &highlights)?;
        self.highlights = highlights;
        Ok(())
    }
}
