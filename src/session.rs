//! Open-document session
//!
//! A [`DocumentSession`] owns everything the viewer needs for one unlocked
//! document: its highlight and annotation stores, the zoom and navigation
//! state, and the raster size of the latest accepted render. User-facing
//! operations return a [`Notice`] on success; failures are [`ReaderError`]s
//! that map to a notice through [`ReaderError::notice`].

use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::annotations::{AnnotationStore, TextAnnotation};
use crate::codec;
use crate::config::{Config, CrossDocumentPolicy, ViewerConfig};
use crate::coords::{normalize, PixelRect, RasterSize};
use crate::error::{ReaderError, Result};
use crate::highlights::{DragGesture, Highlight, HighlightColor, HighlightStore};
use crate::library::{Book, Catalog};
use crate::notice::{plural, Notice};
use crate::persistence::PersistenceGateway;
use crate::viewport::{
    resolve_with_ceiling, ContainerSize, PageNavigator, PageRenderer, PageSize, RenderTicket,
    RenderTracker, ResizeDebouncer, ZoomDirective,
};

/// An export ready to be written out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub contents: String,
}

pub struct DocumentSession {
    book: Book,
    highlights: HighlightStore,
    annotations: AnnotationStore,
    navigator: PageNavigator,
    zoom: ZoomDirective,
    tracker: RenderTracker,
    gesture: DragGesture,
    resize: ResizeDebouncer,
    viewer: ViewerConfig,
    cross_document: CrossDocumentPolicy,
}

impl DocumentSession {
    /// Open an unlocked document from the catalog
    pub fn open(
        gateway: PersistenceGateway,
        catalog: &Catalog,
        document_id: &str,
        config: &Config,
    ) -> Result<Self> {
        let book = catalog
            .find(document_id)
            .ok_or_else(|| ReaderError::NotFound(document_id.to_string()))?
            .clone();

        if !gateway.is_unlocked(document_id) {
            return Err(ReaderError::Locked(document_id.to_string()));
        }

        let highlights = HighlightStore::load(gateway.clone(), document_id);
        let annotations = AnnotationStore::load(gateway, document_id);
        let viewer = config.viewer.clone();

        tracing::info!(
            document_id = %document_id,
            highlights = highlights.len(),
            annotations = annotations.len(),
            "Opened document"
        );

        Ok(Self {
            book,
            highlights,
            annotations,
            navigator: PageNavigator::new(0),
            zoom: ZoomDirective::default(),
            tracker: RenderTracker::new(),
            gesture: DragGesture::new(viewer.min_drag_px),
            resize: ResizeDebouncer::new(Duration::from_millis(viewer.resize_debounce_ms)),
            viewer,
            cross_document: config.import.cross_document,
        })
    }

    pub fn document_id(&self) -> &str {
        &self.book.id
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn highlights(&self) -> &HighlightStore {
        &self.highlights
    }

    pub fn annotations(&self) -> &AnnotationStore {
        &self.annotations
    }

    pub fn navigator(&self) -> &PageNavigator {
        &self.navigator
    }

    pub fn current_page(&self) -> u32 {
        self.navigator.current()
    }

    pub fn zoom(&self) -> ZoomDirective {
        self.zoom
    }

    /// Raster size of the latest accepted render of the current page
    pub fn raster(&self) -> Option<RasterSize> {
        self.tracker.raster()
    }

    pub fn gesture(&mut self) -> &mut DragGesture {
        &mut self.gesture
    }

    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.viewer.transition_ms)
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    pub fn set_zoom(&mut self, directive: ZoomDirective) {
        tracing::debug!(zoom = %directive, "Zoom changed");
        self.zoom = directive;
    }

    /// Scale for the current zoom given the page's native size and the
    /// measured client area
    pub fn scale_for(&self, native: PageSize, client_width: f64, client_height: f64) -> f64 {
        let container =
            ContainerSize::from_client(client_width, client_height, self.viewer.padding_px);
        resolve_with_ceiling(self.zoom, native, container, self.viewer.max_fit_scale)
    }

    /// Issue a render ticket for the current page, superseding earlier ones
    pub fn begin_render(&mut self) -> RenderTicket {
        self.tracker.begin(self.navigator.current())
    }

    /// Record a finished render; stale tickets are discarded
    pub fn complete_render(&mut self, ticket: RenderTicket, raster: RasterSize) -> bool {
        self.tracker.complete(ticket, raster)
    }

    /// Render the current page at the resolved scale.
    ///
    /// Returns the new raster size, or `None` if a newer render superseded
    /// this one while it was in flight.
    pub async fn render_current<R: PageRenderer + ?Sized>(
        &mut self,
        renderer: &R,
        client_width: f64,
        client_height: f64,
    ) -> Result<Option<RasterSize>> {
        let total = renderer.page_count();
        if self.navigator.total() != total {
            self.navigator.set_total(total);
        }

        let ticket = self.begin_render();
        let native = renderer.page_size(ticket.page).await?;
        let scale = self.scale_for(native, client_width, client_height);
        let raster = renderer.render_page(ticket.page, scale).await?;

        tracing::debug!(page = ticket.page, scale, "Rendered page");
        Ok(self.complete_render(ticket, raster).then_some(raster))
    }

    /// Record a container resize
    pub fn notify_resize(&mut self, now: Instant) {
        self.resize.notify(now);
    }

    /// True once the resize burst has settled and the page should be re-rendered
    pub fn resize_due(&mut self, now: Instant) -> bool {
        self.resize.poll(now)
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn next_page(&mut self) -> Option<u32> {
        self.navigator.begin_next()
    }

    pub fn previous_page(&mut self) -> Option<u32> {
        self.navigator.begin_previous()
    }

    pub fn go_to_page(&mut self, page: u32) -> Option<u32> {
        self.navigator.begin_jump(page)
    }

    /// Land the page turn; the new page has no raster until it is rendered
    pub fn finish_transition(&mut self) -> Option<u32> {
        let page = self.navigator.finish_transition()?;
        self.tracker.invalidate();
        self.gesture.cancel();
        Some(page)
    }

    // ========================================================================
    // Highlights
    // ========================================================================

    /// Anchor a drawn pixel rect to the current raster and save it
    pub fn commit_drag(&mut self, rect: PixelRect, color: HighlightColor) -> Result<Highlight> {
        let raster = self.tracker.raster().ok_or(ReaderError::InvalidRasterState {
            width: 0.0,
            height: 0.0,
        })?;
        let anchored = normalize(rect, raster)?;
        self.highlights.add(
            anchored.rect,
            self.navigator.current(),
            color,
            Some(anchored.recorded),
        )
    }

    /// Release the pointer: commits the dragged rect if it was large enough
    pub fn finish_drag(&mut self, color: HighlightColor) -> Result<Option<Highlight>> {
        match self.gesture.pointer_up() {
            Some(rect) => self.commit_drag(rect, color).map(Some),
            None => Ok(None),
        }
    }

    pub fn clear_current_page(&mut self) -> Result<Notice> {
        self.clear_page(self.navigator.current())
    }

    pub fn clear_page(&mut self, page: u32) -> Result<Notice> {
        let removed = self.highlights.clear_page(page)?;
        if removed == 0 {
            return Ok(Notice::info(
                "No highlights",
                format!("Page {} has no highlights", page),
            ));
        }
        Ok(Notice::info(
            "Highlights cleared",
            format!(
                "Removed {} from page {}",
                plural(removed, "highlight", "highlights"),
                page
            ),
        ))
    }

    /// Serialize every highlight of the document for download
    pub fn export(&self, today: NaiveDate) -> Result<(ExportFile, Notice)> {
        let contents = codec::export_json(self.document_id(), self.highlights.all())?;
        let file = ExportFile {
            file_name: codec::export_file_name(self.document_id(), today),
            contents,
        };

        tracing::info!(
            document_id = %self.document_id(),
            count = self.highlights.len(),
            "Exported highlights"
        );

        let notice = Notice::info(
            "Highlights exported",
            format!(
                "Exported {}",
                plural(self.highlights.len(), "highlight", "highlights")
            ),
        );
        Ok((file, notice))
    }

    /// Merge an exported highlight document into this document
    pub fn import(&mut self, raw: &[u8]) -> Result<Notice> {
        let imported = codec::import(raw)?;

        let foreign = imported.document_id != self.document_id();
        if foreign {
            match self.cross_document {
                CrossDocumentPolicy::Reject => {
                    return Err(ReaderError::CrossDocumentImport {
                        declared: imported.document_id,
                        current: self.document_id().to_string(),
                    });
                }
                CrossDocumentPolicy::Warn => tracing::warn!(
                    declared = %imported.document_id,
                    current = %self.document_id(),
                    "Importing highlights from another document"
                ),
            }
        }

        let outcome = codec::merge(self.highlights.all(), &imported.entries);
        if outcome.added > 0 {
            self.highlights.replace_all(outcome.merged)?;
        }

        tracing::info!(
            document_id = %self.document_id(),
            added = outcome.added,
            already_present = outcome.rejected.len(),
            "Imported highlights"
        );

        let mut message = format!(
            "Imported {}",
            plural(outcome.added, "highlight", "highlights")
        );
        if !outcome.rejected.is_empty() {
            message.push_str(&format!(", {} already present", outcome.rejected.len()));
        }

        if foreign {
            message.push_str(&format!(
                " (created for document {})",
                imported.document_id
            ));
            Ok(Notice::warning("Highlights imported", message))
        } else {
            Ok(Notice::info("Highlights imported", message))
        }
    }

    // ========================================================================
    // Annotations
    // ========================================================================

    pub fn add_annotation(&mut self, content: &str) -> Result<(TextAnnotation, Notice)> {
        self.add_annotation_at(self.navigator.current(), content)
    }

    /// Add a note to `page`; blank content is refused
    pub fn add_annotation_at(
        &mut self,
        page: u32,
        content: &str,
    ) -> Result<(TextAnnotation, Notice)> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ReaderError::EmptyAnnotation);
        }

        let annotation = self.annotations.add(content, page)?;
        let notice = Notice::info(
            "Annotation saved",
            format!("Added a note to page {}", page),
        );
        Ok((annotation, notice))
    }

    pub fn delete_annotation(&mut self, id: &str) -> Result<Notice> {
        if self.annotations.delete(id)? {
            Ok(Notice::info("Annotation deleted", "The note was removed"))
        } else {
            Ok(Notice::info("Nothing to delete", "The note no longer exists"))
        }
    }
}
