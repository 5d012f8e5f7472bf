//! Persistence gateway
//!
//! Maps every in-memory collection to one entry in a [`KeyValueStore`]. Keys
//! are derived from the document id with a fixed prefix per kind:
//!
//! | Kind | Key |
//! |---|---|
//! | Highlights | `pdf-highlights-{id}` |
//! | Annotations | `pdf-annotations-{id}` |
//! | Unlock ledger | `unlocked-books` |
//! | Exams | `library-exams` |
//!
//! Loads never fail: a missing entry, an unreadable entry and a corrupt entry
//! all come back as an empty collection. Writes propagate their errors.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::annotations::{AnnotationDocument, BookAnnotations, TextAnnotation};
use crate::error::Result;
use crate::exams::ExamEntry;
use crate::highlights::{Highlight, HighlightDocument};
use crate::storage::{KeyValueStore, StorageError};

pub const HIGHLIGHTS_PREFIX: &str = "pdf-highlights-";
pub const ANNOTATIONS_PREFIX: &str = "pdf-annotations-";
pub const UNLOCKED_KEY: &str = "unlocked-books";
pub const EXAMS_KEY: &str = "library-exams";

/// Storage key for a document's highlights
pub fn highlights_key(document_id: &str) -> String {
    format!("{}{}", HIGHLIGHTS_PREFIX, document_id)
}

/// Storage key for a document's text annotations
pub fn annotations_key(document_id: &str) -> String {
    format!("{}{}", ANNOTATIONS_PREFIX, document_id)
}

/// Translates collections to and from the backing store
#[derive(Clone)]
pub struct PersistenceGateway {
    store: Arc<dyn KeyValueStore>,
}

impl PersistenceGateway {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Get the backing store
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    // ========================================================================
    // Highlights
    // ========================================================================

    pub fn load_highlights(&self, document_id: &str) -> Vec<Highlight> {
        self.read::<HighlightDocument>(&highlights_key(document_id))
            .map(|doc| doc.highlights)
            .unwrap_or_default()
    }

    pub fn save_highlights(&self, document_id: &str, highlights: &[Highlight]) -> Result<()> {
        let doc = HighlightDocument {
            pdf_id: document_id.to_string(),
            highlights: highlights.to_vec(),
        };
        self.write(&highlights_key(document_id), &doc)
    }

    // ========================================================================
    // Annotations
    // ========================================================================

    pub fn load_annotations(&self, document_id: &str) -> Vec<TextAnnotation> {
        self.read::<AnnotationDocument>(&annotations_key(document_id))
            .map(|doc| doc.annotations)
            .unwrap_or_default()
    }

    pub fn save_annotations(&self, document_id: &str, annotations: &[TextAnnotation]) -> Result<()> {
        let doc = AnnotationDocument {
            book_id: document_id.to_string(),
            annotations: annotations.to_vec(),
        };
        self.write(&annotations_key(document_id), &doc)
    }

    /// Document ids with a persisted annotation entry, in store order
    pub fn annotation_document_ids(&self) -> Vec<String> {
        match self.store.keys() {
            Ok(keys) => keys
                .into_iter()
                .filter_map(|k| k.strip_prefix(ANNOTATIONS_PREFIX).map(str::to_string))
                .collect(),
            Err(e) => {
                tracing::warn!("Failed to enumerate stored keys: {}", e);
                Vec::new()
            }
        }
    }

    /// Every non-empty annotation collection, each sorted by page
    pub fn list_all_annotations(&self) -> Vec<BookAnnotations> {
        self.annotation_document_ids()
            .into_iter()
            .filter_map(|book_id| {
                let mut annotations = self.load_annotations(&book_id);
                if annotations.is_empty() {
                    return None;
                }
                annotations.sort_by_key(|a| a.page_number);
                Some(BookAnnotations {
                    book_id,
                    annotations,
                })
            })
            .collect()
    }

    // ========================================================================
    // Unlock ledger
    // ========================================================================

    pub fn unlocked_documents(&self) -> Vec<String> {
        self.read::<Vec<String>>(UNLOCKED_KEY).unwrap_or_default()
    }

    /// Record a document as unlocked; unlocking twice is a no-op
    pub fn unlock(&self, document_id: &str) -> Result<()> {
        let mut unlocked = self.unlocked_documents();
        if unlocked.iter().any(|id| id == document_id) {
            return Ok(());
        }
        unlocked.push(document_id.to_string());
        self.write(UNLOCKED_KEY, &unlocked)
    }

    pub fn is_unlocked(&self, document_id: &str) -> bool {
        self.unlocked_documents().iter().any(|id| id == document_id)
    }

    // ========================================================================
    // Exams
    // ========================================================================

    pub fn load_exams(&self) -> Vec<ExamEntry> {
        self.read::<Vec<ExamEntry>>(EXAMS_KEY).unwrap_or_default()
    }

    pub fn save_exams(&self, exams: &[ExamEntry]) -> Result<()> {
        self.write(EXAMS_KEY, &exams)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let text = match self.store.get(key) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}, treating as empty", key, e);
                return None;
            }
        };

        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(source) => {
                let err = StorageError::Corrupt {
                    key: key.to_string(),
                    source,
                };
                tracing::warn!("{}, treating as empty", err);
                None
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let text = serde_json::to_string(value)?;
        self.store.set(key, &text).map_err(|e| {
            tracing::error!("Failed to flush {}: {}", key, e);
            e
        })?;
        tracing::debug!(key = %key, "Flushed");
        Ok(())
    }
}
