//! Text annotation types

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A free-text note bound to one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextAnnotation {
    /// Unique identifier (UUID)
    pub id: String,
    /// The book this annotation belongs to
    #[serde(rename = "bookId")]
    pub book_id: String,
    /// 1-indexed page number
    #[serde(rename = "pageNumber")]
    pub page_number: u32,
    pub content: String,
    /// Creation time, milliseconds since epoch
    pub timestamp: i64,
}

/// Persisted form of a document's annotations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationDocument {
    #[serde(rename = "bookId")]
    pub book_id: String,
    pub annotations: Vec<TextAnnotation>,
}

/// One document's annotations, for the cross-library listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookAnnotations {
    #[serde(rename = "bookId")]
    pub book_id: String,
    pub annotations: Vec<TextAnnotation>,
}

impl TextAnnotation {
    pub fn new(book_id: &str, page_number: u32, content: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            book_id: book_id.to_string(),
            page_number,
            content: content.to_string(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

impl BookAnnotations {
    pub fn by_page(&self) -> BTreeMap<u32, Vec<&TextAnnotation>> {
        group_by_page(&self.annotations)
    }
}

/// Group annotations by page, pages ascending, original order within a page
pub fn group_by_page(annotations: &[TextAnnotation]) -> BTreeMap<u32, Vec<&TextAnnotation>> {
    let mut grouped: BTreeMap<u32, Vec<&TextAnnotation>> = BTreeMap::new();
    for annotation in annotations {
        grouped.entry(annotation.page_number).or_default().push(annotation);
    }
    grouped
}
