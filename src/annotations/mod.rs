//! Annotation module
//!
//! Free-text notes bound to a page of a document. Notes are immutable once
//! written; only whole-note deletion is supported.

mod store;
mod types;

pub use store::AnnotationStore;
pub use types::{group_by_page, AnnotationDocument, BookAnnotations, TextAnnotation};
