//! Error types for the Lector reader

use thiserror::Error;

use crate::notice::Notice;
use crate::storage::StorageError;

/// Library-wide result type
pub type Result<T> = std::result::Result<T, ReaderError>;

/// Reader error type
#[derive(Error, Debug)]
pub enum ReaderError {
    /// Imported bytes are not parseable as JSON at all
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// Parses, but the envelope does not match the highlight document shape
    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    /// No usable raster size was available when anchoring a highlight
    #[error("Invalid raster state: {width}x{height}")]
    InvalidRasterState { width: f64, height: f64 },

    /// Import declared another document and the policy rejects it
    #[error("Highlights belong to document {declared}, not {current}")]
    CrossDocumentImport { declared: String, current: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Document is locked: {0}")]
    Locked(String),

    #[error("License rejected for document {0}")]
    LicenseRejected(String),

    #[error("Annotation content is empty")]
    EmptyAnnotation,

    #[error("Missing exam field: {0}")]
    MissingExamField(&'static str),

    /// The external page renderer failed
    #[error("Render failed: {0}")]
    Render(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ReaderError {
    /// Map the error to a non-blocking, user-visible notice.
    ///
    /// Internal failures are logged in full and surfaced with a generic message.
    pub fn notice(&self) -> Notice {
        match self {
            ReaderError::MalformedDocument(_) | ReaderError::SchemaViolation(_) => {
                tracing::warn!("Import rejected: {}", self);
                Notice::error("Import failed", "The file does not have a valid format")
            }
            ReaderError::InvalidRasterState { .. } => {
                tracing::error!("Refusing highlight: {}", self);
                Notice::error(
                    "Highlight not saved",
                    "The highlight could not be saved because the page size is invalid",
                )
            }
            ReaderError::CrossDocumentImport { .. } => {
                tracing::warn!("{}", self);
                Notice::error(
                    "Import failed",
                    "The highlights were created for another document",
                )
            }
            ReaderError::NotFound(id) => Notice::error(
                "Document not found",
                format!("The document {} does not exist in the library", id),
            ),
            ReaderError::Locked(_) => Notice::error(
                "Access denied",
                "This document must be unlocked with a valid license",
            ),
            ReaderError::LicenseRejected(_) => {
                Notice::error("Invalid license", "The license entered is not valid")
            }
            ReaderError::EmptyAnnotation => {
                Notice::error("Annotation not saved", "The annotation is empty")
            }
            ReaderError::MissingExamField(field) => {
                Notice::error("Exam not saved", format!("The {} is required", field))
            }
            ReaderError::Render(e) => {
                tracing::error!("Render failed: {}", e);
                Notice::error("Error", "The page could not be displayed")
            }
            ReaderError::Storage(e) => {
                tracing::error!("Storage error: {}", e);
                Notice::error("Error", "Changes could not be saved")
            }
            ReaderError::Serialization(e) => {
                tracing::error!("Serialization error: {}", e);
                Notice::error("Error", "Changes could not be saved")
            }
        }
    }
}
