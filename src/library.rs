//! Document catalog
//!
//! The catalog is a read-only `books.json` listing. Documents are gated by a
//! per-document license string; unlocked ids are kept in the unlock ledger.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReaderError, Result};
use crate::persistence::PersistenceGateway;

/// One document in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub description: String,
    /// Cover image path, if any
    pub cover: Option<String>,
    /// Document file path relative to the catalog
    pub file: String,
    pub license: String,
}

/// Localized reading instructions shown with the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructions {
    pub es: String,
}

/// The catalog document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub books: Vec<Book>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Instructions>,
}

impl Catalog {
    pub fn from_json(raw: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(raw)?)
    }

    /// Read the catalog from disk
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read(path)?;
        let catalog = Self::from_json(&raw)?;
        tracing::info!(
            "Loaded catalog {} with {} books",
            path.display(),
            catalog.books.len()
        );
        Ok(catalog)
    }

    pub fn find(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    /// Case-insensitive match on title, author or description
    pub fn search(&self, term: &str) -> Vec<&Book> {
        let term = term.to_lowercase();
        self.books
            .iter()
            .filter(|b| {
                b.title.to_lowercase().contains(&term)
                    || b.author.to_lowercase().contains(&term)
                    || b.description.to_lowercase().contains(&term)
            })
            .collect()
    }

    /// Check `license` and record the document as unlocked
    pub fn unlock(&self, gateway: &PersistenceGateway, id: &str, license: &str) -> Result<&Book> {
        let book = self
            .find(id)
            .ok_or_else(|| ReaderError::NotFound(id.to_string()))?;

        if !license_matches(book, license) {
            tracing::info!(document_id = %id, "License rejected");
            return Err(ReaderError::LicenseRejected(id.to_string()));
        }

        gateway.unlock(id)?;
        tracing::info!(document_id = %id, "Document unlocked");
        Ok(book)
    }
}

/// Licenses compare trimmed and case-insensitively
pub fn license_matches(book: &Book, entered: &str) -> bool {
    entered.trim().to_uppercase() == book.license.to_uppercase()
}
