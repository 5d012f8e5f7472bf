//! In-memory annotation collection for one open document

use crate::error::Result;
use crate::persistence::PersistenceGateway;

use super::types::TextAnnotation;

/// Text annotations of the currently open document
pub struct AnnotationStore {
    document_id: String,
    annotations: Vec<TextAnnotation>,
    gateway: PersistenceGateway,
}

impl AnnotationStore {
    /// Load the document's annotations from storage
    pub fn load(gateway: PersistenceGateway, document_id: &str) -> Self {
        let annotations = gateway.load_annotations(document_id);
        Self {
            document_id: document_id.to_string(),
            annotations,
            gateway,
        }
    }

    pub fn all(&self) -> &[TextAnnotation] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn on_page(&self, page: u32) -> impl Iterator<Item = &TextAnnotation> {
        self.annotations.iter().filter(move |a| a.page_number == page)
    }

    /// Append a note. Content is taken as-is; callers reject blank input.
    pub fn add(&mut self, content: &str, page: u32) -> Result<TextAnnotation> {
        let annotation = TextAnnotation::new(&self.document_id, page, content);

        let mut updated = self.annotations.clone();
        updated.push(annotation.clone());
        self.commit(updated)?;

        tracing::debug!(id = %annotation.id, page, "Added annotation");
        Ok(annotation)
    }

    /// Delete a note by id; an unknown id is a no-op returning `false`
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        if !self.annotations.iter().any(|a| a.id == id) {
            return Ok(false);
        }

        let updated = self
            .annotations
            .iter()
            .filter(|a| a.id != id)
            .cloned()
            .collect();
        self.commit(updated)?;
        Ok(true)
    }

    fn commit(&mut self, annotations: Vec<TextAnnotation>) -> Result<()> {
        self.gateway.save_annotations(&self.document_id, &annotations)?;
        self.annotations = annotations;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    fn setup() -> (PersistenceGateway, AnnotationStore) {
        let gateway = PersistenceGateway::new(Arc::new(MemoryStore::new()));
        let store = AnnotationStore::load(gateway.clone(), "book-1");
        (gateway, store)
    }

    #[test]
    fn test_add_and_reload() {
        let (gateway, mut store) = setup();
        let note = store.add("Check the proof", 12).unwrap();

        assert_eq!(note.book_id, "book-1");
        assert_eq!(store.on_page(12).count(), 1);
        assert_eq!(store.on_page(11).count(), 0);

        let reloaded = AnnotationStore::load(gateway, "book-1");
        assert_eq!(reloaded.all(), store.all());
    }

    #[test]
    fn test_delete() {
        let (gateway, mut store) = setup();
        let first = store.add("one", 1).unwrap();
        store.add("two", 1).unwrap();

        assert!(store.delete(&first.id).unwrap());
        assert_eq!(store.len(), 1);
        assert_eq!(gateway.load_annotations("book-1").len(), 1);
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let (_gateway, mut store) = setup();
        store.add("one", 1).unwrap();

        assert!(!store.delete("missing").unwrap());
        assert_eq!(store.len(), 1);
    }
}
