//! Exam and deadline tracking
//!
//! Exams are a flat list stored under a single key. Dates are calendar days
//! (`YYYY-MM-DD`); an exam dated today still counts as upcoming.

use std::cmp::Ordering;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ReaderError, Result};
use crate::persistence::PersistenceGateway;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// An exam or hand-in date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamEntry {
    pub id: String,
    pub title: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Related documents
    #[serde(rename = "bookIds", default)]
    pub book_ids: Vec<String>,
    pub timestamp: i64,
}

impl ExamEntry {
    /// Parsed calendar date, if the stored date is well formed
    pub fn day(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }
}

/// Exam list backed by the persistence gateway
pub struct ExamBook {
    exams: Vec<ExamEntry>,
    gateway: PersistenceGateway,
}

impl ExamBook {
    pub fn load(gateway: PersistenceGateway) -> Self {
        let exams = gateway.load_exams();
        Self { exams, gateway }
    }

    pub fn all(&self) -> &[ExamEntry] {
        &self.exams
    }

    /// Add an exam. Title and date are required; a blank description is dropped.
    pub fn add(&mut self, title: &str, date: &str, description: Option<&str>) -> Result<ExamEntry> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ReaderError::MissingExamField("title"));
        }
        let date = date.trim();
        if date.is_empty() {
            return Err(ReaderError::MissingExamField("date"));
        }

        let exam = ExamEntry {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            date: date.to_string(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            book_ids: Vec::new(),
            timestamp: Utc::now().timestamp_millis(),
        };

        let mut updated = self.exams.clone();
        updated.push(exam.clone());
        self.gateway.save_exams(&updated)?;
        self.exams = updated;

        tracing::debug!(id = %exam.id, date = %exam.date, "Added exam");
        Ok(exam)
    }

    /// Delete an exam by id; returns whether it existed
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let updated: Vec<ExamEntry> = self.exams.iter().filter(|e| e.id != id).cloned().collect();
        if updated.len() == self.exams.len() {
            return Ok(false);
        }
        self.gateway.save_exams(&updated)?;
        self.exams = updated;
        Ok(true)
    }

    /// Split into (upcoming, past) relative to `today`, each sorted by date
    pub fn split(&self, today: NaiveDate) -> (Vec<&ExamEntry>, Vec<&ExamEntry>) {
        let mut sorted: Vec<&ExamEntry> = self.exams.iter().collect();
        sorted.sort_by(|a, b| compare_dates(a, b));

        sorted
            .into_iter()
            .partition(|e| e.day().map_or(true, |d| d >= today))
    }
}

/// Ascending by date, unparseable dates last
fn compare_dates(a: &ExamEntry, b: &ExamEntry) -> Ordering {
    match (a.day(), b.day()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    fn book() -> (PersistenceGateway, ExamBook) {
        let gateway = PersistenceGateway::new(Arc::new(MemoryStore::new()));
        (gateway.clone(), ExamBook::load(gateway))
    }

    #[test]
    fn test_add_requires_title_and_date() {
        let (_gateway, mut exams) = book();

        assert!(matches!(
            exams.add("  ", "2026-06-01", None),
            Err(ReaderError::MissingExamField("title"))
        ));
        assert!(matches!(
            exams.add("Algebra", "", None),
            Err(ReaderError::MissingExamField("date"))
        ));
        assert!(exams.all().is_empty());
    }

    #[test]
    fn test_add_trims_and_persists() {
        let (gateway, mut exams) = book();
        let exam = exams
            .add("  Algebra final ", "2026-06-01", Some("   "))
            .unwrap();

        assert_eq!(exam.title, "Algebra final");
        assert_eq!(exam.description, None);
        assert!(exam.book_ids.is_empty());
        assert_eq!(gateway.load_exams(), vec![exam]);
    }

    #[test]
    fn test_delete() {
        let (gateway, mut exams) = book();
        let exam = exams.add("Physics", "2026-05-20", Some("Lab report")).unwrap();

        assert!(!exams.delete("nope").unwrap());
        assert!(exams.delete(&exam.id).unwrap());
        assert!(gateway.load_exams().is_empty());
    }

    fn titles(list: &[&ExamEntry]) -> Vec<String> {
        list.iter().map(|e| e.title.clone()).collect()
    }

    #[test]
    fn test_split_upcoming_and_past() {
        let (_gateway, mut exams) = book();
        exams.add("Later", "2026-12-01", None).unwrap();
        exams.add("Past", "2026-01-10", None).unwrap();
        exams.add("Today", "2026-10-15", None).unwrap();
        exams.add("Garbled", "someday", None).unwrap();
        exams.add("Earlier past", "2025-11-30", None).unwrap();

        let today = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        let (upcoming, past) = exams.split(today);

        assert_eq!(titles(&upcoming), vec!["Today", "Later", "Garbled"]);
        assert_eq!(titles(&past), vec!["Earlier past", "Past"]);
    }
}
