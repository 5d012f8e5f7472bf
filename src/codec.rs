//! Highlight import/export
//!
//! Export wraps a collection in the highlight document envelope. Import is
//! all or nothing: the bytes must be JSON (`MalformedDocument` otherwise),
//! the envelope must have the `{ pdfId: string, highlights: [object] }`
//! shape, and every entry must satisfy the highlight schema
//! (`SchemaViolation` otherwise). [`merge`] then re-checks each entry and
//! drops duplicates without aborting the batch.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ReaderError, Result};
use crate::highlights::{Highlight, HighlightColor, HighlightDocument};

/// A document whose envelope and entries all passed validation
#[derive(Debug, Clone)]
pub struct ImportedDocument {
    /// Document id the highlights were exported from
    pub document_id: String,
    /// Raw entries, in file order
    pub entries: Vec<Value>,
}

/// Why an incoming entry was left out of a merge
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryRejection {
    /// Missing field, wrong JSON type or malformed value
    #[error("{0}")]
    Schema(String),
    /// Field parsed but its value is out of range
    #[error("{0} is out of range")]
    OutOfRange(&'static str),
    /// Color outside the highlight palette
    #[error("unknown color {0}")]
    UnknownColor(String),
    /// Id already present
    #[error("duplicate id {0}")]
    Duplicate(String),
}

/// Result of merging an import into an existing collection
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub merged: Vec<Highlight>,
    /// Incoming entries appended
    pub added: usize,
    /// Incoming entries dropped, with the reason
    pub rejected: Vec<EntryRejection>,
}

/// Wire form of an incoming highlight.
///
/// Unlike [`Highlight`], every field is required, including the recorded
/// canvas size. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncomingHighlight {
    id: String,
    page_number: u32,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    color: String,
    timestamp: f64,
    original_canvas_width: f64,
    original_canvas_height: f64,
}

/// Wrap a collection in the export envelope
pub fn export(document_id: &str, highlights: &[Highlight]) -> HighlightDocument {
    HighlightDocument {
        pdf_id: document_id.to_string(),
        highlights: highlights.to_vec(),
    }
}

/// Pretty-printed JSON export text
pub fn export_json(document_id: &str, highlights: &[Highlight]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&export(document_id, highlights))?)
}

/// `highlights-{document id}-{YYYY-MM-DD}.json`
pub fn export_file_name(document_id: &str, date: NaiveDate) -> String {
    format!("highlights-{}-{}.json", document_id, date.format("%Y-%m-%d"))
}

/// Parse and validate an externally supplied highlight document
pub fn import(raw: &[u8]) -> Result<ImportedDocument> {
    let value: Value =
        serde_json::from_slice(raw).map_err(|e| ReaderError::MalformedDocument(e.to_string()))?;

    let Value::Object(mut envelope) = value else {
        return Err(ReaderError::SchemaViolation(
            "document is not an object".to_string(),
        ));
    };

    let document_id = match envelope.remove("pdfId") {
        Some(Value::String(id)) => id,
        Some(_) => {
            return Err(ReaderError::SchemaViolation(
                "pdfId is not a string".to_string(),
            ))
        }
        None => return Err(ReaderError::SchemaViolation("pdfId is missing".to_string())),
    };

    let entries = match envelope.remove("highlights") {
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            return Err(ReaderError::SchemaViolation(
                "highlights is not an array".to_string(),
            ))
        }
        None => {
            return Err(ReaderError::SchemaViolation(
                "highlights is missing".to_string(),
            ))
        }
    };

    for (index, entry) in entries.iter().enumerate() {
        if let Err(reason) = validate_entry(entry) {
            return Err(ReaderError::SchemaViolation(format!(
                "highlights[{}]: {}",
                index, reason
            )));
        }
    }

    tracing::info!(
        document_id = %document_id,
        entries = entries.len(),
        "Parsed highlight document"
    );

    Ok(ImportedDocument {
        document_id,
        entries,
    })
}

/// Validate one incoming highlight against the highlight schema
pub fn validate_entry(entry: &Value) -> std::result::Result<Highlight, EntryRejection> {
    let incoming = IncomingHighlight::deserialize(entry)
        .map_err(|e| EntryRejection::Schema(e.to_string()))?;

    let color = HighlightColor::parse(&incoming.color)
        .ok_or(EntryRejection::UnknownColor(incoming.color))?;
    if incoming.page_number < 1 {
        return Err(EntryRejection::OutOfRange("pageNumber"));
    }
    if incoming.width < 0.0 {
        return Err(EntryRejection::OutOfRange("width"));
    }
    if incoming.height < 0.0 {
        return Err(EntryRejection::OutOfRange("height"));
    }

    Ok(Highlight {
        id: incoming.id,
        page_number: incoming.page_number,
        x: incoming.x,
        y: incoming.y,
        width: incoming.width,
        height: incoming.height,
        color,
        timestamp: incoming.timestamp as i64,
        original_canvas_width: incoming.original_canvas_width,
        original_canvas_height: incoming.original_canvas_height,
    })
}

/// Append every valid, previously unseen incoming entry after `existing`.
///
/// Existing entries keep their order and come first; survivors keep their
/// relative order. An id repeated within `incoming` is kept only once.
pub fn merge(existing: &[Highlight], incoming: &[Value]) -> MergeOutcome {
    let mut seen: HashSet<String> = existing.iter().map(|h| h.id.clone()).collect();
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    for entry in incoming {
        let highlight = match validate_entry(entry) {
            Ok(h) => h,
            Err(reason) => {
                tracing::debug!("Dropping invalid entry: {:?}", reason);
                rejected.push(reason);
                continue;
            }
        };
        if !seen.insert(highlight.id.clone()) {
            tracing::debug!(id = %highlight.id, "Dropping duplicate entry");
            rejected.push(EntryRejection::Duplicate(highlight.id));
            continue;
        }
        accepted.push(highlight);
    }

    let added = accepted.len();
    let mut merged = existing.to_vec();
    merged.extend(accepted);

    MergeOutcome {
        merged,
        added,
        rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn highlight(id: &str) -> Highlight {
        Highlight {
            id: id.to_string(),
            page_number: 1,
            x: 0.1,
            y: 0.2,
            width: 0.3,
            height: 0.05,
            color: HighlightColor::Yellow,
            timestamp: 1_700_000_000_000,
            original_canvas_width: 600.0,
            original_canvas_height: 800.0,
        }
    }

    fn entry(id: &str) -> Value {
        serde_json::to_value(highlight(id)).unwrap()
    }

    #[test]
    fn test_export_shape() {
        let text = export_json("book-1", &[highlight("a")]).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["pdfId"], "book-1");
        assert_eq!(value["highlights"][0]["id"], "a");
        assert_eq!(value["highlights"][0]["color"], "#FBBF24");
        assert!(text.contains('\n'));
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(
            export_file_name("calculo-1", date),
            "highlights-calculo-1-2026-03-09.json"
        );
    }

    #[test]
    fn test_import_malformed() {
        let cases: [&[u8]; 3] = [b"{\"pdfId\": ", b"", b"not json at all"];
        for raw in cases {
            assert!(matches!(import(raw), Err(ReaderError::MalformedDocument(_))));
        }
    }

    #[test]
    fn test_import_schema_violation() {
        let cases = [
            json!([1, 2, 3]),
            json!({ "highlights": [] }),
            json!({ "pdfId": 7, "highlights": [] }),
            json!({ "pdfId": "book-1" }),
            json!({ "pdfId": "book-1", "highlights": {} }),
            json!({ "pdfId": "book-1", "highlights": [entry("a"), "oops"] }),
        ];

        for case in cases {
            let raw = serde_json::to_vec(&case).unwrap();
            assert!(
                matches!(import(&raw), Err(ReaderError::SchemaViolation(_))),
                "{}",
                case
            );
        }
    }

    #[test]
    fn test_import_carries_valid_entries() {
        let raw = serde_json::to_vec(&json!({
            "pdfId": "book-2",
            "highlights": [entry("a"), entry("b")]
        }))
        .unwrap();

        let doc = import(&raw).unwrap();
        assert_eq!(doc.document_id, "book-2");
        assert_eq!(doc.entries.len(), 2);
    }

    #[test]
    fn test_one_bad_entry_rejects_whole_import() {
        let mut no_color = entry("no-color");
        no_color.as_object_mut().unwrap().remove("color");
        let raw = serde_json::to_vec(&json!({
            "pdfId": "book-1",
            "highlights": [entry("ok"), no_color]
        }))
        .unwrap();

        match import(&raw) {
            Err(ReaderError::SchemaViolation(reason)) => {
                assert!(reason.starts_with("highlights[1]"), "{}", reason);
                assert!(reason.contains("color"), "{}", reason);
            }
            other => panic!("expected schema violation, got {:?}", other),
        }
    }

    #[test]
    fn test_reimporting_own_export_adds_nothing() {
        let existing = vec![highlight("a"), highlight("b"), highlight("c")];
        let text = export_json("book-1", &existing).unwrap();
        let doc = import(text.as_bytes()).unwrap();

        let outcome = merge(&existing, &doc.entries);
        assert_eq!(outcome.merged, existing);
        assert_eq!(outcome.added, 0);
        assert_eq!(outcome.rejected.len(), 3);
    }

    #[test]
    fn test_merge_dedup_preserves_order() {
        let existing = vec![highlight("a"), highlight("b")];
        let incoming = vec![entry("b"), entry("c")];

        let outcome = merge(&existing, &incoming);
        let ids: Vec<_> = outcome.merged.iter().map(|h| h.id.as_str()).collect();

        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(outcome.added, 1);
        assert_eq!(
            outcome.rejected,
            vec![EntryRejection::Duplicate("b".to_string())]
        );
    }

    #[test]
    fn test_merge_drops_entry_missing_color() {
        let mut no_color = entry("z");
        no_color.as_object_mut().unwrap().remove("color");

        let outcome = merge(&[highlight("a")], &[no_color, entry("y")]);
        let ids: Vec<_> = outcome.merged.iter().map(|h| h.id.as_str()).collect();

        assert_eq!(ids, vec!["a", "y"]);
        assert_eq!(outcome.rejected.len(), 1);
        assert!(matches!(outcome.rejected[0], EntryRejection::Schema(_)));
    }

    #[test]
    fn test_merge_repeated_incoming_id_kept_once() {
        let outcome = merge(&[], &[entry("x"), entry("x")]);
        assert_eq!(outcome.merged.len(), 1);
        assert_eq!(outcome.added, 1);
    }

    #[test]
    fn test_validate_entry_field_types() {
        let mut wrong_type = entry("a");
        wrong_type["x"] = json!("0.1");
        assert!(matches!(
            validate_entry(&wrong_type),
            Err(EntryRejection::Schema(_))
        ));

        let mut bad_page = entry("a");
        bad_page["pageNumber"] = json!(0);
        assert_eq!(
            validate_entry(&bad_page),
            Err(EntryRejection::OutOfRange("pageNumber"))
        );

        let mut negative_width = entry("a");
        negative_width["width"] = json!(-0.2);
        assert_eq!(
            validate_entry(&negative_width),
            Err(EntryRejection::OutOfRange("width"))
        );

        let mut bad_color = entry("a");
        bad_color["color"] = json!("#123456");
        assert_eq!(
            validate_entry(&bad_color),
            Err(EntryRejection::UnknownColor("#123456".to_string()))
        );

        let mut no_size = entry("a");
        no_size.as_object_mut().unwrap().remove("originalCanvasHeight");
        match validate_entry(&no_size) {
            Err(EntryRejection::Schema(reason)) => {
                assert!(reason.contains("originalCanvasHeight"), "{}", reason)
            }
            other => panic!("expected schema rejection, got {:?}", other),
        }

        let mut extra = entry("a");
        extra["note"] = json!("kept elsewhere");
        assert_eq!(validate_entry(&extra), Ok(highlight("a")));

        assert_eq!(validate_entry(&entry("a")), Ok(highlight("a")));
    }
}
