//! Highlight types
//!
//! The serialized field names match the persisted and exported highlight
//! document: `{ "pdfId": ..., "highlights": [ { "id", "pageNumber", "x", ... } ] }`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::coords::{Anchored, FractionalRect, RasterSize};

/// One highlight rectangle on one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    /// Unique identifier (UUID when created locally)
    pub id: String,
    /// 1-indexed page number
    pub page_number: u32,
    /// Left edge as a fraction of the recorded raster width
    pub x: f64,
    /// Top edge as a fraction of the recorded raster height
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: HighlightColor,
    /// Creation time, milliseconds since epoch
    pub timestamp: i64,
    /// Raster width in pixels when the highlight was drawn (0 if unknown)
    #[serde(default)]
    pub original_canvas_width: f64,
    /// Raster height in pixels when the highlight was drawn (0 if unknown)
    #[serde(default)]
    pub original_canvas_height: f64,
}

/// Fixed highlight palette
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HighlightColor {
    #[default]
    #[serde(rename = "#FBBF24", alias = "#fbbf24", alias = "yellow")]
    Yellow,
    #[serde(rename = "#34D399", alias = "#34d399", alias = "green")]
    Green,
    #[serde(rename = "#60A5FA", alias = "#60a5fa", alias = "blue")]
    Blue,
    #[serde(rename = "#F472B6", alias = "#f472b6", alias = "pink")]
    Pink,
    #[serde(rename = "#A78BFA", alias = "#a78bfa", alias = "purple")]
    Purple,
    #[serde(rename = "#FB923C", alias = "#fb923c", alias = "orange")]
    Orange,
}

/// Highlight document: the persisted form and the export/import envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightDocument {
    /// The document the highlights were drawn on
    #[serde(rename = "pdfId")]
    pub pdf_id: String,
    pub highlights: Vec<Highlight>,
}

impl HighlightColor {
    pub const ALL: [HighlightColor; 6] = [
        HighlightColor::Yellow,
        HighlightColor::Green,
        HighlightColor::Blue,
        HighlightColor::Pink,
        HighlightColor::Purple,
        HighlightColor::Orange,
    ];

    /// Overlay opacity shared by every color
    pub const OPACITY: f32 = 0.3;

    /// CSS hex value
    pub fn value(&self) -> &'static str {
        match self {
            HighlightColor::Yellow => "#FBBF24",
            HighlightColor::Green => "#34D399",
            HighlightColor::Blue => "#60A5FA",
            HighlightColor::Pink => "#F472B6",
            HighlightColor::Purple => "#A78BFA",
            HighlightColor::Orange => "#FB923C",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HighlightColor::Yellow => "Yellow",
            HighlightColor::Green => "Green",
            HighlightColor::Blue => "Blue",
            HighlightColor::Pink => "Pink",
            HighlightColor::Purple => "Purple",
            HighlightColor::Orange => "Orange",
        }
    }

    /// Look up a color by hex value or name, ignoring case
    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| {
            c.value().eq_ignore_ascii_case(token) || c.name().eq_ignore_ascii_case(token)
        })
    }
}

impl Highlight {
    /// Create a highlight anchored to `raster`, with a fresh id and timestamp
    pub fn new(page_number: u32, rect: FractionalRect, color: HighlightColor, raster: RasterSize) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            page_number,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            color,
            timestamp: Utc::now().timestamp_millis(),
            original_canvas_width: raster.width,
            original_canvas_height: raster.height,
        }
    }
}

impl Anchored for Highlight {
    fn fraction(&self) -> FractionalRect {
        FractionalRect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    fn recorded_raster(&self) -> Option<RasterSize> {
        Some(RasterSize::new(
            self.original_canvas_width,
            self.original_canvas_height,
        ))
    }
}
