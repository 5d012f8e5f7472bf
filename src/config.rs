//! Configuration management for Lector

use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::highlights::DEFAULT_MIN_DRAG_PX;
use crate::viewport::{DEFAULT_PADDING_PX, DEFAULT_RESIZE_QUIET, DEFAULT_TRANSITION, MAX_FIT_SCALE};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub viewer: ViewerConfig,
    pub import: ImportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the persisted key-value files
    pub data_dir: PathBuf,
    /// Path of `books.json`
    pub catalog_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewerConfig {
    pub padding_px: f64,
    pub max_fit_scale: f64,
    pub min_drag_px: f64,
    pub resize_debounce_ms: u64,
    pub transition_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    pub cross_document: CrossDocumentPolicy,
}

/// What to do when an import declares another document's id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossDocumentPolicy {
    /// Merge anyway and warn the user
    #[default]
    Warn,
    /// Refuse the import
    Reject,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage: StorageConfig {
                data_dir: PathBuf::from("./lector-data"),
                catalog_path: PathBuf::from("./libros/books.json"),
            },
            viewer: ViewerConfig::default(),
            import: ImportConfig {
                cross_document: CrossDocumentPolicy::Warn,
            },
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            padding_px: DEFAULT_PADDING_PX,
            max_fit_scale: MAX_FIT_SCALE,
            min_drag_px: DEFAULT_MIN_DRAG_PX,
            resize_debounce_ms: DEFAULT_RESIZE_QUIET.as_millis() as u64,
            transition_ms: DEFAULT_TRANSITION.as_millis() as u64,
        }
    }
}

impl Config {
    /// Read `LECTOR_*` variables; missing or unparseable values keep their defaults
    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Config::default();
        let viewer = defaults.viewer;

        Config {
            storage: StorageConfig {
                data_dir: lookup("LECTOR_DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.data_dir),
                catalog_path: lookup("LECTOR_CATALOG")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.catalog_path),
            },
            viewer: ViewerConfig {
                padding_px: parsed(&lookup, "LECTOR_PADDING_PX", viewer.padding_px),
                max_fit_scale: parsed(&lookup, "LECTOR_MAX_FIT_SCALE", viewer.max_fit_scale),
                min_drag_px: parsed(&lookup, "LECTOR_MIN_DRAG_PX", viewer.min_drag_px),
                resize_debounce_ms: parsed(
                    &lookup,
                    "LECTOR_RESIZE_DEBOUNCE_MS",
                    viewer.resize_debounce_ms,
                ),
                transition_ms: parsed(&lookup, "LECTOR_TRANSITION_MS", viewer.transition_ms),
            },
            import: ImportConfig {
                cross_document: match lookup("LECTOR_CROSS_DOCUMENT").as_deref() {
                    Some("reject") => CrossDocumentPolicy::Reject,
                    _ => CrossDocumentPolicy::Warn,
                },
            },
        }
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T {
    match lookup(name) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}", name, raw);
            default
        }),
        None => default,
    }
}
