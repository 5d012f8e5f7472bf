//! Lector Library
//!
//! Personal digital library reader core: license-gated catalog, page
//! viewer state, resolution-independent highlights, page notes and exam
//! tracking, all persisted in a key-value store.
//!
//! # Modules
//!
//! - `coords`: pixel/fractional rect conversion against a raster size
//! - `viewport`: zoom resolution, render tickets, navigation, resize debounce
//! - `highlights`, `annotations`: per-document collections
//! - `codec`: highlight import/export and merge
//! - `persistence`, `storage`: key layout and key-value backends
//! - `session`: one open document, tying the above together
//! - `cli`: the `lector` command line

pub mod annotations;
pub mod cli;
pub mod codec;
pub mod config;
pub mod coords;
pub mod error;
pub mod exams;
pub mod highlights;
pub mod library;
pub mod notice;
pub mod persistence;
pub mod session;
pub mod storage;
pub mod viewport;

pub use config::Config;
pub use error::{ReaderError, Result};
pub use notice::{Notice, Severity};
pub use session::DocumentSession;
