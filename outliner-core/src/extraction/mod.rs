//! Layout Extraction
//!
//! This module is the boundary between the external page-text-extraction
//! collaborator and the heading-inference pipeline.
//!
//! ## Architecture
//!
//! ```text
//! Extractor output (JSON page dicts, ...)
//!     ↓
//! [LayoutSource]
//!     ↓
//! Vec<PageLayout> (blocks → lines → spans)
//!     ↓
//! [Line Assembler]
//!     ↓
//! Vec<Line>
//! ```
//!
//! ## Available Sources
//!
//! - `JsonLayoutSource` - page dict dumps serialized as JSON

pub mod json_source;
pub mod layout;
pub mod source;

pub use json_source::JsonLayoutSource;
pub use layout::{BlockLayout, LayoutDocument, LineLayout, PageLayout, SpanLayout};
pub use source::LayoutSource;

use std::path::PathBuf;
use thiserror::Error;

/// Failures while ingesting extractor output
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("failed to read layout file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed layout JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unsupported layout file type: {0}")]
    UnsupportedFileType(PathBuf),
}
