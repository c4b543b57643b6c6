//! JSON layout source
//!
//! Reads page dict dumps (`{"pages": [...]}` or a bare page array) written by
//! the page-text-extraction collaborator.

use super::{ExtractionError, LayoutDocument, LayoutSource, PageLayout};
use anyhow::Result;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct JsonLayoutSource;

impl JsonLayoutSource {
    pub fn new() -> Self {
        Self
    }
}

impl LayoutSource for JsonLayoutSource {
    fn parse_layout(&self, bytes: &[u8]) -> Result<Vec<PageLayout>> {
        let document: LayoutDocument =
            serde_json::from_slice(bytes).map_err(ExtractionError::Malformed)?;
        let pages = document.into_pages();
        log::debug!("📄 Decoded layout with {} pages", pages.len());
        Ok(pages)
    }

    fn name(&self) -> &str {
        "json-layout"
    }

    fn supports_file_type(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    }
}
