// LayoutSource abstraction for ingesting extractor output
//
// This module defines the boundary between page text extraction (document ->
// spans grouped into lines and blocks) and heading inference (lines -> outline).
// Everything after this point works with PageLayout and is format-agnostic.

use super::PageLayout;
use anyhow::Result;
use std::path::Path;

/// LayoutSource trait - turns raw extractor output into page layouts
///
/// Sources handle:
/// - Decoding the collaborator's serialized output
/// - Tolerating missing optional fields (image blocks, absent boxes)
///
/// They never run any heading heuristics.
pub trait LayoutSource {
    /// Decode one document's layout from raw bytes
    fn parse_layout(&self, bytes: &[u8]) -> Result<Vec<PageLayout>>;

    /// Convenience method: decode from a file path
    ///
    /// Default implementation reads the file and calls `parse_layout`.
    fn load_file(&self, path: &Path) -> Result<Vec<PageLayout>> {
        let bytes = self.read_file(path)?;
        self.parse_layout(&bytes)
    }

    /// Raw bytes of a supported file, for callers that also hash them
    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        if !self.supports_file_type(path) {
            return Err(super::ExtractionError::UnsupportedFileType(path.to_path_buf()).into());
        }
        let bytes = std::fs::read(path).map_err(|source| super::ExtractionError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(bytes)
    }

    /// Source name for logging
    fn name(&self) -> &str;

    /// Check if the source understands the given file
    fn supports_file_type(&self, path: &Path) -> bool;
}
