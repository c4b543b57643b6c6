use crate::types::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version constants for cache invalidation
pub mod versions {
    pub const OUTLINER_VERSION: &str = env!("CARGO_PKG_VERSION");
    /// Bump whenever a pipeline stage changes its output for the same input
    pub const PIPELINE_VERSION: &str = "1.0.0";
    pub const LAYOUT_FORMAT_VERSION: &str = "1.0.0";
}

/// Cache key (layout + config → outline)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct OutlineCacheKey {
    pub layout_hash: String,
    pub config_hash: String,
    pub outliner_version: String,
    pub pipeline_version: String,
    pub layout_format_version: String,
}

impl OutlineCacheKey {
    pub fn new(layout_hash: String, config_hash: String) -> Self {
        Self {
            layout_hash,
            config_hash,
            outliner_version: versions::OUTLINER_VERSION.to_string(),
            pipeline_version: versions::PIPELINE_VERSION.to_string(),
            layout_format_version: versions::LAYOUT_FORMAT_VERSION.to_string(),
        }
    }

    /// Compute cache key hash for storage
    pub fn to_cache_hash(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(&self.layout_hash);
        hasher.update(&self.config_hash);
        hasher.update(&self.outliner_version);
        hasher.update(&self.pipeline_version);
        hasher.update(&self.layout_format_version);
        format!("{:x}", hasher.finalize())
    }
}

/// Cached outline with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineCacheValue {
    pub outline: DocumentOutline,
    pub created_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub cache_version: String,
}

impl OutlineCacheValue {
    pub fn new(outline: DocumentOutline, processing_time_ms: u64) -> Self {
        Self {
            outline,
            created_at: Utc::now(),
            processing_time_ms,
            cache_version: versions::OUTLINER_VERSION.to_string(),
        }
    }
}
