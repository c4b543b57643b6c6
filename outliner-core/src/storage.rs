use crate::cache::{OutlineCacheKey, OutlineCacheValue};
use anyhow::{anyhow, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Storage abstraction for caching outline results
pub trait OutlineStorage {
    fn get_outline(&self, cache_key: &OutlineCacheKey) -> Result<Option<OutlineCacheValue>>;
    fn store_outline(&self, cache_key: &OutlineCacheKey, cache_value: &OutlineCacheValue)
        -> Result<()>;
}

/// File-based storage implementation using local cache directory
pub struct FileStorage {
    cache_dir: String,
}

impl FileStorage {
    pub fn new(cache_dir: &str) -> Result<Self> {
        // Ensure cache directory exists
        fs::create_dir_all(format!("{cache_dir}/outline"))?;

        Ok(Self {
            cache_dir: cache_dir.to_string(),
        })
    }

    fn outline_dir(&self) -> String {
        format!("{}/outline", self.cache_dir)
    }

    fn outline_path(&self, cache_key: &OutlineCacheKey) -> String {
        format!("{}/{}.json", self.outline_dir(), cache_key.to_cache_hash())
    }
}

impl OutlineStorage for FileStorage {
    fn get_outline(&self, cache_key: &OutlineCacheKey) -> Result<Option<OutlineCacheValue>> {
        let path = self.outline_path(cache_key);
        if Path::new(&path).exists() {
            let json_str = fs::read_to_string(&path)?;
            match serde_json::from_str::<OutlineCacheValue>(&json_str) {
                Ok(cache_value) => Ok(Some(cache_value)),
                Err(e) => {
                    // Unreadable entry counts as a miss and is overwritten on store
                    log::warn!("⚠️  Ignoring unreadable cache entry {path}: {e}");
                    Ok(None)
                }
            }
        } else {
            Ok(None)
        }
    }

    fn store_outline(
        &self,
        cache_key: &OutlineCacheKey,
        cache_value: &OutlineCacheValue,
    ) -> Result<()> {
        let path = self.outline_path(cache_key);
        let json_str = serde_json::to_string_pretty(cache_value)
            .map_err(|e| anyhow!("Failed to serialize OutlineCacheValue: {}", e))?;
        // Readers never see a partially written entry
        let mut temp = tempfile::NamedTempFile::new_in(self.outline_dir())?;
        temp.write_all(json_str.as_bytes())?;
        temp.persist(&path)
            .map_err(|e| anyhow!("Failed to persist cache entry {}: {}", path, e))?;
        Ok(())
    }
}

/// Hash raw layout bytes (the extractor dump as read from disk)
pub fn calculate_layout_hash(layout_bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(layout_bytes.len().to_le_bytes());
    hasher.update(layout_bytes);
    format!("{:x}", hasher.finalize())
}

/// Calculate hash for configuration data (part of the cache key)
pub fn calculate_config_hash<T: serde::Serialize>(config: &T) -> Result<String> {
    let config_json = serde_json::to_string(config)
        .map_err(|e| anyhow!("Failed to serialize config for hashing: {}", e))?;

    let mut hasher = Sha256::new();
    hasher.update(config_json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// No-op storage implementation that disables all caching
pub struct NoOpStorage;

impl Default for NoOpStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl NoOpStorage {
    pub fn new() -> Self {
        Self
    }
}

impl OutlineStorage for NoOpStorage {
    fn get_outline(&self, _cache_key: &OutlineCacheKey) -> Result<Option<OutlineCacheValue>> {
        Ok(None) // Always cache miss
    }

    fn store_outline(
        &self,
        _cache_key: &OutlineCacheKey,
        _cache_value: &OutlineCacheValue,
    ) -> Result<()> {
        Ok(()) // No-op
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutlineConfig;
    use crate::types::{DocumentOutline, HeadingLevel, OutlineEntry};

    #[test]
    fn test_layout_hash_consistency() {
        let layout = br#"{"pages": []}"#;
        assert_eq!(calculate_layout_hash(layout), calculate_layout_hash(layout));
        assert_ne!(
            calculate_layout_hash(layout),
            calculate_layout_hash(br#"{"pages": [{}]}"#)
        );
    }

    #[test]
    fn test_config_hash_tracks_changes() {
        let default_hash = calculate_config_hash(&OutlineConfig::default()).unwrap();
        let mut changed = OutlineConfig::default();
        changed.filter.min_chars = 6;
        assert_ne!(default_hash, calculate_config_hash(&changed).unwrap());
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(temp_dir.path().to_str().unwrap()).unwrap();

        let key = OutlineCacheKey::new("layout".into(), "config".into());
        assert!(storage.get_outline(&key).unwrap().is_none());

        let outline = DocumentOutline {
            title: "Annual Report 2024".to_string(),
            outline: vec![OutlineEntry::new(HeadingLevel::H1, "Introduction", 1)],
        };
        storage
            .store_outline(&key, &OutlineCacheValue::new(outline.clone(), 12))
            .unwrap();

        let cached = storage.get_outline(&key).unwrap().unwrap();
        assert_eq!(cached.outline, outline);
        assert_eq!(cached.processing_time_ms, 12);
    }

    #[test]
    fn test_truncated_entry_is_a_miss() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(temp_dir.path().to_str().unwrap()).unwrap();
        let key = OutlineCacheKey::new("layout".into(), "config".into());
        let outline = DocumentOutline::with_title("Site Survey");
        storage
            .store_outline(&key, &OutlineCacheValue::new(outline.clone(), 3))
            .unwrap();

        let path = storage.outline_path(&key);
        let json = fs::read_to_string(&path).unwrap();
        fs::write(&path, &json[..json.len() / 2]).unwrap();
        assert!(storage.get_outline(&key).unwrap().is_none());

        storage
            .store_outline(&key, &OutlineCacheValue::new(outline.clone(), 4))
            .unwrap();
        assert_eq!(storage.get_outline(&key).unwrap().unwrap().outline, outline);
    }

    #[test]
    fn test_store_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(temp_dir.path().to_str().unwrap()).unwrap();
        let key = OutlineCacheKey::new("layout".into(), "config".into());
        storage
            .store_outline(&key, &OutlineCacheValue::new(DocumentOutline::empty(), 0))
            .unwrap();

        let entries: Vec<_> = fs::read_dir(storage.outline_dir()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_noop_storage_always_misses() {
        let storage = NoOpStorage::new();
        let key = OutlineCacheKey::new("layout".into(), "config".into());
        storage
            .store_outline(&key, &OutlineCacheValue::new(DocumentOutline::empty(), 0))
            .unwrap();
        assert!(storage.get_outline(&key).unwrap().is_none());
    }
}
