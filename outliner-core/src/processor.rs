use crate::cache::{OutlineCacheKey, OutlineCacheValue};
use crate::config::OutlineConfig;
use crate::extraction::{JsonLayoutSource, LayoutSource, PageLayout};
use crate::rules::{DebugConfig, FontHistogram, HeadingLevels, RuleEngine};
use crate::storage::{
    calculate_config_hash, calculate_layout_hash, FileStorage, NoOpStorage, OutlineStorage,
};
use crate::types::*;
use anyhow::Result;
use std::path::Path;
use std::time::{Duration, Instant};

/// Captured intermediate outputs from each pipeline stage
/// Used for testing and diagnostics: lets you inspect/compare each boundary
#[derive(Debug, Clone, serde::Serialize)]
pub struct PipelineStages {
    pub assembled_lines: Vec<Line>,
    pub merged_lines: Vec<Line>,
    pub title: String,
    pub title_size: Option<i32>,
    pub font_histogram: FontHistogram,
    pub heading_levels: HeadingLevels,
    pub candidates: Vec<OutlineEntry>,
    pub outline: DocumentOutline,
}

/// Simple profiler that collects timings for pipeline steps
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        self.timings.push((step_name.to_string(), elapsed));
        log::info!("⏱️  {}: {:.3}ms", step_name, elapsed.as_secs_f64() * 1000.0);

        result
    }

    pub fn timings(&self) -> &[(String, Duration)] {
        &self.timings
    }

    pub fn print_summary(&self) {
        if !self.enabled || self.timings.is_empty() {
            return;
        }

        log::info!("📊 Performance Summary:");
        let total: Duration = self.timings.iter().map(|(_, d)| *d).sum();

        for (step, duration) in &self.timings {
            let percentage = if total.is_zero() {
                0.0
            } else {
                (duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            };
            log::info!(
                "   {:.<35} {:.3}ms ({:.1}%)",
                step,
                duration.as_secs_f64() * 1000.0,
                percentage
            );
        }
        log::info!("   {:.<35} {:.3}ms", "Total", total.as_secs_f64() * 1000.0);
    }
}

/// Layout file + config → outline, with result caching.
///
/// Every method takes `&self`, so one processor can serve a whole batch
/// from several threads.
pub struct OutlineProcessor {
    source: Box<dyn LayoutSource + Send + Sync>,
    storage: Box<dyn OutlineStorage + Send + Sync>,
    rule_engine: RuleEngine,
    config_hash: String,
}

impl OutlineProcessor {
    /// Create OutlineProcessor with full dependency injection
    pub fn new_with_dependencies(
        source: Box<dyn LayoutSource + Send + Sync>,
        storage: Box<dyn OutlineStorage + Send + Sync>,
        config: &OutlineConfig,
    ) -> Result<Self> {
        Ok(Self {
            source,
            storage,
            rule_engine: RuleEngine::new(config)?,
            config_hash: calculate_config_hash(config)?,
        })
    }

    /// Convenience constructor for CLI usage: JSON layouts, cache under `cache_dir`
    pub fn new_cli_with_cache(config: &OutlineConfig, cache_dir: &str) -> Result<Self> {
        let source = Box::new(JsonLayoutSource::new());
        let storage = Box::new(FileStorage::new(cache_dir)?);
        Self::new_with_dependencies(source, storage, config)
    }

    /// JSON layouts, no caching
    pub fn new_uncached(config: &OutlineConfig) -> Result<Self> {
        Self::new_with_dependencies(
            Box::new(JsonLayoutSource::new()),
            Box::new(NoOpStorage::new()),
            config,
        )
    }

    pub fn set_debug_config(&mut self, debug_config: DebugConfig) {
        self.rule_engine.set_debug_config(debug_config);
    }

    pub fn config(&self) -> &OutlineConfig {
        self.rule_engine.config()
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn supports_file(&self, path: &Path) -> bool {
        self.source.supports_file_type(path)
    }

    /// Process one layout file using the cache
    pub fn process_file(&self, input_path: &Path) -> Result<DocumentOutline> {
        self.process_file_with_options(input_path, false, false)
    }

    /// Process one layout file with optional profiling and cache bypass
    pub fn process_file_with_options(
        &self,
        input_path: &Path,
        enable_profiling: bool,
        skip_cache: bool,
    ) -> Result<DocumentOutline> {
        let start_time = Instant::now();
        let mut profiler = StepProfiler::new(enable_profiling);

        let layout_bytes = profiler.time_step("0. Read Layout", || {
            self.source.read_file(input_path)
        })?;
        let cache_key = OutlineCacheKey::new(
            calculate_layout_hash(&layout_bytes),
            self.config_hash.clone(),
        );

        let cached_result = if skip_cache {
            log::debug!("🚫 Skipping cache lookup (--skip-cache enabled)");
            None
        } else {
            profiler.time_step("Cache Lookup", || self.storage.get_outline(&cache_key))?
        };

        if let Some(cached) = cached_result {
            log::info!(
                "🎯 Cache hit: {} (built {})",
                input_path.display(),
                cached.created_at.format("%Y-%m-%d %H:%M:%S")
            );
            profiler.print_summary();
            return Ok(cached.outline);
        }

        log::info!("📄 Processing layout: {}", input_path.display());

        let pages = profiler.time_step("0. Decode Layout", || {
            self.source.parse_layout(&layout_bytes)
        })?;
        let stages = self.run_stages(&pages, &mut profiler)?;
        let outline = stages.outline;

        if !skip_cache {
            profiler.time_step("Cache Storage", || {
                let processing_time = start_time.elapsed().as_millis() as u64;
                let cache_value = OutlineCacheValue::new(outline.clone(), processing_time);
                self.storage.store_outline(&cache_key, &cache_value)
            })?;
        }

        profiler.print_summary();
        log::debug!(
            "⏱️  Total processing time: {:.3}s",
            start_time.elapsed().as_secs_f64()
        );
        Ok(outline)
    }

    /// Run the pipeline on already-decoded pages, bypassing the cache
    pub fn process_layout(&self, pages: &[PageLayout]) -> Result<DocumentOutline> {
        let stages = self.run_stages(pages, &mut StepProfiler::new(false))?;
        Ok(stages.outline)
    }

    /// Process a layout file and capture all intermediate stage outputs
    /// Used for pipeline diagnostics and testing stage boundaries
    pub fn process_capture_stages(&self, input_path: &Path) -> Result<PipelineStages> {
        let pages = self.source.load_file(input_path)?;
        let stages = self.run_stages(&pages, &mut StepProfiler::new(false))?;

        log::debug!(
            "📋 Stages: {} assembled, {} merged, {} levels, {} candidates, {} entries",
            stages.assembled_lines.len(),
            stages.merged_lines.len(),
            stages.heading_levels.len(),
            stages.candidates.len(),
            stages.outline.outline.len()
        );
        Ok(stages)
    }

    fn run_stages(
        &self,
        pages: &[PageLayout],
        profiler: &mut StepProfiler,
    ) -> Result<PipelineStages> {
        let assembled_lines =
            profiler.time_step("1. Line Assembly", || self.rule_engine.assemble(pages));
        self.rule_engine.run_pipeline(assembled_lines, profiler)
    }
}
