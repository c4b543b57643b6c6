//! Batch processing over a directory of layout dumps.
//!
//! Documents are independent: each one runs the full pipeline on its own,
//! and one failure never stops the rest of the batch.

use anyhow::{Context, Result};
use outliner_core::{OutlineProcessor, PipelineStages};
use rayon::prelude::*;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub output_dir: PathBuf,
    pub enable_profiling: bool,
    pub skip_cache: bool,
    /// Process one document at a time instead of using the thread pool
    pub sequential: bool,
}

/// Outcome for one input document
#[derive(Debug)]
pub struct DocumentResult {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub heading_count: usize,
    pub error: Option<String>,
    pub latency_ms: u128,
}

impl DocumentResult {
    pub fn success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub results: Vec<DocumentResult>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}

/// Layout files to process: the file itself, or supported files in a directory (sorted)
pub fn collect_layout_files(input: &Path, processor: &OutlineProcessor) -> Result<Vec<PathBuf>> {
    if !input.exists() {
        anyhow::bail!("Input not found at: {}", input.display());
    }
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(input)
        .with_context(|| format!("Failed to read input directory {}", input.display()))?
    {
        let path = entry?.path();
        if path.is_file() && processor.supports_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// `<output_dir>/<input stem>.json`
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let mut file_name = input
        .file_stem()
        .unwrap_or(OsStr::new("output"))
        .to_os_string();
    file_name.push(".json");
    output_dir.join(file_name)
}

pub fn process_batch(
    processor: &OutlineProcessor,
    files: &[PathBuf],
    options: &BatchOptions,
) -> Result<BatchReport> {
    fs::create_dir_all(&options.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            options.output_dir.display()
        )
    })?;

    let process_file = |input_path: &PathBuf| -> DocumentResult {
        let start = Instant::now();
        let output_path = output_path_for(input_path, &options.output_dir);

        let outcome = processor
            .process_file_with_options(input_path, options.enable_profiling, options.skip_cache)
            .and_then(|outline| {
                outline.save_to_json(&output_path)?;
                Ok(outline.outline.len())
            });

        match outcome {
            Ok(heading_count) => DocumentResult {
                input_path: input_path.clone(),
                output_path,
                heading_count,
                error: None,
                latency_ms: start.elapsed().as_millis(),
            },
            Err(e) => DocumentResult {
                input_path: input_path.clone(),
                output_path,
                heading_count: 0,
                error: Some(format!("{e:#}")),
                latency_ms: start.elapsed().as_millis(),
            },
        }
    };

    let results: Vec<DocumentResult> = if options.sequential {
        files.iter().map(process_file).collect()
    } else {
        files.par_iter().map(process_file).collect()
    };

    Ok(BatchReport { results })
}

/// Write every captured stage of one document under `stages_dir/<stem>/`
pub fn save_stages(stages: &PipelineStages, input: &Path, stages_dir: &Path) -> Result<PathBuf> {
    let stem = input.file_stem().unwrap_or(OsStr::new("document"));
    let output_dir = stages_dir.join(stem);
    fs::create_dir_all(&output_dir)?;

    write_json(&output_dir, "stage1_lines.json", &stages.assembled_lines)?;
    write_json(&output_dir, "stage2_merged_lines.json", &stages.merged_lines)?;
    write_json(
        &output_dir,
        "stage3_title.json",
        &serde_json::json!({ "title": stages.title, "font_size": stages.title_size }),
    )?;
    write_json(
        &output_dir,
        "stage4_levels.json",
        &serde_json::json!({
            "histogram": stages.font_histogram,
            "levels": stages.heading_levels,
        }),
    )?;
    write_json(&output_dir, "stage5_candidates.json", &stages.candidates)?;
    write_json(&output_dir, "stage6_outline.json", &stages.outline)?;

    // Summary file: quick reference for comparing runs
    let summary = serde_json::json!({
        "input": input.display().to_string(),
        "captured_at": chrono::Utc::now().to_rfc3339(),
        "stage_counts": {
            "assembled_lines": stages.assembled_lines.len(),
            "merged_lines": stages.merged_lines.len(),
            "heading_levels": stages.heading_levels.len(),
            "candidates": stages.candidates.len(),
            "outline_entries": stages.outline.outline.len(),
        }
    });
    write_json(&output_dir, "summary.json", &summary)?;

    Ok(output_dir)
}

fn write_json<T: serde::Serialize>(dir: &Path, name: &str, value: &T) -> Result<()> {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(value)?)?;
    println!("  💾 {}", path.display());
    Ok(())
}
