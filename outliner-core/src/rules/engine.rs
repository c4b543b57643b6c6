use crate::config::OutlineConfig;
use crate::extraction::PageLayout;
use crate::processor::{PipelineStages, StepProfiler};
use crate::types::*;
use anyhow::Result;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;

use super::heading_filter::HeadingFilter;
use super::heading_levels::{HeadingLevelClassifier, HeadingLevels};
use super::line_assembly::assemble_lines;
use super::line_merge::LineMergeRule;
use super::outline_repair::{FragmentMergeRule, OrphanFragmentRule, RepeatedHeadingRule};
use super::title_detection::{TitleDetection, TitleDetector};
use super::validation::OutlineValidationRule;

// Debug configuration for pipeline tracing
#[derive(Debug, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub filter_patterns: Vec<String>,
}

impl DebugConfig {
    pub fn new(enabled: bool, filter_patterns: Vec<String>) -> Self {
        Self {
            enabled,
            filter_patterns,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            filter_patterns: Vec::new(),
        }
    }
}

/// Trace texts matching the debug filters as they leave a pipeline stage
pub fn debug_pipeline_texts<'a>(
    stage_name: &str,
    texts: impl IntoIterator<Item = &'a str>,
    debug_config: &DebugConfig,
) {
    if !debug_config.enabled || debug_config.filter_patterns.is_empty() {
        return;
    }

    let matchers: Vec<Option<Regex>> = debug_config
        .filter_patterns
        .iter()
        .map(|pattern| Regex::new(pattern).ok())
        .collect();

    for (index, text) in texts.into_iter().enumerate() {
        let matched = debug_config
            .filter_patterns
            .iter()
            .zip(&matchers)
            .any(|(pattern, regex)| match regex {
                // Try regex first, fall back to simple string contains
                Some(regex) => regex.is_match(text),
                None => text.contains(pattern.as_str()),
            });
        if matched {
            log::debug!("🔍 [{stage_name}] #{index}: \"{text}\"");
        }
    }
}

// Sequential rule pipeline infrastructure
pub trait ParseRule<T> {
    fn apply(&self, items: Vec<T>) -> Result<Vec<T>>;
    fn name(&self) -> &str;
}

/// Rounded font size → line count for one document.
///
/// Built from scratch on every run; sizes keep the order in which they were
/// first seen so that frequency ties resolve towards reading order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FontHistogram {
    counts: Vec<(i32, usize)>,
    #[serde(skip)]
    index: HashMap<i32, usize>,
    total: usize,
}

impl FontHistogram {
    pub fn from_lines(lines: &[Line]) -> Self {
        let mut histogram = Self::default();
        for line in lines {
            histogram.add(line.rounded_size());
        }
        histogram
    }

    fn add(&mut self, size: i32) {
        match self.index.get(&size) {
            Some(&slot) => self.counts[slot].1 += 1,
            None => {
                self.index.insert(size, self.counts.len());
                self.counts.push((size, 1));
            }
        }
        self.total += 1;
    }

    pub fn count(&self, size: i32) -> usize {
        self.index
            .get(&size)
            .map(|&slot| self.counts[slot].1)
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn largest(&self) -> Option<i32> {
        self.counts.iter().map(|(size, _)| *size).max()
    }

    /// Most common size; on ties the size seen first wins
    pub fn most_frequent(&self) -> Option<i32> {
        self.counts
            .iter()
            .fold(None, |best: Option<(i32, usize)>, &(size, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((size, count)),
            })
            .map(|(size, _)| size)
    }

    pub fn sizes_descending(&self) -> Vec<i32> {
        let mut sizes: Vec<i32> = self.counts.iter().map(|(size, _)| *size).collect();
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        sizes
    }
}

pub struct RuleEngine {
    config: OutlineConfig,
    line_merge: LineMergeRule,
    heading_filter: HeadingFilter,
    debug_config: DebugConfig,
}

impl RuleEngine {
    /// Compile every configured pattern up front; bad patterns fail here
    pub fn new(config: &OutlineConfig) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            line_merge: LineMergeRule::new(&config.line_merge)?,
            heading_filter: HeadingFilter::from_config(&config.filter)?,
            debug_config: DebugConfig::disabled(),
        })
    }

    pub fn config(&self) -> &OutlineConfig {
        &self.config
    }

    pub fn set_debug_config(&mut self, debug_config: DebugConfig) {
        self.debug_config = debug_config;
    }

    /// Mutable access to the rejection table, for callers adding rules
    pub fn heading_filter_mut(&mut self) -> &mut HeadingFilter {
        &mut self.heading_filter
    }

    /// Stage 1: spans → ordered lines
    pub fn assemble(&self, pages: &[PageLayout]) -> Vec<Line> {
        let lines = assemble_lines(pages);
        log::debug!("🧱 Assembled {} lines from {} pages", lines.len(), pages.len());
        debug_pipeline_texts(
            "LineAssembly",
            lines.iter().map(|l| l.text.as_str()),
            &self.debug_config,
        );
        lines
    }

    /// Stage 2: reflow wrapped lines and numbering tokens
    pub fn merge_lines(&self, lines: Vec<Line>) -> Result<Vec<Line>> {
        if !self.config.line_merge.enabled {
            log::debug!("⏭️  Line merge disabled, skipping");
            return Ok(lines);
        }
        let before = lines.len();
        let merged = self.line_merge.apply(lines)?;
        log::debug!(
            "🔗 {}: {} lines → {}",
            self.line_merge.name(),
            before,
            merged.len()
        );
        debug_pipeline_texts(
            self.line_merge.name(),
            merged.iter().map(|l| l.text.as_str()),
            &self.debug_config,
        );
        Ok(merged)
    }

    /// Stage 3: largest-font lines become the title
    pub fn detect_title(&self, lines: Vec<Line>) -> TitleDetection {
        let detection = TitleDetector::new(&self.config.title).detect(lines);
        log::debug!(
            "🏷️  Title: \"{}\" ({} lines remain)",
            detection.title,
            detection.remaining.len()
        );
        detection
    }

    /// Stage 4: histogram + body suppression + level promotion
    pub fn classify_levels(&self, lines: &[Line]) -> (FontHistogram, HeadingLevels) {
        let histogram = FontHistogram::from_lines(lines);
        let levels = HeadingLevelClassifier::new(&self.config.levels).classify(&histogram);
        log::debug!(
            "📏 {} sizes over {} lines, body size {:?}, levels {:?}",
            histogram.sizes_descending().len(),
            histogram.total(),
            levels.excluded_body_size(),
            levels.sizes()
        );
        (histogram, levels)
    }

    /// Stage 5: lexical rejection of heading candidates
    pub fn filter_candidates(&self, lines: &[Line], levels: &HeadingLevels) -> Vec<OutlineEntry> {
        let entries = self.heading_filter.filter(lines, levels);
        debug_pipeline_texts(
            "HeadingFilter",
            entries.iter().map(|e| e.text.as_str()),
            &self.debug_config,
        );
        entries
    }

    /// Stage 6: configured outline repair rules, then the validation report
    pub fn repair_outline(&self, entries: Vec<OutlineEntry>) -> Result<Vec<OutlineEntry>> {
        let mut entries = entries;

        for rule_config in &self.config.pipeline.outline_rules {
            if !rule_config.enabled {
                log::debug!("⏭️  Skipping disabled rule: {}", rule_config.name);
                continue;
            }
            entries = self.apply_rule_by_name(&rule_config.name, entries)?;
            log::debug!("✅ {} entries after {}", entries.len(), rule_config.name);
        }

        if self.config.validation {
            entries = OutlineValidationRule::new().apply(entries)?;
        }

        Ok(entries)
    }

    fn apply_rule_by_name(
        &self,
        rule_name: &str,
        entries: Vec<OutlineEntry>,
    ) -> Result<Vec<OutlineEntry>> {
        let result = match rule_name {
            "RepeatedHeadings" => RepeatedHeadingRule.apply(entries)?,
            "FragmentMerge" => FragmentMergeRule.apply(entries)?,
            "OrphanFragment" => OrphanFragmentRule.apply(entries)?,
            _ => {
                log::warn!("⚠️  Unknown rule: {rule_name}. Skipping...");
                entries
            }
        };
        debug_pipeline_texts(
            rule_name,
            result.iter().map(|e| e.text.as_str()),
            &self.debug_config,
        );
        Ok(result)
    }

    /// Stages 2-6 over assembled lines; every outline the crate produces goes through here
    pub fn run_pipeline(
        &self,
        assembled_lines: Vec<Line>,
        profiler: &mut StepProfiler,
    ) -> Result<PipelineStages> {
        let merged_lines =
            profiler.time_step("2. Line Merge", || self.merge_lines(assembled_lines.clone()))?;

        let TitleDetection {
            title,
            title_size,
            remaining,
        } = profiler.time_step("3. Title Detection", || {
            self.detect_title(merged_lines.clone())
        });

        let (font_histogram, heading_levels) =
            profiler.time_step("4. Heading Levels", || self.classify_levels(&remaining));

        let candidates = profiler.time_step("5. Heading Filter", || {
            self.filter_candidates(&remaining, &heading_levels)
        });

        let entries =
            profiler.time_step("6. Outline Repair", || self.repair_outline(candidates.clone()))?;

        Ok(PipelineStages {
            assembled_lines,
            merged_lines,
            title: title.clone(),
            title_size,
            font_histogram,
            heading_levels,
            candidates,
            outline: DocumentOutline {
                title,
                outline: entries,
            },
        })
    }

    /// Full pipeline over one document's lines
    pub fn extract_outline(&self, lines: Vec<Line>) -> Result<DocumentOutline> {
        let stages = self.run_pipeline(lines, &mut StepProfiler::new(false))?;
        Ok(stages.outline)
    }

    /// Full pipeline starting from extractor output
    pub fn extract_outline_from_pages(&self, pages: &[PageLayout]) -> Result<DocumentOutline> {
        self.extract_outline(self.assemble(pages))
    }
}
