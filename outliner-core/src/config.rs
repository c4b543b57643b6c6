use anyhow::Result;
use serde::{Deserialize, Serialize};

// Default value functions for serde
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineConfig {
    /// Wrapped-line and numbering-token repair
    #[serde(default)]
    pub line_merge: LineMergeConfig,
    /// Title detection behavior
    #[serde(default)]
    pub title: TitleConfig,
    /// Body-text suppression and heading level promotion
    #[serde(default)]
    pub levels: LevelConfig,
    /// Lexical rejection table for heading candidates
    #[serde(default)]
    pub filter: HeadingFilterConfig,
    /// Outline repair rules to run, in order
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Log a structural report on every final outline
    #[serde(default = "default_true")]
    pub validation: bool,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            line_merge: LineMergeConfig::default(),
            title: TitleConfig::default(),
            levels: LevelConfig::default(),
            filter: HeadingFilterConfig::default(),
            pipeline: PipelineConfig::default(),
            validation: true,
        }
    }
}

impl OutlineConfig {
    /// Load config from a YAML file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: OutlineConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

// ===== LINE MERGE =====

fn default_enumeration_token_pattern() -> String {
    r"^[0-9]+[.)]$".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineMergeConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// A line matching this pattern is folded into the line after it
    #[serde(default = "default_enumeration_token_pattern")]
    pub enumeration_token_pattern: String,
    /// Keep "Label:" and a following "- item" apart even within one block
    #[serde(default = "default_true")]
    pub keep_bullets_under_labels: bool,
}

impl Default for LineMergeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            enumeration_token_pattern: default_enumeration_token_pattern(),
            keep_bullets_under_labels: true,
        }
    }
}

// ===== TITLE =====

fn default_artifact_run_length() -> usize {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleConfig {
    /// Runs of this many identical letters (or more) collapse to one
    #[serde(default = "default_artifact_run_length")]
    pub artifact_run_length: usize,
    /// Skip a title line that repeats the previous title line verbatim
    #[serde(default = "default_true")]
    pub collapse_repeated_lines: bool,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            artifact_run_length: default_artifact_run_length(),
            collapse_repeated_lines: true,
        }
    }
}

// ===== HEADING LEVELS =====

fn default_dominant_ratio() -> f32 {
    0.5
}

fn default_frequent_ratio() -> f32 {
    0.3
}

fn default_min_level_occurrences() -> usize {
    2
}

fn default_max_levels() -> usize {
    5
}

/// Empirical thresholds, tuned on administrative forms and reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelConfig {
    /// A size holding more than this share of lines is body text
    #[serde(default = "default_dominant_ratio")]
    pub dominant_ratio: f32,
    /// A most-frequent (but not largest) size above this share is body text
    #[serde(default = "default_frequent_ratio")]
    pub frequent_ratio: f32,
    /// Sizes after the largest need at least this many lines to become a level
    #[serde(default = "default_min_level_occurrences")]
    pub min_level_occurrences: usize,
    /// Capped at 5 (H1..H5)
    #[serde(default = "default_max_levels")]
    pub max_levels: usize,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            dominant_ratio: default_dominant_ratio(),
            frequent_ratio: default_frequent_ratio(),
            min_level_occurrences: default_min_level_occurrences(),
            max_levels: default_max_levels(),
        }
    }
}

// ===== HEADING FILTER =====

fn default_min_chars() -> usize {
    4
}

fn default_numbering_prefix_pattern() -> String {
    r"^[0-9]+\.\s*".to_string()
}

fn default_form_labels() -> Vec<String> {
    vec![
        "Name".to_string(),
        "Age".to_string(),
        "Date".to_string(),
        "Signature".to_string(),
        "S.No".to_string(),
        "Relationship".to_string(),
        "Service".to_string(),
        "Designation".to_string(),
        "PAY + SI + NPA".to_string(),
        "Rs.".to_string(),
    ]
}

fn default_rejected_prefixes() -> Vec<String> {
    vec![
        "Whether".to_string(),
        "Name of".to_string(),
        "Date of".to_string(),
    ]
}

fn default_rejected_suffixes() -> Vec<String> {
    vec![".".to_string()]
}

fn default_rejected_substrings() -> Vec<String> {
    vec![
        "Service Book".to_string(),
        "Government Servant".to_string(),
    ]
}

fn default_case_insensitive_prefixes() -> Vec<String> {
    vec!["version".to_string()]
}

fn default_board_suffix() -> String {
    "Board".to_string()
}

fn default_board_min_words() -> usize {
    3
}

fn default_months() -> Vec<String> {
    [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ]
    .iter()
    .map(|m| m.to_string())
    .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadingFilterConfig {
    /// Stripped heading text shorter than this (in characters) is rejected
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
    /// Leading enumeration removed before evaluation and storage
    #[serde(default = "default_numbering_prefix_pattern")]
    pub numbering_prefix_pattern: String,
    /// Administrative form labels, matched exactly
    #[serde(default = "default_form_labels")]
    pub form_labels: Vec<String>,
    /// Form-question openers
    #[serde(default = "default_rejected_prefixes")]
    pub rejected_prefixes: Vec<String>,
    /// Sentence endings
    #[serde(default = "default_rejected_suffixes")]
    pub rejected_suffixes: Vec<String>,
    /// Boilerplate phrases anywhere in the text
    #[serde(default = "default_rejected_substrings")]
    pub rejected_substrings: Vec<String>,
    /// Prefixes compared case-insensitively (version strings)
    #[serde(default = "default_case_insensitive_prefixes")]
    pub case_insensitive_prefixes: Vec<String>,
    /// Organisation-name suffix ("... Examination Board")
    #[serde(default = "default_board_suffix")]
    pub board_suffix: String,
    /// The suffix only rejects texts with at least this many words
    #[serde(default = "default_board_min_words")]
    pub board_min_words: usize,
    /// Month names for the date detector (month followed by a 4-digit year)
    #[serde(default = "default_months")]
    pub months: Vec<String>,
    /// Additional reject patterns (regex), appended after the built-in rules
    #[serde(default)]
    pub extra_patterns: Vec<String>,
}

impl Default for HeadingFilterConfig {
    fn default() -> Self {
        Self {
            min_chars: default_min_chars(),
            numbering_prefix_pattern: default_numbering_prefix_pattern(),
            form_labels: default_form_labels(),
            rejected_prefixes: default_rejected_prefixes(),
            rejected_suffixes: default_rejected_suffixes(),
            rejected_substrings: default_rejected_substrings(),
            case_insensitive_prefixes: default_case_insensitive_prefixes(),
            board_suffix: default_board_suffix(),
            board_min_words: default_board_min_words(),
            months: default_months(),
            extra_patterns: Vec::new(),
        }
    }
}

// ===== PIPELINE =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Outline repair rules to run in order
    pub outline_rules: Vec<RuleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Name of the rule
    pub name: String,
    /// Whether this rule is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl RuleConfig {
    pub fn enabled(name: &str) -> Self {
        Self {
            name: name.to_string(),
            enabled: true,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            outline_rules: vec![
                RuleConfig::enabled("RepeatedHeadings"),
                RuleConfig::enabled("FragmentMerge"),
                RuleConfig::enabled("OrphanFragment"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_thresholds() {
        let config = OutlineConfig::default();
        assert_eq!(config.levels.dominant_ratio, 0.5);
        assert_eq!(config.levels.frequent_ratio, 0.3);
        assert_eq!(config.levels.min_level_occurrences, 2);
        assert_eq!(config.levels.max_levels, 5);
        assert_eq!(config.filter.min_chars, 4);
        assert_eq!(config.title.artifact_run_length, 3);
        assert!(config.filter.form_labels.contains(&"S.No".to_string()));
        assert_eq!(config.pipeline.outline_rules.len(), 3);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let yaml = r#"
levels:
  dominant_ratio: 0.6
filter:
  form_labels: ["Remarks"]
pipeline:
  outline_rules:
    - name: RepeatedHeadings
    - name: OrphanFragment
      enabled: false
"#;
        let config: OutlineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.levels.dominant_ratio, 0.6);
        assert_eq!(config.levels.frequent_ratio, 0.3);
        assert_eq!(config.filter.form_labels, vec!["Remarks".to_string()]);
        assert_eq!(config.filter.min_chars, 4);
        assert!(config.pipeline.outline_rules[0].enabled);
        assert!(!config.pipeline.outline_rules[1].enabled);
        assert!(config.line_merge.enabled);
        assert!(config.validation);
    }

    #[test]
    fn yaml_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outline.yaml");
        std::fs::write(&path, OutlineConfig::default().to_yaml().unwrap()).unwrap();

        let loaded = OutlineConfig::load_from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded.filter.months.len(), 12);
        assert_eq!(loaded.line_merge.enumeration_token_pattern, r"^[0-9]+[.)]$");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(OutlineConfig::load_from_file("/nonexistent/outline.yaml").is_err());
    }
}
