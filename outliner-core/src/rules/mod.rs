// Main rules module - delegates to the pipeline stages
// This file coordinates the rule system but actual implementations are in:
// - engine.rs: RuleEngine, ParseRule, FontHistogram and debug tracing
// - line_assembly.rs: spans → lines in reading order
// - line_merge.rs: wrapped-line and numbering-token repair
// - title_detection.rs: largest-font title extraction
// - heading_levels.rs: body-text suppression and level promotion
// - heading_filter.rs: lexical rejection table
// - outline_repair.rs: dedup, fragment merge, orphan drop
// - validation.rs: final structural report

pub mod engine;
pub mod heading_filter;
pub mod heading_levels;
pub mod line_assembly;
pub mod line_merge;
pub mod outline_repair;
pub mod title_detection;
pub mod validation;

pub use engine::*;
pub use heading_filter::{HeadingFilter, RejectRule, Verdict};
pub use heading_levels::{HeadingLevelClassifier, HeadingLevels};
pub use line_assembly::assemble_lines;
pub use line_merge::LineMergeRule;
pub use outline_repair::{FragmentMergeRule, OrphanFragmentRule, RepeatedHeadingRule};
pub use title_detection::{collapse_letter_runs, TitleDetection, TitleDetector};
pub use validation::{OutlineValidationRule, ValidationIssue, ValidationReport};
