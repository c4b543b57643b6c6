// Outliner Core Library
//
// Infers a document outline (title + H1..H5 headings) from extracted page
// layout, using font size and lexical patterns only.

pub mod cache;
pub mod config;
pub mod extraction;
pub mod processor;
pub mod rules;
pub mod storage;
pub mod types;

// Re-export main types and functions for easy use
pub use config::OutlineConfig;
pub use extraction::{ExtractionError, JsonLayoutSource, LayoutSource, PageLayout};
pub use processor::{OutlineProcessor, PipelineStages, StepProfiler};
pub use rules::RuleEngine;
pub use types::*;
