use super::engine::ParseRule;
use crate::config::LineMergeConfig;
use crate::types::Line;
use anyhow::{Context, Result};
use regex::Regex;

/// LineMergeRule - reflows lines the extractor split apart
///
/// One left-to-right pass with a single line of lookahead:
/// - a bare enumeration token ("2.", "3)") folds into the line after it
/// - consecutive lines of the same block and rounded size merge, unless the
///   first ends with ':' and the second starts with '-' (label + bullet)
///
/// Merges build new lines; the input is consumed, never patched in place.
pub struct LineMergeRule {
    enumeration_token: Regex,
    keep_bullets_under_labels: bool,
}

impl LineMergeRule {
    pub fn new(config: &LineMergeConfig) -> Result<Self> {
        let enumeration_token = Regex::new(&config.enumeration_token_pattern).with_context(|| {
            format!(
                "invalid enumeration token pattern: {}",
                config.enumeration_token_pattern
            )
        })?;
        Ok(Self {
            enumeration_token,
            keep_bullets_under_labels: config.keep_bullets_under_labels,
        })
    }

    fn is_enumeration_token(&self, text: &str) -> bool {
        self.enumeration_token.is_match(text.trim())
    }

    fn is_bullet_under_label(&self, current: &Line, next: &Line) -> bool {
        self.keep_bullets_under_labels
            && current.text.trim().ends_with(':')
            && next.text.trim().starts_with('-')
    }

    fn should_merge(&self, current: &Line, next: &Line) -> bool {
        current.block == next.block
            && current.rounded_size() == next.rounded_size()
            && !self.is_bullet_under_label(current, next)
    }

    pub fn merge(&self, lines: Vec<Line>) -> Vec<Line> {
        let mut merged = Vec::with_capacity(lines.len());
        let mut iter = lines.into_iter();

        let Some(mut current) = iter.next() else {
            return merged;
        };

        for next in iter {
            if self.is_enumeration_token(&current.text) || self.should_merge(&current, &next) {
                current = current.fold_into(&next);
            } else {
                merged.push(std::mem::replace(&mut current, next));
            }
        }

        // Last line, including a trailing bare token
        merged.push(current);
        merged
    }
}

impl ParseRule<Line> for LineMergeRule {
    fn apply(&self, lines: Vec<Line>) -> Result<Vec<Line>> {
        Ok(self.merge(lines))
    }

    fn name(&self) -> &str {
        "LineMerge"
    }
}
