use crate::config::HeadingFilterConfig;
use crate::types::{Line, OutlineEntry};
use anyhow::{Context, Result};
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use super::heading_levels::HeadingLevels;

static NUMERIC_ONLY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9.]+$").unwrap());

static LIST_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\([A-Za-z0-9]+\)").unwrap());

type Predicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// A named predicate over numbering-stripped candidate text; `true` rejects.
pub struct RejectRule {
    name: String,
    predicate: Predicate,
}

impl RejectRule {
    pub fn new(
        name: impl Into<String>,
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            predicate: Box::new(predicate),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rejects(&self, text: &str) -> bool {
        (self.predicate)(text)
    }
}

impl fmt::Debug for RejectRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RejectRule").field("name", &self.name).finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Accepted, carrying the text to store
    Accept(String),
    /// Rejected by the named rule
    Reject(String),
}

/// HeadingFilter - ordered rejection table for heading candidates
///
/// The table is built from `HeadingFilterConfig`; callers may append rules
/// with `push_rule`. The first matching rule rejects.
#[derive(Debug)]
pub struct HeadingFilter {
    numbering_prefix: Regex,
    rules: Vec<RejectRule>,
}

impl HeadingFilter {
    pub fn from_config(config: &HeadingFilterConfig) -> Result<Self> {
        let numbering_prefix = Regex::new(&config.numbering_prefix_pattern).with_context(|| {
            format!(
                "invalid numbering prefix pattern: {}",
                config.numbering_prefix_pattern
            )
        })?;

        let mut rules = Vec::new();

        let min_chars = config.min_chars;
        rules.push(RejectRule::new("too-short", move |text: &str| {
            text.is_empty() || text.chars().count() < min_chars
        }));

        let form_labels: HashSet<String> = config.form_labels.iter().cloned().collect();
        rules.push(RejectRule::new("form-label", move |text: &str| {
            NUMERIC_ONLY_REGEX.is_match(text) || form_labels.contains(text)
        }));

        rules.push(RejectRule::new("list-marker", |text: &str| {
            LIST_MARKER_REGEX.is_match(text)
        }));

        let suffixes = config.rejected_suffixes.clone();
        let prefixes = config.rejected_prefixes.clone();
        rules.push(RejectRule::new("sentence-or-question", move |text: &str| {
            suffixes.iter().any(|s| text.ends_with(s.as_str()))
                || prefixes.iter().any(|p| text.starts_with(p.as_str()))
        }));

        let substrings = config.rejected_substrings.clone();
        rules.push(RejectRule::new("boilerplate-phrase", move |text: &str| {
            substrings.iter().any(|s| text.contains(s.as_str()))
        }));

        let ci_prefixes: Vec<String> = config
            .case_insensitive_prefixes
            .iter()
            .map(|p| p.to_lowercase())
            .collect();
        rules.push(RejectRule::new("version-string", move |text: &str| {
            let lowered = text.to_lowercase();
            ci_prefixes.iter().any(|p| lowered.starts_with(p.as_str()))
        }));

        if !config.board_suffix.is_empty() {
            let suffix = config.board_suffix.clone();
            let min_words = config.board_min_words;
            rules.push(RejectRule::new("organisation-name", move |text: &str| {
                text.ends_with(suffix.as_str()) && text.split_whitespace().count() >= min_words
            }));
        }

        if let Some(dated) = month_year_regex(&config.months)? {
            rules.push(RejectRule::new("dated-text", move |text: &str| {
                dated.is_match(text)
            }));
        }

        for pattern in &config.extra_patterns {
            let regex = Regex::new(pattern)
                .with_context(|| format!("invalid reject pattern: {pattern}"))?;
            rules.push(RejectRule::new(format!("pattern:{pattern}"), move |text: &str| {
                regex.is_match(text)
            }));
        }

        Ok(Self {
            numbering_prefix,
            rules,
        })
    }

    /// Append a rule after the configured ones
    pub fn push_rule(&mut self, rule: RejectRule) {
        self.rules.push(rule);
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Remove a leading "N." enumeration, if present
    pub fn strip_numbering(&self, text: &str) -> String {
        self.numbering_prefix.replace(text, "").into_owned()
    }

    pub fn evaluate(&self, text: &str) -> Verdict {
        let stripped = self.strip_numbering(text.trim());
        match self.rules.iter().find(|rule| rule.rejects(&stripped)) {
            Some(rule) => Verdict::Reject(rule.name().to_string()),
            None => Verdict::Accept(stripped),
        }
    }

    /// Turn lines at a heading size into outline entries, preserving order.
    pub fn filter(&self, lines: &[Line], levels: &HeadingLevels) -> Vec<OutlineEntry> {
        let mut entries = Vec::new();

        for line in lines {
            let Some(level) = levels.level_for(line.rounded_size()) else {
                continue;
            };
            match self.evaluate(&line.text) {
                Verdict::Accept(text) => entries.push(OutlineEntry::new(level, text, line.page)),
                Verdict::Reject(rule) => {
                    log::trace!("❌ Rejected \"{}\" ({rule})", line.text);
                }
            }
        }

        entries
    }
}

fn month_year_regex(months: &[String]) -> Result<Option<Regex>> {
    if months.is_empty() {
        return Ok(None);
    }
    let alternation = months
        .iter()
        .map(|m| regex::escape(m))
        .collect::<Vec<_>>()
        .join("|");
    let regex = Regex::new(&format!(r"\b(?:{alternation})\b.*\b\d{{4}}\b"))
        .context("invalid month list")?;
    Ok(Some(regex))
}
