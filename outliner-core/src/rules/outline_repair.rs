use super::engine::ParseRule;
use crate::types::OutlineEntry;
use anyhow::Result;
use std::collections::HashMap;

/// RepeatedHeadingRule - drops running headers and footers
///
/// Any text that occurs more than once in the outline is removed entirely,
/// every occurrence included.
pub struct RepeatedHeadingRule;

impl ParseRule<OutlineEntry> for RepeatedHeadingRule {
    fn apply(&self, entries: Vec<OutlineEntry>) -> Result<Vec<OutlineEntry>> {
        let mut occurrences: HashMap<&str, usize> = HashMap::new();
        for entry in &entries {
            *occurrences.entry(entry.text.as_str()).or_insert(0) += 1;
        }

        let repeated: Vec<String> = occurrences
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(text, _)| text.to_string())
            .collect();

        if repeated.is_empty() {
            return Ok(entries);
        }
        log::debug!("🔁 Removing repeated headings: {repeated:?}");

        Ok(entries
            .into_iter()
            .filter(|entry| !repeated.contains(&entry.text))
            .collect())
    }

    fn name(&self) -> &str {
        "RepeatedHeadings"
    }
}

/// FragmentMergeRule - rejoins headings the extractor split mid-phrase
///
/// An entry starting lowercase continues the previous kept entry when both
/// share level and page and the previous one does not end in '.' or ':'.
pub struct FragmentMergeRule;

impl FragmentMergeRule {
    fn continues(previous: &OutlineEntry, entry: &OutlineEntry) -> bool {
        previous.level == entry.level
            && previous.page == entry.page
            && !previous.text.ends_with(['.', ':'])
            && entry.starts_lowercase()
    }
}

impl ParseRule<OutlineEntry> for FragmentMergeRule {
    fn apply(&self, entries: Vec<OutlineEntry>) -> Result<Vec<OutlineEntry>> {
        let mut merged: Vec<OutlineEntry> = Vec::with_capacity(entries.len());

        for entry in entries {
            match merged.last_mut() {
                Some(previous) if Self::continues(previous, &entry) => {
                    previous.text.push(' ');
                    previous.text.push_str(&entry.text);
                }
                _ => merged.push(entry),
            }
        }

        Ok(merged)
    }

    fn name(&self) -> &str {
        "FragmentMerge"
    }
}

/// OrphanFragmentRule - a leading lowercase entry has nothing to continue
pub struct OrphanFragmentRule;

impl ParseRule<OutlineEntry> for OrphanFragmentRule {
    fn apply(&self, mut entries: Vec<OutlineEntry>) -> Result<Vec<OutlineEntry>> {
        if entries.first().is_some_and(OutlineEntry::starts_lowercase) {
            let orphan = entries.remove(0);
            log::debug!("🧹 Dropping orphan fragment \"{}\"", orphan.text);
        }
        Ok(entries)
    }

    fn name(&self) -> &str {
        "OrphanFragment"
    }
}
