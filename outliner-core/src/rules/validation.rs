use super::engine::ParseRule;
use crate::types::*;
use anyhow::Result;
use std::collections::HashMap;

// OutlineValidationRule - structural checks on the final outline, report only
pub struct OutlineValidationRule;

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
    pub quality_score: f32,
    pub total_entries: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    DuplicateText {
        text: String,
        positions: Vec<usize>,
    },
    PageRegression {
        position: usize,
        from_page: u32,
        to_page: u32,
    },
    LevelJump {
        from_level: HeadingLevel,
        to_level: HeadingLevel,
        position: usize,
    },
    PageInconsistency {
        position: usize,
        page: u32,
        issue: String,
    },
}

impl OutlineValidationRule {
    pub fn new() -> Self {
        Self
    }

    /// Run every structural check
    pub fn validate(&self, entries: &[OutlineEntry]) -> ValidationReport {
        let mut issues = Vec::new();
        let total_entries = entries.len();

        // 1. Texts that survived deduplication more than once
        self.validate_uniqueness(entries, &mut issues);

        // 2. Pages must never go backwards
        self.validate_page_order(entries, &mut issues);

        // 3. Skipped levels (H1 → H3)
        self.validate_level_structure(entries, &mut issues);

        // Quality score (1.0 = perfect, 0.0 = many issues)
        let quality_score = if total_entries == 0 {
            1.0
        } else {
            (1.0 - (issues.len() as f32 / total_entries as f32)).max(0.0)
        };

        ValidationReport {
            issues,
            quality_score,
            total_entries,
        }
    }

    fn validate_uniqueness(&self, entries: &[OutlineEntry], issues: &mut Vec<ValidationIssue>) {
        let mut positions: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            positions.entry(entry.text.as_str()).or_default().push(i);
        }

        let mut duplicates: Vec<(&str, Vec<usize>)> = positions
            .into_iter()
            .filter(|(_, at)| at.len() > 1)
            .collect();
        duplicates.sort_by_key(|(_, at)| at[0]);

        for (text, positions) in duplicates {
            issues.push(ValidationIssue::DuplicateText {
                text: text.to_string(),
                positions,
            });
        }
    }

    fn validate_page_order(&self, entries: &[OutlineEntry], issues: &mut Vec<ValidationIssue>) {
        for (i, entry) in entries.iter().enumerate() {
            if entry.page == 0 {
                issues.push(ValidationIssue::PageInconsistency {
                    position: i,
                    page: entry.page,
                    issue: "Page number is 0 (should start from 1)".to_string(),
                });
            }

            if i > 0 {
                let prev_page = entries[i - 1].page;
                if entry.page < prev_page {
                    issues.push(ValidationIssue::PageRegression {
                        position: i,
                        from_page: prev_page,
                        to_page: entry.page,
                    });
                }
            }
        }
    }

    fn validate_level_structure(&self, entries: &[OutlineEntry], issues: &mut Vec<ValidationIssue>) {
        for (i, pair) in entries.windows(2).enumerate() {
            let (prev, curr) = (&pair[0], &pair[1]);
            // Flag descents of more than one level
            if curr.level.depth() > prev.level.depth() + 1 {
                issues.push(ValidationIssue::LevelJump {
                    from_level: prev.level,
                    to_level: curr.level,
                    position: i + 1,
                });
            }
        }
    }

    fn log_validation_report(&self, report: &ValidationReport) {
        log::debug!(
            "📊 Outline validation: quality {:.2}/1.00, {} issues over {} entries",
            report.quality_score,
            report.issues.len(),
            report.total_entries
        );

        for issue in &report.issues {
            match issue {
                ValidationIssue::DuplicateText { text, positions } => {
                    log::warn!("   🔁 Duplicate heading \"{text}\" at positions {positions:?}");
                }
                ValidationIssue::PageRegression {
                    position,
                    from_page,
                    to_page,
                } => {
                    log::warn!(
                        "   📄 Page order regression at {position}: page {from_page} → {to_page}"
                    );
                }
                ValidationIssue::LevelJump {
                    from_level,
                    to_level,
                    position,
                } => {
                    log::debug!("   📊 Level jump at {position}: {from_level} → {to_level}");
                }
                ValidationIssue::PageInconsistency {
                    position,
                    page,
                    issue,
                } => {
                    log::warn!("   📄 Page issue at {position} (page {page}): {issue}");
                }
            }
        }
    }
}

impl Default for OutlineValidationRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseRule<OutlineEntry> for OutlineValidationRule {
    fn apply(&self, entries: Vec<OutlineEntry>) -> Result<Vec<OutlineEntry>> {
        let report = self.validate(&entries);
        self.log_validation_report(&report);

        // Pure validation: entries pass through unchanged
        Ok(entries)
    }

    fn name(&self) -> &str {
        "OutlineValidation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use HeadingLevel::{H1, H2, H3};

    #[test]
    fn clean_outline_scores_perfectly() {
        let entries = vec![
            OutlineEntry::new(H1, "Introduction", 1),
            OutlineEntry::new(H2, "Background", 1),
            OutlineEntry::new(H1, "Scope", 2),
        ];
        let report = OutlineValidationRule::new().validate(&entries);
        assert!(report.issues.is_empty());
        assert_eq!(report.quality_score, 1.0);
    }

    #[test]
    fn reports_without_changing_entries() {
        let entries = vec![
            OutlineEntry::new(H1, "Scope", 3),
            OutlineEntry::new(H3, "Details", 2),
            OutlineEntry::new(H1, "Scope", 4),
        ];
        let report = OutlineValidationRule::new().validate(&entries);

        assert!(report.issues.contains(&ValidationIssue::DuplicateText {
            text: "Scope".to_string(),
            positions: vec![0, 2],
        }));
        assert!(report.issues.contains(&ValidationIssue::PageRegression {
            position: 1,
            from_page: 3,
            to_page: 2,
        }));
        assert!(report.issues.contains(&ValidationIssue::LevelJump {
            from_level: H1,
            to_level: H3,
            position: 1,
        }));

        let passed = OutlineValidationRule::new().apply(entries.clone()).unwrap();
        assert_eq!(passed, entries);
    }
}
