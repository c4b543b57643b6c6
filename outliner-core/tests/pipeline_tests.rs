//! Pipeline tests: layout fixtures in, outlines out.
//!
//! Fixtures live in `test_fixtures/`:
//!
//! - `layouts/<name>.json`: extractor output (page dicts)
//! - `expected/<name>.json`: the outline the pipeline must produce
//!
//! Property tests below build small layouts inline instead, so each one
//! pins down exactly one behavior.

use outliner_core::extraction::{
    BlockLayout, JsonLayoutSource, LayoutSource, LineLayout, PageLayout, SpanLayout,
};
use outliner_core::rules::RuleEngine;
use outliner_core::{DocumentOutline, HeadingLevel, OutlineConfig, OutlineProcessor};
use std::collections::HashSet;
use std::path::PathBuf;

// ============================================================================
// Fixture helpers
// ============================================================================

const FIXTURES: [&str; 3] = ["annual_report", "grant_proposal", "service_form"];

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_fixtures")
}

fn layout_path(fixture_name: &str) -> PathBuf {
    fixtures_dir()
        .join("layouts")
        .join(format!("{fixture_name}.json"))
}

fn load_layout(fixture_name: &str) -> Vec<PageLayout> {
    let path = layout_path(fixture_name);
    JsonLayoutSource::new()
        .load_file(&path)
        .unwrap_or_else(|e| panic!("Bad fixture {}: {e}", path.display()))
}

fn load_expected(fixture_name: &str) -> DocumentOutline {
    let path = fixtures_dir()
        .join("expected")
        .join(format!("{fixture_name}.json"));
    let contents = std::fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Missing fixture: {}", path.display()));
    serde_json::from_str(&contents).expect("Invalid expected outline")
}

fn engine() -> RuleEngine {
    RuleEngine::new(&OutlineConfig::default()).unwrap()
}

fn outline_for(pages: &[PageLayout]) -> DocumentOutline {
    engine().extract_outline_from_pages(pages).unwrap()
}

/// One page, one block per (text, size) pair, top to bottom
fn single_page(lines: &[(&str, f32)]) -> Vec<PageLayout> {
    vec![page(lines)]
}

fn page(lines: &[(&str, f32)]) -> PageLayout {
    PageLayout::new(
        lines
            .iter()
            .enumerate()
            .map(|(i, (text, size))| {
                BlockLayout::new(40.0 + i as f32 * 30.0, vec![LineLayout::single(*text, *size)])
            })
            .collect(),
    )
}

fn texts(outline: &DocumentOutline) -> Vec<&str> {
    outline.outline.iter().map(|e| e.text.as_str()).collect()
}

// ============================================================================
// Fixture outlines
// ============================================================================

mod fixture_outlines {
    use super::*;

    #[test]
    fn annual_report_matches_expected() {
        assert_eq!(
            outline_for(&load_layout("annual_report")),
            load_expected("annual_report")
        );
    }

    #[test]
    fn grant_proposal_matches_expected() {
        assert_eq!(
            outline_for(&load_layout("grant_proposal")),
            load_expected("grant_proposal")
        );
    }

    #[test]
    fn service_form_labels_never_become_headings() {
        let outline = outline_for(&load_layout("service_form"));
        assert_eq!(outline, load_expected("service_form"));
    }

    #[test]
    fn processor_output_matches_engine_output() {
        let processor = OutlineProcessor::new_uncached(&OutlineConfig::default()).unwrap();
        for name in FIXTURES {
            let from_file = processor.process_file(&layout_path(name)).unwrap();
            assert_eq!(from_file, load_expected(name), "{name}");
        }
    }

    #[test]
    fn output_json_uses_stable_field_names() {
        let outline = outline_for(&load_layout("annual_report"));
        let json: serde_json::Value =
            serde_json::from_str(&outline.to_json_pretty().unwrap()).unwrap();

        assert_eq!(json["title"], "Annual Report 2024");
        assert_eq!(json["outline"][0]["level"], "H1");
        assert_eq!(json["outline"][0]["text"], "Introduction");
        assert_eq!(json["outline"][0]["page"], 1);
    }
}

// ============================================================================
// Outline-wide properties
// ============================================================================

mod outline_properties {
    use super::*;

    #[test]
    fn heading_texts_are_unique() {
        for name in FIXTURES {
            let outline = outline_for(&load_layout(name));
            let unique: HashSet<&str> = texts(&outline).into_iter().collect();
            assert_eq!(unique.len(), outline.outline.len(), "{name}");
        }
    }

    #[test]
    fn pages_never_decrease() {
        for name in FIXTURES {
            let outline = outline_for(&load_layout(name));
            for pair in outline.outline.windows(2) {
                assert!(pair[0].page <= pair[1].page, "{name}: {pair:?}");
            }
        }
    }

    #[test]
    fn rerunning_on_merged_lines_is_a_no_op() {
        let engine = engine();
        for name in FIXTURES {
            let assembled = engine.assemble(&load_layout(name));
            let merged = engine.merge_lines(assembled.clone()).unwrap();
            assert_eq!(engine.merge_lines(merged.clone()).unwrap(), merged, "{name}");

            let from_raw = engine.extract_outline(assembled).unwrap();
            let from_merged = engine.extract_outline(merged).unwrap();
            assert_eq!(from_raw, from_merged, "{name}");
        }
    }

    #[test]
    fn histogram_does_not_leak_between_documents() {
        let shared = engine();
        let _ = shared
            .extract_outline_from_pages(&load_layout("grant_proposal"))
            .unwrap();
        let after_other_document = shared
            .extract_outline_from_pages(&load_layout("annual_report"))
            .unwrap();

        assert_eq!(after_other_document, outline_for(&load_layout("annual_report")));
    }
}

// ============================================================================
// Stage behaviors
// ============================================================================

mod stage_behaviors {
    use super::*;

    #[test]
    fn title_letter_runs_collapse() {
        let outline = outline_for(&single_page(&[
            ("RRRRequest fffor Proposal", 24.0),
            ("Summary", 12.0),
        ]));
        assert_eq!(outline.title, "Request for Proposal");
    }

    #[test]
    fn title_double_letters_are_untouched() {
        let outline = outline_for(&single_page(&[("Apply Bookkeeping", 24.0)]));
        assert_eq!(outline.title, "Apply Bookkeeping");
    }

    #[test]
    fn numeral_token_folds_and_prefix_is_stripped() {
        let engine = engine();
        let pages = single_page(&[
            ("Grant Guidelines", 24.0),
            ("2.", 16.0),
            ("Eligibility", 16.0),
            ("Who may apply.", 11.0),
            ("Residents only.", 11.0),
            ("Apply online.", 11.0),
            ("Deadlines", 16.0),
        ]);

        let merged = engine.merge_lines(engine.assemble(&pages)).unwrap();
        assert!(merged.iter().any(|l| l.text == "2. Eligibility"));
        assert!(!merged.iter().any(|l| l.text == "2."));

        let outline = engine.extract_outline_from_pages(&pages).unwrap();
        assert_eq!(texts(&outline), vec!["Eligibility", "Deadlines"]);
    }

    #[test]
    fn label_and_bullet_stay_separate_lines() {
        let engine = engine();
        let pages = vec![PageLayout::new(vec![BlockLayout::new(
            100.0,
            vec![
                LineLayout::single("Benefits:", 12.0),
                LineLayout::single("- Medical", 12.0),
            ],
        )])];

        let merged = engine.merge_lines(engine.assemble(&pages)).unwrap();
        let merged_texts: Vec<&str> = merged.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(merged_texts, vec!["Benefits:", "- Medical"]);
    }

    #[test]
    fn annual_report_scenario() {
        let outline = outline_for(&single_page(&[
            ("Annual Report 2024", 24.0),
            ("Annual Report 2024", 24.0),
            ("1. Introduction", 16.0),
            ("This is body text.", 11.0),
            ("2. Scope", 16.0),
            ("This is body text.", 11.0),
        ]));

        assert_eq!(outline.title, "Annual Report 2024");
        assert_eq!(texts(&outline), vec!["Introduction", "Scope"]);
        assert!(outline
            .outline
            .iter()
            .all(|e| e.level == HeadingLevel::H1 && e.page == 1));
    }

    #[test]
    fn running_header_is_removed() {
        let pages = vec![
            page(&[
                ("Quarterly Review", 24.0),
                ("Confidential", 16.0),
                ("Revenue", 16.0),
                ("Revenue grew this quarter.", 11.0),
                ("Margins held.", 11.0),
                ("Cash improved.", 11.0),
            ]),
            page(&[
                ("Confidential", 16.0),
                ("Expenses", 16.0),
                ("Costs were flat overall.", 11.0),
                ("Travel fell.", 11.0),
                ("Hiring paused.", 11.0),
            ]),
            page(&[
                ("Confidential", 16.0),
                ("Outlook", 16.0),
                ("We expect steady growth.", 11.0),
                ("Risks remain.", 11.0),
                ("Guidance is unchanged.", 11.0),
            ]),
        ];

        let outline = outline_for(&pages);
        assert_eq!(outline.title, "Quarterly Review");
        assert!(!texts(&outline).contains(&"Confidential"));
        assert_eq!(texts(&outline), vec!["Revenue", "Expenses", "Outlook"]);
        assert_eq!(
            outline.outline.iter().map(|e| e.page).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn spans_of_one_line_are_joined() {
        let pages = vec![PageLayout::new(vec![
            BlockLayout::new(
                40.0,
                vec![LineLayout::new(vec![
                    SpanLayout::new("Field", 22.0),
                    SpanLayout::new(" Notes ", 22.0),
                ])],
            ),
            BlockLayout::new(90.0, vec![LineLayout::single("Methods", 14.0)]),
            BlockLayout::new(120.0, vec![LineLayout::single("Samples were dried.", 11.0)]),
            BlockLayout::new(150.0, vec![LineLayout::single("Results", 14.0)]),
            BlockLayout::new(180.0, vec![LineLayout::single("Data was logged.", 11.0)]),
        ])];
        let outline = outline_for(&pages);
        assert_eq!(outline.title, "Field Notes");
        assert_eq!(texts(&outline), vec!["Methods", "Results"]);
    }
}

// ============================================================================
// Degenerate inputs
// ============================================================================

mod degenerate_inputs {
    use super::*;

    #[test]
    fn no_pages() {
        assert_eq!(outline_for(&[]), DocumentOutline::empty());
    }

    #[test]
    fn pages_with_only_image_blocks() {
        let pages = vec![PageLayout::new(vec![BlockLayout::default()])];
        assert_eq!(outline_for(&pages), DocumentOutline::empty());
    }

    #[test]
    fn single_size_document_has_title_only() {
        let outline = outline_for(&single_page(&[("Memo", 12.0), ("Lunch at noon", 12.0)]));
        assert_eq!(outline.title, "Memo Lunch at noon");
        assert!(outline.outline.is_empty());
    }
}
