use crate::config::TitleConfig;
use crate::types::Line;
use serde::Serialize;

use super::engine::FontHistogram;

/// Outcome of title detection: the title and everything that was not part of it
#[derive(Debug, Clone, Serialize)]
pub struct TitleDetection {
    pub title: String,
    /// Rounded font size of the title lines, None for empty input
    pub title_size: Option<i32>,
    pub remaining: Vec<Line>,
}

pub struct TitleDetector<'a> {
    config: &'a TitleConfig,
}

impl<'a> TitleDetector<'a> {
    pub fn new(config: &'a TitleConfig) -> Self {
        Self { config }
    }

    /// Lines at the largest rounded size form the title and leave the stream.
    pub fn detect(&self, lines: Vec<Line>) -> TitleDetection {
        let Some(title_size) = FontHistogram::from_lines(&lines).largest() else {
            return TitleDetection {
                title: String::new(),
                title_size: None,
                remaining: lines,
            };
        };

        let (mut title_lines, remaining): (Vec<Line>, Vec<Line>) = lines
            .into_iter()
            .partition(|line| line.rounded_size() == title_size);

        // Stable, so same-position lines keep reading order
        title_lines.sort_by(|a, b| {
            a.page
                .cmp(&b.page)
                .then(a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
        });

        let mut parts: Vec<&str> = Vec::with_capacity(title_lines.len());
        for line in &title_lines {
            if self.config.collapse_repeated_lines && parts.last() == Some(&line.text.as_str()) {
                continue;
            }
            parts.push(&line.text);
        }

        let joined = parts.join(" ");
        let title = collapse_letter_runs(joined.trim(), self.config.artifact_run_length);

        TitleDetection {
            title,
            title_size: Some(title_size),
            remaining,
        }
    }
}

/// Collapse runs of `min_run` or more identical ASCII letters to one letter.
///
/// "RRRRequest" → "Request"; "Apply" keeps its double letter.
pub fn collapse_letter_runs(text: &str, min_run: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let mut run = 1;
        while chars.peek() == Some(&c) {
            chars.next();
            run += 1;
        }
        let copies = if c.is_ascii_alphabetic() && run >= min_run {
            1
        } else {
            run
        };
        out.extend(std::iter::repeat(c).take(copies));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str, size: f32, page: u32, y: f32) -> Line {
        Line::new(text, size, page, page * 1000, y)
    }

    fn detector_config() -> TitleConfig {
        TitleConfig::default()
    }

    #[test]
    fn artifact_runs_collapse_but_double_letters_survive() {
        assert_eq!(collapse_letter_runs("RRRRequest", 3), "Request");
        assert_eq!(collapse_letter_runs("Apply", 3), "Apply");
        assert_eq!(collapse_letter_runs("Proposal fffor", 3), "Proposal for");
        // digits and punctuation are left alone
        assert_eq!(collapse_letter_runs("2000 ...", 3), "2000 ...");
    }

    #[test]
    fn title_lines_are_removed_from_stream() {
        let config = detector_config();
        let detection = TitleDetector::new(&config).detect(vec![
            line("RFP: Request", 24.0, 1, 50.0),
            line("for Proposal", 24.0, 1, 80.0),
            line("Summary", 16.0, 1, 120.0),
        ]);
        assert_eq!(detection.title, "RFP: Request for Proposal");
        assert_eq!(detection.title_size, Some(24));
        assert_eq!(detection.remaining.len(), 1);
        assert_eq!(detection.remaining[0].text, "Summary");
    }

    #[test]
    fn title_lines_sorted_by_page_then_top() {
        let config = detector_config();
        let detection = TitleDetector::new(&config).detect(vec![
            line("Second", 20.0, 1, 90.0),
            line("First", 20.0, 1, 10.0),
            line("Third", 20.0, 2, 0.0),
        ]);
        assert_eq!(detection.title, "First Second Third");
    }

    #[test]
    fn restated_title_line_is_skipped() {
        let config = detector_config();
        let detection = TitleDetector::new(&config).detect(vec![
            line("Annual", 24.0, 1, 40.0),
            line("Annual", 24.0, 1, 60.0),
            line("Report 2024", 24.0, 1, 80.0),
        ]);
        assert_eq!(detection.title, "Annual Report 2024");

        let verbatim = TitleConfig {
            collapse_repeated_lines: false,
            ..TitleConfig::default()
        };
        let detection = TitleDetector::new(&verbatim).detect(vec![
            line("Annual", 24.0, 1, 40.0),
            line("Annual", 24.0, 1, 60.0),
        ]);
        assert_eq!(detection.title, "Annual Annual");
    }

    #[test]
    fn empty_input_has_empty_title() {
        let config = detector_config();
        let detection = TitleDetector::new(&config).detect(Vec::new());
        assert_eq!(detection.title, "");
        assert!(detection.title_size.is_none());
        assert!(detection.remaining.is_empty());
    }
}
