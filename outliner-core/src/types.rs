use serde::{Deserialize, Serialize};
use std::fmt;

/// Round a font size to its visual size class.
///
/// Ties go to the even neighbour, so 10.5 and 11.5 land in 10 and 12.
/// Every size comparison in the pipeline goes through this function.
pub fn round_font_size(size: f32) -> i32 {
    size.round_ties_even() as i32
}

// ===== LINE MODEL =====

/// One visually contiguous text line in canonical reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Trimmed, non-empty text with spans joined by single spaces
    pub text: String,
    /// Mean font size of the constituent spans (0.0 when the line had none)
    pub font_size: f32,
    /// Page number (1-indexed)
    pub page: u32,
    /// Cross-page unique block identity: page_index * 1000 + block_index
    pub block: u32,
    /// Top edge of the owning block, secondary sort key only
    pub y: f32,
}

impl Line {
    pub fn new(text: impl Into<String>, font_size: f32, page: u32, block: u32, y: f32) -> Self {
        Self {
            text: text.into(),
            font_size,
            page,
            block,
            y,
        }
    }

    pub fn rounded_size(&self) -> i32 {
        round_font_size(self.font_size)
    }

    /// Fold `self` in front of `next`, producing a fresh line.
    ///
    /// The result keeps `next`'s position and takes the larger font size.
    pub fn fold_into(&self, next: &Line) -> Line {
        Line {
            text: format!("{} {}", self.text.trim_end(), next.text),
            font_size: self.font_size.max(next.font_size),
            page: next.page,
            block: next.block,
            y: next.y,
        }
    }
}

// ===== OUTLINE MODEL =====

/// Ordinal heading level, H1 being the largest retained font size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
    H5,
}

impl HeadingLevel {
    pub const ALL: [HeadingLevel; 5] = [
        HeadingLevel::H1,
        HeadingLevel::H2,
        HeadingLevel::H3,
        HeadingLevel::H4,
        HeadingLevel::H5,
    ];

    /// Level for a zero-based rank (0 → H1). Ranks past H5 yield `None`.
    pub fn from_rank(rank: usize) -> Option<Self> {
        Self::ALL.get(rank).copied()
    }

    /// 1-based depth of this level
    pub fn depth(&self) -> u32 {
        *self as u32 + 1
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}", self.depth())
    }
}

/// One accepted heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub level: HeadingLevel,
    pub text: String,
    pub page: u32,
}

impl OutlineEntry {
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }

    pub fn starts_lowercase(&self) -> bool {
        self.text.chars().next().is_some_and(char::is_lowercase)
    }
}

/// Final per-document result handed to the output shell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentOutline {
    pub title: String,
    pub outline: Vec<OutlineEntry>,
}

impl DocumentOutline {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            outline: Vec::new(),
        }
    }

    pub fn to_json_pretty(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_to_json(&self, path: &std::path::Path) -> anyhow::Result<()> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}
