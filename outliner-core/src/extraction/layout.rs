// Page layout as delivered by the text-extraction collaborator.
//
// Shape follows the common "page dict" dump: pages hold blocks, blocks hold
// lines, lines hold spans. Image blocks carry no lines and are tolerated.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanLayout {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub size: f32,
}

impl SpanLayout {
    pub fn new(text: impl Into<String>, size: f32) -> Self {
        Self {
            text: text.into(),
            size,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineLayout {
    #[serde(default)]
    pub spans: Vec<SpanLayout>,
}

impl LineLayout {
    pub fn new(spans: Vec<SpanLayout>) -> Self {
        Self { spans }
    }

    /// A line made of a single span
    pub fn single(text: impl Into<String>, size: f32) -> Self {
        Self::new(vec![SpanLayout::new(text, size)])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockLayout {
    /// [x0, y0, x1, y1]; missing boxes read as all zeros
    #[serde(default)]
    pub bbox: [f32; 4],
    #[serde(default)]
    pub lines: Vec<LineLayout>,
}

impl BlockLayout {
    pub fn new(top: f32, lines: Vec<LineLayout>) -> Self {
        Self {
            bbox: [0.0, top, 0.0, top],
            lines,
        }
    }

    /// Top edge of the block
    pub fn top(&self) -> f32 {
        self.bbox[1]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    #[serde(default)]
    pub blocks: Vec<BlockLayout>,
}

impl PageLayout {
    pub fn new(blocks: Vec<BlockLayout>) -> Self {
        Self { blocks }
    }
}

/// Accepted top-level shapes of a layout dump
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LayoutDocument {
    Bare(Vec<PageLayout>),
    Wrapped { pages: Vec<PageLayout> },
}

impl LayoutDocument {
    pub fn into_pages(self) -> Vec<PageLayout> {
        match self {
            LayoutDocument::Bare(pages) => pages,
            LayoutDocument::Wrapped { pages } => pages,
        }
    }
}
