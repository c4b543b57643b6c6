use crate::extraction::{LineLayout, PageLayout};
use crate::types::Line;

/// Block identities are unique across the document: page_index * BLOCK_ID_BASE + block_index
pub const BLOCK_ID_BASE: u32 = 1000;

/// Flatten extractor pages into lines in reading order.
///
/// Lines whose spans hold only whitespace are dropped. The result is
/// stable-sorted by (page, block, y), so lines of one block keep their
/// extractor order.
pub fn assemble_lines(pages: &[PageLayout]) -> Vec<Line> {
    let mut lines = Vec::new();

    for (page_index, page) in pages.iter().enumerate() {
        for (block_index, block) in page.blocks.iter().enumerate() {
            // Image blocks still consume a block index
            let block_id = page_index as u32 * BLOCK_ID_BASE + block_index as u32;
            for raw in &block.lines {
                if let Some(line) = assemble_line(raw, page_index as u32 + 1, block_id, block.top())
                {
                    lines.push(line);
                }
            }
        }
    }

    lines.sort_by(|a, b| {
        (a.page, a.block)
            .cmp(&(b.page, b.block))
            .then(a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
    });
    lines
}

fn assemble_line(raw: &LineLayout, page: u32, block: u32, y: f32) -> Option<Line> {
    let text = raw
        .spans
        .iter()
        .map(|span| span.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if text.is_empty() {
        return None;
    }

    // Whitespace-only spans still count towards the size average
    let font_size = if raw.spans.is_empty() {
        0.0
    } else {
        raw.spans.iter().map(|span| span.size).sum::<f32>() / raw.spans.len() as f32
    };

    Some(Line::new(text, font_size, page, block, y))
}
