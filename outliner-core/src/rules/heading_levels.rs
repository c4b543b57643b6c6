use crate::config::LevelConfig;
use crate::types::HeadingLevel;
use serde::Serialize;

use super::engine::FontHistogram;

/// Rounded font size → heading level, H1 for the largest retained size
#[derive(Debug, Clone, Default, Serialize)]
pub struct HeadingLevels {
    levels: Vec<(i32, HeadingLevel)>,
    excluded_body_size: Option<i32>,
}

impl HeadingLevels {
    pub fn level_for(&self, size: i32) -> Option<HeadingLevel> {
        self.levels
            .iter()
            .find(|(s, _)| *s == size)
            .map(|(_, level)| *level)
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Promoted sizes, largest first
    pub fn sizes(&self) -> Vec<i32> {
        self.levels.iter().map(|(size, _)| *size).collect()
    }

    /// Size treated as body text, if any
    pub fn excluded_body_size(&self) -> Option<i32> {
        self.excluded_body_size
    }
}

pub struct HeadingLevelClassifier<'a> {
    config: &'a LevelConfig,
}

impl<'a> HeadingLevelClassifier<'a> {
    pub fn new(config: &'a LevelConfig) -> Self {
        Self { config }
    }

    /// Pick the body size to suppress, then promote the remaining sizes to levels.
    pub fn classify(&self, histogram: &FontHistogram) -> HeadingLevels {
        let (Some(largest), Some(most_frequent)) =
            (histogram.largest(), histogram.most_frequent())
        else {
            return HeadingLevels::default();
        };

        let total = histogram.total() as f32;
        let count_of = |size: i32| histogram.count(size) as f32;

        let excluded_body_size = if count_of(most_frequent) > self.config.dominant_ratio * total {
            Some(most_frequent)
        } else if most_frequent != largest
            && count_of(most_frequent) > self.config.frequent_ratio * total
        {
            Some(most_frequent)
        } else {
            None
        };

        let max_levels = self.config.max_levels.min(HeadingLevel::ALL.len());
        let mut levels = Vec::new();

        for size in histogram.sizes_descending() {
            if Some(size) == excluded_body_size {
                continue;
            }
            if levels.len() >= max_levels {
                break;
            }
            // The largest surviving size is always a level
            if !levels.is_empty() && histogram.count(size) < self.config.min_level_occurrences {
                continue;
            }
            if let Some(level) = HeadingLevel::from_rank(levels.len()) {
                levels.push((size, level));
            }
        }

        HeadingLevels {
            levels,
            excluded_body_size,
        }
    }
}
