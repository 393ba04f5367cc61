//! Typographic hierarchy inferred from a character-weighted style histogram.
//!
//! The style carrying the most characters is taken as body text. Every other
//! style is ranked by its size relative to the body size, which keeps the
//! thresholds meaningful across documents set at very different point sizes.

use std::collections::HashMap;

use serde::Serialize;

use super::fragments::TextBlock;
use super::glyph::{GlyphSpan, StyleKey};
use crate::model::HeadingLevel;

const TITLE_RATIO: f64 = 2.0;
const H1_RATIO: f64 = 1.7;
const H2_RATIO: f64 = 1.5;
const H3_RATIO: f64 = 1.2;

const TITLE_MAX_PAGE: usize = 2;
const TITLE_MAX_POSITION: f64 = 300.0;
const TITLE_HIGH_POSITION: f64 = 200.0;
const TITLE_KEYWORDS: [&str; 16] = [
    "rfp",
    "request for proposal",
    "proposal",
    "report",
    "study",
    "analysis",
    "guide",
    "manual",
    "handbook",
    "overview",
    "introduction",
    "summary",
    "business plan",
    "strategic plan",
    "white paper",
    "research",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StyleWeight {
    pub style: StyleKey,
    pub chars: usize,
}

/// Ordered `StyleKey -> HeadingLevel` mapping, largest size first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FontMapping {
    entries: Vec<(StyleKey, HeadingLevel)>,
}

impl FontMapping {
    pub fn level_for(&self, style: StyleKey) -> Option<HeadingLevel> {
        self.entries
            .iter()
            .find(|(key, _)| *key == style)
            .map(|(_, level)| *level)
    }

    pub fn entries(&self) -> &[(StyleKey, HeadingLevel)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FontAnalysis {
    pub histogram: Vec<StyleWeight>,
    pub body_style: Option<StyleKey>,
    pub mapping: FontMapping,
}

impl FontAnalysis {
    pub fn level_for(&self, style: StyleKey) -> Option<HeadingLevel> {
        self.mapping.level_for(style)
    }

    pub fn likely_title<'a>(&self, blocks: &'a [TextBlock]) -> Option<&'a TextBlock> {
        blocks
            .iter()
            .find(|block| is_likely_title(block, self.level_for(block.style)))
    }
}

pub fn analyze_fonts(spans: &[GlyphSpan]) -> FontAnalysis {
    let histogram = build_histogram(spans);

    // First style encountered wins ties.
    let mut body: Option<StyleWeight> = None;
    for weight in &histogram {
        if body.map(|best| weight.chars > best.chars).unwrap_or(true) {
            body = Some(*weight);
        }
    }

    let Some(body) = body else {
        return FontAnalysis::default();
    };

    let mapping = derive_mapping(&histogram, body.style.size);
    FontAnalysis {
        histogram,
        body_style: Some(body.style),
        mapping,
    }
}

fn build_histogram(spans: &[GlyphSpan]) -> Vec<StyleWeight> {
    let mut positions = HashMap::<StyleKey, usize>::new();
    let mut histogram = Vec::<StyleWeight>::new();

    for span in spans {
        let chars = span.text.trim().chars().count();
        if chars == 0 {
            continue;
        }

        match positions.get(&span.style) {
            Some(&index) => histogram[index].chars += chars,
            None => {
                positions.insert(span.style, histogram.len());
                histogram.push(StyleWeight {
                    style: span.style,
                    chars,
                });
            }
        }
    }

    histogram
}

fn derive_mapping(histogram: &[StyleWeight], body_size: i32) -> FontMapping {
    let mut styles = histogram
        .iter()
        .map(|weight| weight.style)
        .collect::<Vec<StyleKey>>();
    styles.sort_by(|a, b| b.size.cmp(&a.size));

    let body = f64::from(body_size);
    let entries = styles
        .into_iter()
        .filter_map(|style| {
            let size = f64::from(style.size);
            let level = if size >= body * TITLE_RATIO {
                HeadingLevel::Title
            } else if size >= body * H1_RATIO {
                HeadingLevel::H1
            } else if size >= body * H2_RATIO {
                HeadingLevel::H2
            } else if size >= body * H3_RATIO {
                HeadingLevel::H3
            } else if style.size == body_size && style.bold {
                HeadingLevel::H4
            } else {
                return None;
            };
            Some((style, level))
        })
        .collect();

    FontMapping { entries }
}

pub fn is_likely_title(block: &TextBlock, level: Option<HeadingLevel>) -> bool {
    if block.page > TITLE_MAX_PAGE || level != Some(HeadingLevel::Title) {
        return false;
    }
    if block.position_score > TITLE_MAX_POSITION {
        return false;
    }

    let word_count = block.text.split_whitespace().count();
    if !(2..=15).contains(&word_count) {
        return false;
    }

    let lowered = block.text.to_lowercase();
    let keyword_hits = TITLE_KEYWORDS
        .iter()
        .filter(|keyword| lowered.contains(*keyword))
        .count();

    keyword_hits > 0 || block.position_score < TITLE_HIGH_POSITION
}
