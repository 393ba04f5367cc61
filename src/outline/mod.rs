//! Hybrid outline extraction core.
//!
//! Everything under this module is pure: it reads one [`DocumentSource`]
//! and produces one [`DocumentOutline`](crate::model::DocumentOutline).

mod builder;
pub mod font_hierarchy;
pub mod fragments;
pub mod glyph;
pub mod junk;
pub mod markdown;
pub mod pages;


pub use builder::OutlineBuilder;
pub use font_hierarchy::{FontAnalysis, FontMapping, analyze_fonts};
pub use fragments::{TextBlock, reconstruct_lines};
pub use glyph::{BoundingBox, GlyphSpan, RawSpan, StyleKey, ingest_spans};
pub use junk::{JunkFilter, JunkReason};
pub use markdown::{HeadingCandidate, MarkdownScanner};
pub use pages::{PageIndex, PageResolution};

pub const DEFAULT_LINE_EPS: f64 = 3.0;
pub const DEFAULT_INDEX_SIMILARITY: f64 = 0.3;
pub const DEFAULT_RESOLVE_SIMILARITY: f64 = 0.4;
pub const DEFAULT_LINES_PER_PAGE: usize = 35;
pub const DEFAULT_TITLE_LINE_WINDOW: usize = 5;
pub const DEFAULT_FALLBACK_TITLE_WINDOW: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct OutlineConfig {
    pub line_eps: f64,
    pub index_similarity: f64,
    pub resolve_similarity: f64,
    pub lines_per_page: usize,
    pub title_line_window: usize,
    pub fallback_title_window: usize,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            line_eps: DEFAULT_LINE_EPS,
            index_similarity: DEFAULT_INDEX_SIMILARITY,
            resolve_similarity: DEFAULT_RESOLVE_SIMILARITY,
            lines_per_page: DEFAULT_LINES_PER_PAGE,
            title_line_window: DEFAULT_TITLE_LINE_WINDOW,
            fallback_title_window: DEFAULT_FALLBACK_TITLE_WINDOW,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocumentSource {
    pub spans: Vec<RawSpan>,
    pub page_texts: Vec<String>,
    pub page_count: usize,
    pub structured_text: String,
}
