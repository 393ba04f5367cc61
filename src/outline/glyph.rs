use serde::Serialize;

/// Axis-aligned box in page layout units, `y` growing downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BoundingBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BoundingBox {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawSpan {
    pub text: String,
    pub page: usize,
    pub bbox: BoundingBox,
    pub font_size: f64,
    pub bold: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StyleKey {
    pub size: i32,
    pub bold: bool,
}

impl StyleKey {
    pub fn new(size: i32, bold: bool) -> Self {
        Self { size, bold }
    }

    pub fn from_font(font_size: f64, bold: bool) -> Self {
        Self {
            size: font_size.round_ties_even() as i32,
            bold,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlyphSpan {
    pub text: String,
    pub page: usize,
    pub bbox: BoundingBox,
    pub font_size: f64,
    pub bold: bool,
    pub style: StyleKey,
}

pub fn ingest_spans(raw: &[RawSpan]) -> Vec<GlyphSpan> {
    raw.iter()
        .filter_map(|span| {
            let text = span.text.trim();
            if text.is_empty() {
                return None;
            }

            Some(GlyphSpan {
                text: text.to_string(),
                page: span.page,
                bbox: span.bbox,
                font_size: span.font_size,
                bold: span.bold,
                style: StyleKey::from_font(span.font_size, span.bold),
            })
        })
        .collect()
}
