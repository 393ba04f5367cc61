//! Collaborators that feed the outline core: a PDF backend producing glyph
//! spans and per-page text, and the structured (heading-marked) text stream.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::model::HeadingLevel;
use crate::outline::{FontAnalysis, RawSpan, TextBlock};

mod poppler;

#[cfg(test)]
mod tests;

pub use poppler::PopplerBackend;

#[derive(Debug, Clone, Default)]
pub struct LoadedPdf {
    pub spans: Vec<RawSpan>,
    pub page_texts: Vec<String>,
    pub page_count: usize,
}

pub trait PdfBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn load(&self, pdf_path: &Path) -> Result<LoadedPdf>;
}

#[derive(Debug, Clone)]
pub enum StructuredSource {
    File(PathBuf),
    Text(String),
    RenderFromFonts,
}

/// Renders reconstructed lines as markdown: mapped styles become `#`
/// headings, bold body text becomes `**bold**` lines.
pub fn render_structured_text(blocks: &[TextBlock], analysis: &FontAnalysis) -> String {
    let mut ordered = blocks.iter().collect::<Vec<&TextBlock>>();
    ordered.sort_by(|a, b| {
        a.page
            .cmp(&b.page)
            .then(a.bbox.y0.total_cmp(&b.bbox.y0))
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });

    let mut lines = Vec::<String>::new();
    let mut current_page = None;

    for block in ordered {
        if current_page.is_some_and(|page| page != block.page) {
            lines.push(String::new());
        }
        current_page = Some(block.page);

        match analysis.level_for(block.style) {
            Some(HeadingLevel::Title | HeadingLevel::H1) => {
                lines.push(format!("# {}", block.text));
                lines.push(String::new());
            }
            Some(HeadingLevel::H2) => {
                lines.push(format!("## {}", block.text));
                lines.push(String::new());
            }
            Some(HeadingLevel::H3) => {
                lines.push(format!("### {}", block.text));
                lines.push(String::new());
            }
            Some(HeadingLevel::H4) => lines.push(format!("**{}**", block.text.replace('*', ""))),
            None => lines.push(block.text.clone()),
        }
    }

    lines.join("\n")
}
