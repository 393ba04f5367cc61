use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use super::font_hierarchy::{FontAnalysis, analyze_fonts};
use super::fragments::{TextBlock, reconstruct_lines};
use super::glyph::{RawSpan, ingest_spans};
use super::junk::JunkFilter;
use super::markdown::{HeadingCandidate, MarkdownScanner};
use super::pages::PageIndex;
use super::{DocumentSource, OutlineConfig};
use crate::backend::{PdfBackend, StructuredSource, render_structured_text};
use crate::model::{DocumentOutline, HeadingLevel, OutlineEntry};

const TITLE_MAX_LEVEL: u8 = 2;
const FALLBACK_TITLE_MIN_WORDS: usize = 2;
const FALLBACK_TITLE_MAX_WORDS: usize = 15;
const FALLBACK_TITLE_MAX_CHARS: usize = 100;

#[derive(Debug)]
pub struct OutlineBuilder {
    config: OutlineConfig,
    filter: JunkFilter,
    scanner: MarkdownScanner,
}

impl OutlineBuilder {
    pub fn new(config: OutlineConfig) -> Result<Self> {
        Ok(Self {
            filter: JunkFilter::new()?,
            scanner: MarkdownScanner::new(config.title_line_window)?,
            config,
        })
    }

    pub fn config(&self) -> &OutlineConfig {
        &self.config
    }

    /// Loads the document and builds its outline. Load failures never
    /// propagate: they are logged and yield an empty outline.
    pub fn extract(
        &self,
        backend: &dyn PdfBackend,
        pdf_path: &Path,
        structured: &StructuredSource,
    ) -> DocumentOutline {
        match self.load_source(backend, pdf_path, structured) {
            Ok(source) => {
                let outline = self.build(&source);
                info!(
                    path = %pdf_path.display(),
                    backend = backend.name(),
                    pages = source.page_count,
                    title = %outline.title,
                    headings = outline.outline.len(),
                    "outline extracted"
                );
                outline
            }
            Err(err) => {
                warn!(
                    path = %pdf_path.display(),
                    error = %format!("{err:#}"),
                    "document unreadable, emitting empty outline"
                );
                DocumentOutline::default()
            }
        }
    }

    pub fn load_source(
        &self,
        backend: &dyn PdfBackend,
        pdf_path: &Path,
        structured: &StructuredSource,
    ) -> Result<DocumentSource> {
        let loaded = backend.load(pdf_path)?;

        let structured_text = match structured {
            StructuredSource::File(path) => fs::read_to_string(path)
                .with_context(|| format!("failed to read structured text {}", path.display()))?,
            StructuredSource::Text(text) => text.clone(),
            StructuredSource::RenderFromFonts => {
                let (blocks, analysis) = self.analyze(&loaded.spans);
                render_structured_text(&blocks, &analysis)
            }
        };

        Ok(DocumentSource {
            spans: loaded.spans,
            page_texts: loaded.page_texts,
            page_count: loaded.page_count,
            structured_text,
        })
    }

    pub fn analyze(&self, raw: &[RawSpan]) -> (Vec<TextBlock>, FontAnalysis) {
        let spans = ingest_spans(raw);
        let blocks = reconstruct_lines(&spans, &self.filter, self.config.line_eps);
        let analysis = analyze_fonts(&spans);
        (blocks, analysis)
    }

    pub fn build(&self, source: &DocumentSource) -> DocumentOutline {
        let (blocks, analysis) = self.analyze(&source.spans);
        debug!(
            body_style = ?analysis.body_style,
            mapped_styles = analysis.mapping.len(),
            blocks = blocks.len(),
            "font hierarchy analyzed"
        );

        let candidates = self.scanner.scan(&source.structured_text, &self.filter);
        if candidates.is_empty() {
            return DocumentOutline {
                title: self.fallback_title(source),
                outline: Vec::new(),
            };
        }

        let index = PageIndex::build(&source.page_texts, &source.structured_text, &self.config);
        debug!(keys = index.len(), "page index built");

        let (title_parts, headings) = self.partition(candidates);
        let title = title_parts.join(" ");
        let lowered_parts = title_parts
            .iter()
            .map(|part| part.to_lowercase())
            .collect::<Vec<String>>();

        let mut outline = Vec::<OutlineEntry>::new();
        for candidate in headings {
            let lowered = candidate.text.to_lowercase();
            if lowered_parts.iter().any(|part| lowered.contains(part.as_str())) {
                continue;
            }

            let resolution = index.resolve(&candidate.text, candidate.source_line_index);
            debug!(
                text = %candidate.text,
                line = candidate.source_line_index,
                page = resolution.page(),
                matched = resolution.as_str(),
                "heading page resolved"
            );

            outline.push(OutlineEntry {
                level: HeadingLevel::from_outline_level(candidate.level),
                text: format!("{} ", candidate.text.trim()),
                page: resolution.page(),
            });
        }

        DocumentOutline {
            title,
            outline: order_outline(dedup_outline(outline)),
        }
    }

    fn partition(&self, candidates: Vec<HeadingCandidate>) -> (Vec<String>, Vec<HeadingCandidate>) {
        let mut title_parts = Vec::new();
        let mut headings = Vec::new();

        for mut candidate in candidates {
            candidate.text = candidate.text.trim().to_string();
            if self.filter.is_junk(&candidate.text) {
                continue;
            }

            if candidate.source_line_index < self.config.title_line_window
                && candidate.level <= TITLE_MAX_LEVEL
            {
                title_parts.push(candidate.text);
            } else {
                headings.push(candidate);
            }
        }

        (title_parts, headings)
    }

    fn fallback_title(&self, source: &DocumentSource) -> String {
        let meaningful = source
            .structured_text
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<&str>>();

        if meaningful.is_empty() {
            return source
                .page_texts
                .first()
                .and_then(|page| {
                    page.split('\n')
                        .map(str::trim)
                        .find(|line| !line.is_empty())
                })
                .unwrap_or_default()
                .to_string();
        }

        meaningful
            .iter()
            .take(self.config.fallback_title_window)
            .filter_map(|line| self.scanner.bold_text(line))
            .find(|text| {
                let words = text.split_whitespace().count();
                (FALLBACK_TITLE_MIN_WORDS..=FALLBACK_TITLE_MAX_WORDS).contains(&words)
                    && text.chars().count() < FALLBACK_TITLE_MAX_CHARS
            })
            .unwrap_or_default()
            .to_string()
    }
}

pub(crate) fn dedup_outline(entries: Vec<OutlineEntry>) -> Vec<OutlineEntry> {
    let mut seen = HashSet::<(HeadingLevel, String)>::new();
    entries
        .into_iter()
        .filter(|entry| seen.insert((entry.level, entry.text.trim().to_lowercase())))
        .collect()
}

pub(crate) fn order_outline(mut entries: Vec<OutlineEntry>) -> Vec<OutlineEntry> {
    entries.sort_by_key(|entry| (entry.page, entry.level.rank()));
    entries
}
