use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;

use super::junk::JunkFilter;

const MAX_MARKER_LEVEL: usize = 4;
const MAJOR_SECTION_KEYWORDS: [&str; 4] = ["introduction", "overview", "guide", "conclusion"];
const SUBSECTION_KEYWORDS: [&str; 5] = ["history", "culture", "attractions", "dining", "shopping"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingCandidate {
    pub text: String,
    pub level: u8,
    pub source_line_index: usize,
}

#[derive(Debug)]
pub struct MarkdownScanner {
    title_line_window: usize,
    bold_line: Regex,
    bold_span: Regex,
}

impl MarkdownScanner {
    pub fn new(title_line_window: usize) -> Result<Self> {
        Ok(Self {
            title_line_window,
            bold_line: Regex::new(r"^\*\*([^*]+)\*\*\s*$")
                .context("failed to compile bold line regex")?,
            bold_span: Regex::new(r"\*\*([^*]+)\*\*")
                .context("failed to compile bold span regex")?,
        })
    }

    pub fn scan(&self, stream: &str, filter: &JunkFilter) -> Vec<HeadingCandidate> {
        let mut candidates = Vec::new();

        for (index, raw_line) in stream.split('\n').enumerate() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            let candidate = if line.starts_with('#') {
                self.marker_heading(line, index, filter)
            } else {
                self.bold_heading(line, index, filter)
            };

            if let Some(candidate) = candidate {
                candidates.push(candidate);
            }
        }

        candidates
    }

    pub fn bold_text<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.bold_span
            .captures(line)
            .and_then(|captures| captures.get(1))
            .map(|value| value.as_str().trim())
    }

    fn marker_heading(
        &self,
        line: &str,
        index: usize,
        filter: &JunkFilter,
    ) -> Option<HeadingCandidate> {
        let remainder = line.trim_start_matches('#');
        let marker_count = line.len() - remainder.len();

        let unbolded = self.bold_span.replace_all(remainder.trim(), "$1");
        let text = unbolded.split_whitespace().collect::<Vec<&str>>().join(" ");
        if text.is_empty() || filter.is_junk(&text) {
            return None;
        }

        Some(HeadingCandidate {
            text,
            level: marker_count.min(MAX_MARKER_LEVEL) as u8,
            source_line_index: index,
        })
    }

    fn bold_heading(
        &self,
        line: &str,
        index: usize,
        filter: &JunkFilter,
    ) -> Option<HeadingCandidate> {
        let captures = self.bold_line.captures(line)?;
        let text = captures.get(1)?.as_str().trim();
        if text.chars().count() <= 2 || filter.is_junk(text) {
            return None;
        }

        Some(HeadingCandidate {
            text: text.to_string(),
            level: bold_heading_level(text, index, self.title_line_window),
            source_line_index: index,
        })
    }
}

fn bold_heading_level(text: &str, index: usize, title_line_window: usize) -> u8 {
    let lowered = text.to_lowercase();

    let major = MAJOR_SECTION_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword));
    let subsection = SUBSECTION_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword));

    if index < title_line_window || major {
        1
    } else if subsection || text.split_whitespace().count() <= 3 {
        2
    } else {
        3
    }
}
