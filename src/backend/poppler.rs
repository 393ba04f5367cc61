use std::collections::HashMap;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use regex::Regex;
use tracing::debug;

use super::{LoadedPdf, PdfBackend};
use crate::outline::{BoundingBox, RawSpan};

#[derive(Debug)]
pub struct PopplerBackend {
    max_pages: Option<usize>,
    parser: PdfXmlParser,
}

impl PopplerBackend {
    pub fn new(max_pages: Option<usize>) -> Result<Self> {
        Ok(Self {
            max_pages,
            parser: PdfXmlParser::new()?,
        })
    }
}

impl PdfBackend for PopplerBackend {
    fn name(&self) -> &'static str {
        "poppler"
    }

    fn load(&self, pdf_path: &Path) -> Result<LoadedPdf> {
        let xml = run_pdftohtml_xml(pdf_path, self.max_pages)?;
        let (spans, page_count) = self.parser.parse(&xml);
        let page_texts = extract_pages_with_pdftotext(pdf_path, self.max_pages)?;

        debug!(
            path = %pdf_path.display(),
            spans = spans.len(),
            pages = page_count,
            text_pages = page_texts.len(),
            "poppler extraction complete"
        );

        Ok(LoadedPdf {
            spans,
            page_count: page_count.max(page_texts.len()),
            page_texts,
        })
    }
}

#[derive(Debug)]
pub(crate) struct PdfXmlParser {
    page: Regex,
    fontspec: Regex,
    text: Regex,
    attribute: Regex,
    tag: Regex,
    numeric_entity: Regex,
}

#[derive(Debug, Clone)]
struct FontSpec {
    size: f64,
    bold: bool,
}

impl PdfXmlParser {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            page: Regex::new(r#"(?s)<page\s+([^>]*)>(.*?)</page>"#)
                .context("failed to compile page element regex")?,
            fontspec: Regex::new(r#"<fontspec\s+([^>]*?)/?>"#)
                .context("failed to compile fontspec regex")?,
            text: Regex::new(r#"(?s)<text\s+([^>]*)>(.*?)</text>"#)
                .context("failed to compile text element regex")?,
            attribute: Regex::new(r#"([A-Za-z_]+)="([^"]*)""#)
                .context("failed to compile attribute regex")?,
            tag: Regex::new(r"<[^>]+>").context("failed to compile inline tag regex")?,
            numeric_entity: Regex::new(r"&#(\d+);")
                .context("failed to compile numeric entity regex")?,
        })
    }

    /// Font specs are document-global in pdftohtml output, so they are
    /// collected before any text is read.
    pub(crate) fn parse(&self, xml: &str) -> (Vec<RawSpan>, usize) {
        let mut fonts = HashMap::<String, FontSpec>::new();
        for captures in self.fontspec.captures_iter(xml) {
            let attributes = self.attributes(captures.get(1).map(|m| m.as_str()).unwrap_or(""));
            let Some(id) = attributes.get("id") else {
                continue;
            };
            let size = attributes
                .get("size")
                .and_then(|value| value.parse::<f64>().ok())
                .unwrap_or(0.0);
            let bold = attributes
                .get("family")
                .map(|family| family.to_ascii_lowercase().contains("bold"))
                .unwrap_or(false);
            fonts.insert(id.clone(), FontSpec { size, bold });
        }

        let mut spans = Vec::new();
        let mut page_count = 0usize;

        for page_captures in self.page.captures_iter(xml) {
            let page_attributes =
                self.attributes(page_captures.get(1).map(|m| m.as_str()).unwrap_or(""));
            let page_number = page_attributes
                .get("number")
                .and_then(|value| value.parse::<usize>().ok())
                .unwrap_or(page_count + 1);
            let page = page_number.saturating_sub(1);
            page_count = page_count.max(page + 1);

            let body = page_captures.get(2).map(|m| m.as_str()).unwrap_or("");
            for text_captures in self.text.captures_iter(body) {
                let attributes =
                    self.attributes(text_captures.get(1).map(|m| m.as_str()).unwrap_or(""));
                let inner = text_captures.get(2).map(|m| m.as_str()).unwrap_or("");

                let number = |name: &str| {
                    attributes
                        .get(name)
                        .and_then(|value| value.parse::<f64>().ok())
                        .unwrap_or(0.0)
                };
                let top = number("top");
                let left = number("left");
                let width = number("width");
                let height = number("height");

                let font = attributes
                    .get("font")
                    .and_then(|id| fonts.get(id))
                    .cloned()
                    .unwrap_or(FontSpec {
                        size: height,
                        bold: false,
                    });

                spans.push(RawSpan {
                    text: self.decode_text(inner),
                    page,
                    bbox: BoundingBox::new(left, top, left + width, top + height),
                    font_size: font.size,
                    bold: font.bold || inner.contains("<b>"),
                });
            }
        }

        (spans, page_count)
    }

    fn attributes(&self, raw: &str) -> HashMap<String, String> {
        self.attribute
            .captures_iter(raw)
            .filter_map(|captures| {
                let name = captures.get(1)?.as_str().to_string();
                let value = captures.get(2)?.as_str().to_string();
                Some((name, value))
            })
            .collect()
    }

    fn decode_text(&self, inner: &str) -> String {
        let stripped = self.tag.replace_all(inner, "");
        let numeric = self.numeric_entity.replace_all(&stripped, |captures: &regex::Captures| {
            captures
                .get(1)
                .and_then(|value| value.as_str().parse::<u32>().ok())
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_default()
        });

        numeric
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&apos;", "'")
            .replace("&amp;", "&")
            .replace('\u{00a0}', " ")
    }
}

fn run_pdftohtml_xml(pdf_path: &Path, max_pages: Option<usize>) -> Result<String> {
    let mut command = Command::new("pdftohtml");
    command
        .arg("-xml")
        .arg("-i")
        .arg("-q")
        .arg("-zoom")
        .arg("1")
        .arg("-f")
        .arg("1");
    if let Some(max_pages) = max_pages {
        command.arg("-l").arg(max_pages.to_string());
    }
    command.arg(pdf_path).arg("-stdout");

    let output = command
        .output()
        .with_context(|| format!("failed to execute pdftohtml for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftohtml returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn extract_pages_with_pdftotext(
    pdf_path: &Path,
    max_pages: Option<usize>,
) -> Result<Vec<String>> {
    let mut command = Command::new("pdftotext");
    command.arg("-enc").arg("UTF-8").arg("-f").arg("1");
    if let Some(max_pages) = max_pages {
        command.arg("-l").arg(max_pages.to_string());
    }
    command.arg(pdf_path).arg("-");

    let output = command
        .output()
        .with_context(|| format!("failed to execute pdftotext for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftotext returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    Ok(split_pages(&String::from_utf8_lossy(&output.stdout)))
}

pub(crate) fn split_pages(raw: &str) -> Vec<String> {
    let mut pages: Vec<String> = raw
        .split('\u{000C}')
        .map(|chunk| chunk.replace('\u{0000}', ""))
        .collect();

    while let Some(last_page) = pages.last() {
        if last_page.trim().is_empty() {
            pages.pop();
            continue;
        }
        break;
    }

    pages
}
