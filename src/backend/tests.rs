use std::path::Path;

use anyhow::bail;

use super::poppler::{PdfXmlParser, split_pages};
use super::*;
use crate::model::DocumentOutline;
use crate::outline::{OutlineBuilder, OutlineConfig};

const SAMPLE_XML: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE pdf2xml SYSTEM "pdf2xml.dtd">
<pdf2xml producer="poppler" version="23.02.0">
<page number="1" position="absolute" top="0" left="0" height="842" width="595">
	<fontspec id="0" size="24" family="Helvetica-Bold" color="#000000"/>
	<fontspec id="1" size="10" family="Times" color="#000000"/>
<text top="60" left="72" width="220" height="28" font="0">Annual Report</text>
<text top="120" left="72" width="300" height="12" font="1">Profits &amp; losses were &lt;modest&gt;</text>
<text top="140" left="72" width="120" height="12" font="1"><b>Key Findings</b></text>
</page>
<page number="2" position="absolute" top="0" left="0" height="842" width="595">
<text top="80" left="72" width="90" height="12" font="1">caf&#233; notes</text>
</page>
</pdf2xml>
"##;

struct StaticBackend {
    loaded: Option<LoadedPdf>,
}

impl PdfBackend for StaticBackend {
    fn name(&self) -> &'static str {
        "static"
    }

    fn load(&self, pdf_path: &Path) -> anyhow::Result<LoadedPdf> {
        match &self.loaded {
            Some(loaded) => Ok(loaded.clone()),
            None => bail!("cannot open {}", pdf_path.display()),
        }
    }
}

#[test]
fn pdftohtml_xml_yields_positioned_styled_spans() {
    let parser = PdfXmlParser::new().expect("xml regexes compile");
    let (spans, page_count) = parser.parse(SAMPLE_XML);

    assert_eq!(page_count, 2);
    assert_eq!(spans.len(), 4);

    assert_eq!(spans[0].text, "Annual Report");
    assert_eq!(spans[0].page, 0);
    assert_eq!(spans[0].font_size, 24.0);
    assert!(spans[0].bold);
    assert_eq!(spans[0].bbox.x0, 72.0);
    assert_eq!(spans[0].bbox.y0, 60.0);
    assert_eq!(spans[0].bbox.x1, 292.0);
    assert_eq!(spans[0].bbox.y1, 88.0);

    assert_eq!(spans[1].text, "Profits & losses were <modest>");
    assert!(!spans[1].bold);

    assert_eq!(spans[2].text, "Key Findings");
    assert!(spans[2].bold);

    assert_eq!(spans[3].text, "café notes");
    assert_eq!(spans[3].page, 1);
    assert_eq!(spans[3].font_size, 10.0);
}

#[test]
fn pdftotext_output_splits_on_form_feed() {
    let pages = split_pages("First page\n\u{000C}Second\u{0000} page\n\u{000C}\n\u{000C}");
    assert_eq!(pages, vec!["First page\n".to_string(), "Second page\n".to_string()]);
}

#[test]
fn rendered_markdown_marks_headings_by_font_level() {
    let parser = PdfXmlParser::new().expect("xml regexes compile");
    let (mut spans, _) = parser.parse(SAMPLE_XML);
    spans.push(RawSpan {
        text: "plain body text that dominates the page ".repeat(10),
        page: 1,
        bbox: crate::outline::BoundingBox::new(72.0, 200.0, 500.0, 212.0),
        font_size: 10.0,
        bold: false,
    });

    let builder = OutlineBuilder::new(OutlineConfig::default()).expect("builder compiles");
    let (blocks, analysis) = builder.analyze(&spans);
    let rendered = render_structured_text(&blocks, &analysis);
    let lines = rendered.lines().collect::<Vec<&str>>();

    assert_eq!(lines[0], "# Annual Report");
    assert_eq!(lines[1], "");
    assert!(lines.contains(&"**Key Findings**"));
    assert!(lines.contains(&"Profits & losses were <modest>"));
    let notes_index = lines
        .iter()
        .position(|line| *line == "café notes")
        .expect("page two line rendered");
    assert_eq!(lines[notes_index - 1], "");
}

#[test]
fn extract_renders_structure_and_resolves_pages() {
    let parser = PdfXmlParser::new().expect("xml regexes compile");
    let (spans, page_count) = parser.parse(SAMPLE_XML);
    let backend = StaticBackend {
        loaded: Some(LoadedPdf {
            spans,
            page_texts: vec![
                "Annual Report\nProfits & losses were <modest>\nKey Findings".to_string(),
                "café notes".to_string(),
            ],
            page_count,
        }),
    };
    let builder = OutlineBuilder::new(OutlineConfig::default()).expect("builder compiles");

    let outline = builder.extract(
        &backend,
        Path::new("report.pdf"),
        &StructuredSource::Text("\n\n\n\n\n\n# Key Findings\n".to_string()),
    );
    assert_eq!(outline.title, "");
    assert_eq!(outline.outline.len(), 1);
    assert_eq!(outline.outline[0].text, "Key Findings ");
    assert_eq!(outline.outline[0].page, 0);
}

#[test]
fn unreadable_document_yields_empty_outline() {
    let backend = StaticBackend { loaded: None };
    let builder = OutlineBuilder::new(OutlineConfig::default()).expect("builder compiles");

    let outline = builder.extract(
        &backend,
        Path::new("missing.pdf"),
        &StructuredSource::RenderFromFonts,
    );
    assert_eq!(outline, DocumentOutline::default());
}

#[test]
fn missing_markdown_file_is_treated_as_unreadable() {
    let backend = StaticBackend {
        loaded: Some(LoadedPdf::default()),
    };
    let builder = OutlineBuilder::new(OutlineConfig::default()).expect("builder compiles");

    let outline = builder.extract(
        &backend,
        Path::new("doc.pdf"),
        &StructuredSource::File("/nonexistent/docoutline/doc.md".into()),
    );
    assert_eq!(outline, DocumentOutline::default());
}
