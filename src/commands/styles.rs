use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use docoutline::backend::{PdfBackend, PopplerBackend};
use docoutline::outline::{FontAnalysis, OutlineBuilder, TextBlock};

use crate::cli::StylesArgs;

#[derive(Debug, Serialize)]
struct StylesReport<'a> {
    path: String,
    page_count: usize,
    analysis: &'a FontAnalysis,
    likely_title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lines: Option<&'a [TextBlock]>,
}

pub fn run(args: StylesArgs) -> Result<()> {
    let builder = OutlineBuilder::new(args.pipeline.outline_config())?;
    let backend = PopplerBackend::new(args.pipeline.max_pages)?;

    let loaded = backend
        .load(&args.pdf_path)
        .with_context(|| format!("failed to load {}", args.pdf_path.display()))?;
    let (blocks, analysis) = builder.analyze(&loaded.spans);

    info!(
        path = %args.pdf_path.display(),
        body_style = ?analysis.body_style,
        mapped_styles = analysis.mapping.len(),
        lines = blocks.len(),
        "font hierarchy analyzed"
    );

    let report = StylesReport {
        path: args.pdf_path.display().to_string(),
        page_count: loaded.page_count,
        analysis: &analysis,
        likely_title: analysis.likely_title(&blocks).map(|block| block.text.as_str()),
        lines: args.with_lines.then_some(blocks.as_slice()),
    };

    let rendered = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}").context("failed to write report to stdout")?;

    Ok(())
}
