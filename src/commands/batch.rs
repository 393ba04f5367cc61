use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use rayon::prelude::*;
use tracing::{info, warn};

use docoutline::backend::{PopplerBackend, StructuredSource};
use docoutline::model::{BatchDocumentEntry, BatchManifest};
use docoutline::outline::OutlineBuilder;
use docoutline::util::{
    batch_run_id, discover_pdfs, ensure_directory, now_utc_string, sha256_file, sibling_path,
    write_json_pretty,
};

use crate::cli::BatchArgs;

pub fn run(args: BatchArgs) -> Result<()> {
    let started_ts = Utc::now();
    let run_id = batch_run_id(started_ts);

    let pdf_paths = discover_pdfs(&args.input_dir)?;
    if pdf_paths.is_empty() {
        bail!("no PDFs found in {}", args.input_dir.display());
    }
    ensure_directory(&args.output_dir)?;

    info!(
        run_id = %run_id,
        input_dir = %args.input_dir.display(),
        pdf_count = pdf_paths.len(),
        jobs = args.jobs,
        "starting batch extraction"
    );

    let builder = OutlineBuilder::new(args.pipeline.outline_config())?;
    let backend = PopplerBackend::new(args.pipeline.max_pages)?;

    let process = |pdf_path: &PathBuf| {
        process_document(&builder, &backend, pdf_path, &args)
            .with_context(|| format!("failed to process {}", pdf_path.display()))
    };

    let results: Vec<Result<BatchDocumentEntry>> = if args.jobs == 1 {
        pdf_paths.iter().map(process).collect()
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(args.jobs)
            .build()
            .context("failed to build worker pool")?;
        pool.install(|| pdf_paths.par_iter().map(process).collect())
    };

    let mut documents = Vec::with_capacity(results.len());
    let mut warnings = Vec::new();
    for result in results {
        match result {
            Ok(entry) => documents.push(entry),
            Err(err) => {
                let message = format!("{err:#}");
                warn!(error = %message, "document skipped");
                warnings.push(message);
            }
        }
    }

    let manifest = BatchManifest {
        manifest_version: 1,
        run_id,
        generated_at: now_utc_string(),
        source_directory: args.input_dir.display().to_string(),
        output_directory: args.output_dir.display().to_string(),
        pdf_count: pdf_paths.len(),
        documents,
        warnings,
    };

    let manifest_path = args
        .manifest_path
        .clone()
        .unwrap_or_else(|| args.output_dir.join("batch_manifest.json"));
    write_json_pretty(&manifest_path, &manifest)?;

    info!(
        path = %manifest_path.display(),
        processed = manifest.documents.len(),
        skipped = manifest.warnings.len(),
        "batch extraction completed"
    );

    Ok(())
}

fn process_document(
    builder: &OutlineBuilder,
    backend: &PopplerBackend,
    pdf_path: &Path,
    args: &BatchArgs,
) -> Result<BatchDocumentEntry> {
    let filename = pdf_path
        .file_name()
        .and_then(|name| name.to_str())
        .map(ToOwned::to_owned)
        .with_context(|| format!("invalid UTF-8 filename: {}", pdf_path.display()))?;
    let sha256 = sha256_file(pdf_path)?;

    let structured = match &args.markdown_dir {
        Some(directory) => {
            let markdown_path = sibling_path(directory, pdf_path, "md");
            if markdown_path.is_file() {
                StructuredSource::File(markdown_path)
            } else {
                warn!(
                    path = %markdown_path.display(),
                    "markdown missing, rendering from font hierarchy"
                );
                StructuredSource::RenderFromFonts
            }
        }
        None => StructuredSource::RenderFromFonts,
    };

    let outline = builder.extract(backend, pdf_path, &structured);
    let output_path = sibling_path(&args.output_dir, pdf_path, "json");
    write_json_pretty(&output_path, &outline)?;

    Ok(BatchDocumentEntry {
        filename,
        sha256,
        output_path: output_path.display().to_string(),
        title: outline.title,
        heading_count: outline.outline.len(),
    })
}
