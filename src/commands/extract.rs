use std::io::Write;

use anyhow::{Context, Result};
use tracing::info;

use docoutline::backend::{PopplerBackend, StructuredSource};
use docoutline::outline::OutlineBuilder;
use docoutline::util::write_json_pretty;

use crate::cli::ExtractArgs;

pub fn run(args: ExtractArgs) -> Result<()> {
    let builder = OutlineBuilder::new(args.pipeline.outline_config())?;
    let backend = PopplerBackend::new(args.pipeline.max_pages)?;
    let structured = match &args.markdown {
        Some(path) => StructuredSource::File(path.clone()),
        None => StructuredSource::RenderFromFonts,
    };

    let outline = builder.extract(&backend, &args.pdf_path, &structured);

    match &args.output {
        Some(path) => {
            write_json_pretty(path, &outline)?;
            info!(path = %path.display(), "wrote outline");
        }
        None => {
            let rendered =
                serde_json::to_string_pretty(&outline).context("failed to serialize outline")?;
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{rendered}").context("failed to write outline to stdout")?;
        }
    }

    Ok(())
}
