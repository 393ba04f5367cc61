use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use docoutline::outline::{DEFAULT_LINE_EPS, DEFAULT_LINES_PER_PAGE, OutlineConfig};

#[derive(Parser, Debug)]
#[command(
    name = "docoutline",
    version,
    about = "Hybrid PDF title and heading outline extraction"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Extract(ExtractArgs),
    Batch(BatchArgs),
    Styles(StylesArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PipelineArgs {
    #[arg(long, default_value_t = DEFAULT_LINE_EPS)]
    pub line_eps: f64,

    #[arg(long, default_value_t = DEFAULT_LINES_PER_PAGE)]
    pub lines_per_page: usize,

    #[arg(long)]
    pub max_pages: Option<usize>,
}

impl PipelineArgs {
    pub fn outline_config(&self) -> OutlineConfig {
        OutlineConfig {
            line_eps: self.line_eps,
            lines_per_page: self.lines_per_page,
            ..OutlineConfig::default()
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    pub pdf_path: PathBuf,

    /// Heading-marked text for the PDF; rendered from font sizes when absent.
    #[arg(long)]
    pub markdown: Option<PathBuf>,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    #[arg(long, default_value = "input")]
    pub input_dir: PathBuf,

    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Directory holding `<stem>.md` files to use as heading-marked text.
    #[arg(long)]
    pub markdown_dir: Option<PathBuf>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    /// Worker threads; 0 uses one per core.
    #[arg(long, default_value_t = 1)]
    pub jobs: usize,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

#[derive(Args, Debug, Clone)]
pub struct StylesArgs {
    pub pdf_path: PathBuf,

    #[arg(long, default_value_t = false)]
    pub with_lines: bool,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}
