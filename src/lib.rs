//! Hybrid PDF outline extraction.
//!
//! Reconstructs a document title and an H1-H4 heading outline from two
//! imperfect sources: the positioned glyph stream of a PDF and a
//! heading-marked (markdown-like) rendering of the same document.
//!
//! ```no_run
//! use std::path::Path;
//!
//! use docoutline::backend::{PopplerBackend, StructuredSource};
//! use docoutline::outline::{OutlineBuilder, OutlineConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let builder = OutlineBuilder::new(OutlineConfig::default())?;
//!     let backend = PopplerBackend::new(None)?;
//!     let outline = builder.extract(
//!         &backend,
//!         Path::new("report.pdf"),
//!         &StructuredSource::RenderFromFonts,
//!     );
//!     println!("{}", serde_json::to_string_pretty(&outline)?);
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod model;
pub mod outline;
pub mod util;

pub use model::{DocumentOutline, HeadingLevel, OutlineEntry};
