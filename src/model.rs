use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    #[serde(rename = "TITLE")]
    Title,
    H1,
    H2,
    H3,
    H4,
}

impl HeadingLevel {
    pub fn rank(self) -> u8 {
        match self {
            HeadingLevel::Title => 0,
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
            HeadingLevel::H4 => 4,
        }
    }

    pub fn from_outline_level(level: u8) -> Self {
        match level {
            0 | 1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            3 => HeadingLevel::H3,
            _ => HeadingLevel::H4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HeadingLevel::Title => "TITLE",
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
            HeadingLevel::H4 => "H4",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub level: HeadingLevel,
    pub text: String,
    pub page: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentOutline {
    pub title: String,
    pub outline: Vec<OutlineEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchDocumentEntry {
    pub filename: String,
    pub sha256: String,
    pub output_path: String,
    pub title: String,
    pub heading_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub generated_at: String,
    pub source_directory: String,
    pub output_directory: String,
    pub pdf_count: usize,
    pub documents: Vec<BatchDocumentEntry>,
    pub warnings: Vec<String>,
}
