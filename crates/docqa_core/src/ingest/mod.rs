use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::TextUnit;
use crate::error::AppError;

pub mod html;
pub mod plain_text;

pub use plain_text::{extract_lines, extract_pages, extract_pages_or_paragraphs, extract_paragraphs};

/// What one [`TextUnit`] represents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnitMode {
    /// Form-feed separated pages. A file without form feeds is split into
    /// blank-line separated paragraphs instead.
    #[default]
    Pages,
    Lines,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    PlainText,
    Html,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "" | "txt" | "text" | "md" => Ok(Self::PlainText),
            "html" | "htm" => Ok(Self::Html),
            other => Err(AppError::new(
                "INGEST_UNSUPPORTED_FORMAT",
                "Unsupported document format",
            )
            .with_details(format!("extension={other}; path={}", path.display()))),
        }
    }
}

/// Read and extract a document from disk.
///
/// HTML always yields one unit per block of visible text; `mode` applies to
/// plain text only.
pub fn read_document(path: &Path, mode: UnitMode) -> Result<Vec<TextUnit>, AppError> {
    let format = DocumentFormat::from_path(path)?;
    let bytes = fs::read(path).map_err(|e| {
        AppError::new("INGEST_READ_FAILED", "Failed to read document")
            .with_details(format!("path={}; err={}", path.display(), e))
    })?;
    let text = String::from_utf8(bytes).map_err(|e| {
        AppError::new("INGEST_INVALID_UTF8", "Document is not valid UTF-8 text")
            .with_details(format!(
                "path={}; valid_up_to={}",
                path.display(),
                e.utf8_error().valid_up_to()
            ))
    })?;

    let units = match (format, mode) {
        (DocumentFormat::Html, _) => html::extract_html_blocks(&text),
        (DocumentFormat::PlainText, UnitMode::Pages) => extract_pages_or_paragraphs(&text),
        (DocumentFormat::PlainText, UnitMode::Lines) => extract_lines(&text),
    };
    tracing::info!(
        path = %path.display(),
        units = units.len(),
        bytes = text.len(),
        "extracted document"
    );
    Ok(units)
}
