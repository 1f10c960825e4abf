pub mod chunker;
mod pdf;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Error processing file {path}: {cause}")]
    UnreadablePdf { path: String, cause: String },
    #[error("Error reading file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ExtractionError {
    /// Path of the file that failed, when the failure is tied to one.
    pub fn path(&self) -> &str {
        match self {
            Self::UnreadablePdf { path, .. } | Self::Io { path, .. } => path,
        }
    }
}

/// A page of extracted text.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// 1-based page number.
    pub page_number: usize,
    /// The extracted text content.
    pub text: String,
}

/// Result of extracting text from a document.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Original filename.
    pub filename: String,
    /// Extracted pages in page order.
    pub pages: Vec<PageContent>,
}

impl ExtractedDocument {
    /// Get all text concatenated.
    pub fn full_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Total character count across all pages.
    pub fn total_chars(&self) -> usize {
        self.pages.iter().map(|p| p.text.chars().count()).sum()
    }
}

/// Concatenated text of a batch of PDF files, in input order.
#[derive(Debug, Clone, Default)]
pub struct ExtractedText {
    pub text: String,
    pub file_count: usize,
    pub page_count: usize,
}

impl ExtractedText {
    /// True when no file yielded any non-whitespace text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Whether a filename carries a recognized PDF extension (case-insensitive).
pub fn is_pdf_filename(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Extract and concatenate the text of every PDF in `paths`, page by page and
/// file by file. Any unreadable file fails the whole batch; no partial text
/// is returned.
pub fn extract_files(paths: &[PathBuf]) -> Result<ExtractedText, ExtractionError> {
    let mut parts = Vec::with_capacity(paths.len());
    let mut page_count = 0;

    for path in paths {
        let display = path.display().to_string();
        let bytes = std::fs::read(path).map_err(|source| ExtractionError::Io {
            path: display.clone(),
            source,
        })?;

        let pages = pdf::extract_pdf(&bytes).map_err(|cause| ExtractionError::UnreadablePdf {
            path: display.clone(),
            cause,
        })?;
        let doc = ExtractedDocument {
            filename: display,
            pages,
        };

        debug!(
            "Extracted '{}': {} pages, {} chars",
            doc.filename,
            doc.pages.len(),
            doc.total_chars()
        );
        page_count += doc.pages.len();

        let text = doc.full_text();
        if !text.is_empty() {
            parts.push(text);
        }
    }

    let text = parts.join("\n\n");
    info!(
        files = paths.len(),
        pages = page_count,
        chars = text.chars().count(),
        "PDF text extraction finished"
    );

    Ok(ExtractedText {
        text,
        file_count: paths.len(),
        page_count,
    })
}
