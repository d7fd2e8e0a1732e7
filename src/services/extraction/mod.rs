// Text Extraction
// Dispatches on the document format and returns the raw text:
// - plain: UTF-8 text files
// - word: .docx body paragraphs
// - pdf: per-page text
// - pages: Index.xml entries inside the .pages archive

pub mod pages;
pub mod pdf;
pub mod word;

use std::fs;
use std::path::Path;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info};

use crate::models::{Document, DocumentFormat};

pub use pages::{extract_pages, PAGES_PLACEHOLDER};
pub use pdf::extract_pdf;
pub use word::extract_docx;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Formato non supportato (usa .txt, .docx, .pdf, .pages)")]
    UnsupportedFormat(String),
    #[error("Errore lettura file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Il file non è un testo UTF-8 valido: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    #[error("Errore lettura .docx: {0}")]
    Word(String),
    #[error("Errore lettura .pdf: {0}")]
    Pdf(String),
    #[error("Errore lettura .pages: {0}")]
    Pages(String),
}

/// Extract text from a file on disk. The format is decided by the extension
/// before the file is opened.
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let document = Document::from_path(path).ok_or_else(|| unsupported_format(path))?;
    extract_document(&document)
}

pub fn unsupported_format(path: &Path) -> ExtractError {
    ExtractError::UnsupportedFormat(
        path.extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default(),
    )
}

pub fn extract_document(document: &Document) -> Result<String, ExtractError> {
    let t0 = Instant::now();
    let bytes = fs::read(&document.path)?;
    debug!(
        file = %document.file_name(),
        format = %document.format,
        bytes = bytes.len(),
        "extract.start"
    );

    let text = extract_bytes(document.format, &bytes)?;

    info!(
        file = %document.file_name(),
        format = %document.format,
        chars = text.chars().count(),
        elapsed_ms = t0.elapsed().as_millis(),
        "extract.completed"
    );
    Ok(text)
}

/// Extract text from an in-memory document of a known format.
pub fn extract_bytes(format: DocumentFormat, bytes: &[u8]) -> Result<String, ExtractError> {
    match format {
        DocumentFormat::PlainText => extract_plain(bytes),
        DocumentFormat::Word => extract_docx(bytes),
        DocumentFormat::Pdf => extract_pdf(bytes),
        DocumentFormat::Pages => extract_pages(bytes),
    }
}

/// Strict UTF-8 decode with universal newlines (`\r\n` and `\r` become `\n`).
pub fn extract_plain(bytes: &[u8]) -> Result<String, ExtractError> {
    let text = String::from_utf8(bytes.to_vec())?;
    if !text.contains('\r') {
        return Ok(text);
    }
    Ok(text.replace("\r\n", "\n").replace('\r', "\n"))
}
