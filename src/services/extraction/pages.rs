// Apple Pages extraction
// A .pages file is a ZIP container. Every entry ending in `Index.xml` is read,
// stripped of markup and appended. Files saved without an XML index (the
// binary .iwa format) yield the placeholder instead of an error.

use std::io::{Cursor, Read};

use tracing::warn;
use zip::ZipArchive;

use super::ExtractError;
use crate::services::text_processor::clean_markup_text;

const INDEX_ENTRY_SUFFIX: &str = "Index.xml";

pub const PAGES_PLACEHOLDER: &str = "⚠️ Impossibile estrarre testo da .pages";

pub fn extract_pages(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(pages_error)?;

    let mut text = String::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(pages_error)?;
        if !entry.name().ends_with(INDEX_ENTRY_SUFFIX) {
            continue;
        }
        let mut raw = Vec::new();
        entry.read_to_end(&mut raw).map_err(pages_error)?;
        text.push_str(&clean_markup_text(&decode_ignoring_invalid(&raw)));
    }

    if text.is_empty() {
        warn!(entries = archive.len(), "pages.no_index_text");
        return Ok(PAGES_PLACEHOLDER.to_string());
    }
    Ok(text)
}

/// UTF-8 decode that drops invalid byte sequences instead of replacing them.
fn decode_ignoring_invalid(raw: &[u8]) -> String {
    raw.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

fn pages_error(e: impl std::fmt::Display) -> ExtractError {
    ExtractError::Pages(e.to_string())
}
