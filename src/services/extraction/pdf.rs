// PDF extraction
// Page texts concatenated in page order; blank pages contribute nothing.

use std::any::Any;
use std::panic;

use tracing::warn;

use super::ExtractError;

pub fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    // pdf-extract unwraps on some malformed documents (undefined fonts, text before Tf).
    let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|payload| {
            let reason = panic_message(payload.as_ref());
            warn!(reason = %reason, "extract.pdf_panicked");
            ExtractError::Pdf(format!("documento non valido ({})", reason))
        })?
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;

    Ok(pages
        .iter()
        .filter(|page| !page.trim().is_empty())
        .map(|page| page.trim_start_matches(['\n', '\r']))
        .collect())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "errore interno".to_string()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Single-page PDF showing `text` in Helvetica, with a correct xref table.
    pub(crate) fn build_pdf(text: &str) -> Vec<u8> {
        build_pdf_with_content(&format!("BT /F1 24 Tf 72 720 Td ({}) Tj ET", text))
    }

    /// Same layout as [`build_pdf`] with a raw content stream; only `/F1` is declared.
    pub(crate) fn build_pdf_with_content(content: &str) -> Vec<u8> {
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
                .to_string(),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
            format!("<< /Length {} >>\nstream\n{}\nendstream", content.len(), content),
        ];

        let mut out = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }
        let xref_at = out.len();
        out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
        out.extend_from_slice(b"0000000000 65535 f \n");
        for off in offsets {
            out.extend_from_slice(format!("{:010} 00000 n \n", off).as_bytes());
        }
        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                objects.len() + 1,
                xref_at
            )
            .as_bytes(),
        );
        out
    }

    #[test]
    fn test_extract_single_page_pdf() {
        let text = extract_pdf(&build_pdf("Hello PDF")).unwrap();
        assert!(text.contains("Hello PDF"), "got {text:?}");
        assert!(!text.starts_with('\n'), "page prefix kept: {text:?}");
    }

    #[test]
    fn test_undefined_font_is_pdf_error() {
        let pdf = build_pdf_with_content("BT /F9 24 Tf 72 720 Td (Ciao) Tj ET");
        let err = extract_pdf(&pdf).unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }

    #[test]
    fn test_text_without_font_is_pdf_error() {
        let pdf = build_pdf_with_content("BT 72 720 Td (Ciao) Tj ET");
        let err = extract_pdf(&pdf).unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
        assert!(err.to_string().starts_with("Errore lettura .pdf"));
    }

    #[test]
    fn test_garbage_is_pdf_error() {
        let err = extract_pdf(b"this is not a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }
}
