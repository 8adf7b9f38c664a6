//! Binary-document extraction strategy.
//!
//! Parses a buffered PDF byte stream and extracts text page-by-page,
//! joining pages with newlines. A page without extractable text
//! contributes an empty string rather than aborting the document.

use webbrief_core::{AppError, AppResult};

/// Extract text from a PDF byte stream.
///
/// Uses `pdf-extract` for page-wise extraction; on failure (problematic
/// fonts, unusual encodings) falls back to a direct `lopdf` page loop.
pub fn extract_text(data: &[u8]) -> AppResult<String> {
    match pdf_extract::extract_text_from_mem_by_pages(data) {
        Ok(pages) => Ok(pages.join("\n")),
        Err(err) => {
            tracing::warn!("pdf-extract failed: {}, trying lopdf fallback", err);
            extract_text_fallback(data)
        }
    }
}

/// Fallback extraction using lopdf directly.
fn extract_text_fallback(data: &[u8]) -> AppResult<String> {
    let doc = lopdf::Document::load_mem(data)
        .map_err(|e| AppError::Extraction(format!("Failed to load PDF: {}", e)))?;

    let mut pages_text = Vec::new();

    for (page_number, _page_id) in doc.get_pages() {
        // A text-free or unparsable page contributes an empty string.
        let text = doc.extract_text(&[page_number]).unwrap_or_default();
        if text.trim().is_empty() {
            tracing::debug!("No extractable text on page {}", page_number);
        }
        pages_text.push(text);
    }

    Ok(pages_text.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_bytes_are_an_error() {
        // Both extractors must reject a non-PDF payload; the caller turns
        // this into an empty document at the extraction boundary.
        let result = extract_text(b"this is not a pdf");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(extract_text(&[]).is_err());
    }
}
