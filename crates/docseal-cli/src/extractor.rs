//! Plain-text extractor.
//!
//! Treats the document as UTF-8 text with pages separated by form feeds
//! (`\x0c`), the page break character emitted by `pdftotext`.

use docseal_core::{async_trait, Extraction, ExtractionError, Extractor};

/// Page separator.
pub const PAGE_BREAK: char = '\u{0c}';

/// Extracts text from UTF-8 documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExtractor;

#[async_trait]
impl Extractor for TextExtractor {
    async fn extract(&self, bytes: &[u8], page_limit: u32) -> Result<Extraction, ExtractionError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| ExtractionError::Unreadable(format!("not UTF-8 text: {}", e)))?;
        if text.trim().is_empty() || page_limit == 0 {
            return Ok(Extraction::default());
        }

        let pages: Vec<&str> = text
            .split(PAGE_BREAK)
            .take(page_limit as usize)
            .map(str::trim)
            .collect();
        Ok(Extraction {
            text: pages.join("\n").trim().to_string(),
            pages_processed: pages.len() as u32,
        })
    }
}
