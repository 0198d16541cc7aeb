// src/candidates/ingestion/text.rs
//! Plain-text extraction from uploaded documents

use super::error::IngestionError;

/// Upper bound on the resume text handed to the extraction service,
/// counted in Unicode scalar values.
pub const MAX_RESUME_CHARS: usize = 10_000;

/// Turns raw document bytes into plain text.
///
/// Implementations are synchronous and may be CPU heavy; callers run them
/// off the async executor.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, IngestionError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, IngestionError> {
        let mime = infer::get(bytes).map(|t| t.mime_type());
        if mime != Some("application/pdf") {
            return Err(IngestionError::DocumentParse(format!(
                "expected application/pdf, got {}",
                mime.unwrap_or("unknown content")
            )));
        }

        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| IngestionError::DocumentParse(format!("PDF extraction error: {}", e)))
    }
}

/// Trim, then keep at most [`MAX_RESUME_CHARS`] characters
pub fn prepare_resume_text(raw: &str) -> String {
    raw.trim().chars().take(MAX_RESUME_CHARS).collect()
}
