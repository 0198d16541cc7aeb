// src/candidates/ingestion/mod.rs
//! Resume ingestion: PDF bytes in, stored candidate profile out.
//!
//! Steps run strictly in order and stop at the first failure:
//! validate, extract text, build prompt, call the generator,
//! normalize its output, upsert the profile.

pub mod error;
pub mod normalizer;
pub mod prompt;
pub mod text;

use bytes::Bytes;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub use error::{IngestionError, IngestionFailure};
pub use normalizer::normalize_response;
pub use prompt::build_extraction_prompt;
pub use text::{prepare_resume_text, PdfTextExtractor, TextExtractor, MAX_RESUME_CHARS};

use super::models::CandidateProfile;
use super::store::ProfileStore;
use crate::common::safe_email_log;
use crate::services::TextGenerator;

/// Last step an ingestion reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionStage {
    Received,
    TextExtracted,
    PromptBuilt,
    ExternalCallPending,
    ResponseNormalized,
    Stored,
    Completed,
}

impl IngestionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestionStage::Received => "received",
            IngestionStage::TextExtracted => "text_extracted",
            IngestionStage::PromptBuilt => "prompt_built",
            IngestionStage::ExternalCallPending => "external_call_pending",
            IngestionStage::ResponseNormalized => "response_normalized",
            IngestionStage::Stored => "stored",
            IngestionStage::Completed => "completed",
        }
    }
}

impl fmt::Display for IngestionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw upload as decoded from the multipart form
#[derive(Debug, Default, Clone)]
pub struct ResumeUpload {
    pub email: Option<String>,
    pub file: Option<Bytes>,
}

/// File is checked before email; email only needs to be non-blank and is trimmed
fn validate_upload(upload: ResumeUpload) -> Result<(String, Bytes), IngestionError> {
    let file = upload
        .file
        .ok_or_else(|| IngestionError::Validation("No file uploaded".to_string()))?;

    let email = upload
        .email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| IngestionError::Validation("Email is required".to_string()))?;

    Ok((email, file))
}

pub struct ResumeIngestor {
    extractor: Arc<dyn TextExtractor>,
    generator: Arc<dyn TextGenerator>,
    store: ProfileStore,
}

impl ResumeIngestor {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        generator: Arc<dyn TextGenerator>,
        store: ProfileStore,
    ) -> Self {
        Self {
            extractor,
            generator,
            store,
        }
    }

    pub fn with_pdf_extractor(generator: Arc<dyn TextGenerator>, store: ProfileStore) -> Self {
        Self::new(Arc::new(PdfTextExtractor), generator, store)
    }

    /// Run one upload through the pipeline.
    ///
    /// Nothing is written unless every earlier step succeeded.
    pub async fn ingest_resume(
        &self,
        upload: ResumeUpload,
    ) -> Result<CandidateProfile, IngestionError> {
        let mut stage = IngestionStage::Received;
        let result = self.run(upload, &mut stage).await;

        match &result {
            Ok(profile) => info!(
                email = %safe_email_log(&profile.email),
                skills = profile.skills.len(),
                stage = %stage,
                "Resume ingested"
            ),
            Err(e) => warn!(
                kind = e.kind(),
                last_stage = %stage,
                error = %e,
                "Resume ingestion failed"
            ),
        }

        result
    }

    async fn run(
        &self,
        upload: ResumeUpload,
        stage: &mut IngestionStage,
    ) -> Result<CandidateProfile, IngestionError> {
        let (email, pdf) = validate_upload(upload)?;
        debug!(email = %safe_email_log(&email), bytes = pdf.len(), "Resume upload received");

        let text = self.extract(pdf).await?;
        *stage = IngestionStage::TextExtracted;
        debug!(chars = text.chars().count(), "Resume text extracted");

        let prompt = build_extraction_prompt(&text);
        *stage = IngestionStage::PromptBuilt;
        debug!(prompt_chars = prompt.chars().count(), "Extraction prompt built");

        *stage = IngestionStage::ExternalCallPending;
        let raw = self.generator.generate(&prompt).await?;

        let fields = normalize_response(&raw)?;
        *stage = IngestionStage::ResponseNormalized;

        let profile = self.store.upsert(&email, &fields).await?;
        *stage = IngestionStage::Stored;
        debug!(email = %safe_email_log(&email), "Candidate profile stored");

        *stage = IngestionStage::Completed;
        Ok(profile)
    }

    /// PDF parsing is CPU bound, so it runs on the blocking pool
    async fn extract(&self, pdf: Bytes) -> Result<String, IngestionError> {
        let extractor = Arc::clone(&self.extractor);

        let raw = tokio::task::spawn_blocking(move || extractor.extract_text(&pdf))
            .await
            .map_err(|e| IngestionError::DocumentParse(format!("PDF parser aborted: {}", e)))??;

        Ok(prepare_resume_text(&raw))
    }
}
