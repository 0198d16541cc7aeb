// src/candidates/ingestion/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::error;

use crate::services::GenerationError;

/// Everything that can stop a resume on its way to a stored profile
#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("{0}")]
    Validation(String),

    #[error("document could not be parsed: {0}")]
    DocumentParse(String),

    #[error("extraction service failed: {0}")]
    ExternalService(#[from] GenerationError),

    #[error("extraction output is not valid JSON: {reason}")]
    ExtractionFormat { reason: String, raw: String },

    #[error("profile store failed: {0}")]
    Store(#[from] sqlx::Error),
}

/// Structured failure returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestionFailure {
    #[serde(rename = "error")]
    pub message: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl IngestionError {
    pub fn kind(&self) -> &'static str {
        match self {
            IngestionError::Validation(_) => "ValidationError",
            IngestionError::DocumentParse(_) => "DocumentParseError",
            IngestionError::ExternalService(_) => "ExternalServiceError",
            IngestionError::ExtractionFormat { .. } => "ExtractionFormatError",
            IngestionError::Store(_) => "StoreError",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            IngestionError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Caller-facing view. Store and service internals stay in the logs.
    pub fn to_failure(&self) -> IngestionFailure {
        let (message, detail) = match self {
            IngestionError::Validation(msg) => (msg.clone(), None),
            IngestionError::DocumentParse(reason) => (
                "Uploaded file is not a readable PDF".to_string(),
                Some(reason.clone()),
            ),
            IngestionError::ExternalService(_) | IngestionError::Store(_) => {
                ("Resume processing failed".to_string(), None)
            }
            IngestionError::ExtractionFormat { raw, .. } => {
                ("AI returned invalid JSON".to_string(), Some(raw.clone()))
            }
        };

        IngestionFailure {
            message,
            kind: self.kind(),
            detail,
        }
    }
}

impl IntoResponse for IngestionError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(kind = self.kind(), error = %self, "Resume ingestion error");
        }

        (status, Json(self.to_failure())).into_response()
    }
}
