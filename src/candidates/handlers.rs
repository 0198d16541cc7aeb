// src/candidates/handlers.rs

use axum::{
    extract::{multipart::MultipartRejection, Extension, Multipart, Path},
    response::Json,
};
use std::sync::Arc;
use tracing::{info, warn};

use super::ingestion::{IngestionError, ResumeUpload};
use super::models::{CandidateProfile, ProfileSummary};
use crate::auth::AuthedUser;
use crate::common::{safe_email_log, ApiError, AppState};

/// POST /api/upload-resume - Multipart form with `resume` (PDF) and `email`
pub async fn upload_resume(
    Extension(state): Extension<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CandidateProfile>, IngestionError> {
    let mut multipart = multipart.map_err(|e| {
        IngestionError::Validation(format!("Expected a multipart form upload: {}", e.body_text()))
    })?;

    let mut upload = ResumeUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| IngestionError::Validation(format!("Failed to read multipart field: {}", e)))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "resume" => {
                let data = field.bytes().await.map_err(|e| {
                    IngestionError::Validation(format!("Failed to read uploaded file: {}", e))
                })?;
                upload.file = Some(data);
            }
            "email" => {
                let email = field.text().await.map_err(|e| {
                    IngestionError::Validation(format!("Failed to read email field: {}", e))
                })?;
                upload.email = Some(email);
            }
            other => {
                warn!(field = %other, "Ignoring unexpected multipart field");
            }
        }
    }

    let profile = state.resume_ingestor.ingest_resume(upload).await?;

    Ok(Json(profile))
}

/// GET /api/resume/:email - Stored profile for one email
pub async fn get_resume(
    Extension(state): Extension<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<CandidateProfile>, ApiError> {
    let profile = state
        .profile_store
        .fetch_by_email(&email)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Resume not found".to_string()))?;

    Ok(Json(profile))
}

/// GET /api/resumes - Profile summaries (recruiters and admins)
pub async fn list_resumes(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
) -> Result<Json<Vec<ProfileSummary>>, ApiError> {
    if !authed.is_recruiter_or_admin() {
        return Err(ApiError::Forbidden(
            "recruiter privileges required".to_string(),
        ));
    }

    let summaries = state
        .profile_store
        .list_summaries()
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(
        requested_by = %safe_email_log(&authed.email),
        count = summaries.len(),
        "Listed candidate profiles"
    );

    Ok(Json(summaries))
}
