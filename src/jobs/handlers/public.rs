// src/jobs/handlers/public.rs

use axum::{
    extract::{Extension, Path, Query},
    response::Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::common::{ApiError, AppState};
use crate::jobs::models::*;

const DEFAULT_PAGE_SIZE: usize = 20;
const MAX_PAGE_SIZE: usize = 100;

/// GET /api/jobs - List jobs, newest first, with pagination
pub async fn list_jobs(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<JobQueryParams>,
) -> Result<Json<JobListResponse>, ApiError> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = (page - 1)
        .checked_mul(limit)
        .and_then(|o| i64::try_from(o).ok())
        .ok_or_else(|| ApiError::BadRequest("page is out of range".to_string()))?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs")
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let jobs = sqlx::query_as::<_, Job>(
        r#"SELECT
            id, job_title, job_description, company_name, skills_required,
            marks_10th, marks_12th, college_cgpa, posted_by, posted_at, updated_at
        FROM jobs
        ORDER BY posted_at DESC, id DESC
        LIMIT ? OFFSET ?"#,
    )
    .bind(limit as i64)
    .bind(offset)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    debug!(
        job_count = jobs.len(),
        total = total,
        page = page,
        limit = limit,
        "Loaded paginated jobs list"
    );

    Ok(Json(JobListResponse {
        jobs,
        total: total as usize,
        page,
        page_size: limit,
    }))
}

/// GET /api/jobs/:id - Get a specific job by ID
pub async fn get_job_by_id(
    Extension(state): Extension<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<Json<Job>, ApiError> {
    let job = fetch_job(&state, &job_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Job not found: {}", job_id)))?;

    debug!(job_id = %job_id, job_title = %job.job_title, "Loaded job details");

    Ok(Json(job))
}

pub(crate) async fn fetch_job(state: &AppState, job_id: &str) -> Result<Option<Job>, ApiError> {
    sqlx::query_as::<_, Job>(
        r#"SELECT
            id, job_title, job_description, company_name, skills_required,
            marks_10th, marks_12th, college_cgpa, posted_by, posted_at, updated_at
        FROM jobs WHERE id = ?"#,
    )
    .bind(job_id)
    .fetch_optional(&state.db)
    .await
    .map_err(ApiError::DatabaseError)
}
