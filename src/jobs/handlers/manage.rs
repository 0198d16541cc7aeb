// src/jobs/handlers/manage.rs

use axum::{
    extract::{Extension, Path},
    response::Json,
};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::public::fetch_job;
use crate::auth::AuthedUser;
use crate::common::{generate_job_id, ApiError, AppState, Validator};
use crate::jobs::models::*;
use crate::jobs::validators::{JobUpdateValidator, JobValidator};

/// POST /api/jobs - Post a new job (recruiters and admins)
pub async fn create_job(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Json(body): Json<CreateJob>,
) -> Result<Json<JobPostedResponse>, ApiError> {
    if !authed.is_recruiter_or_admin() {
        return Err(ApiError::Forbidden(
            "recruiter privileges required".to_string(),
        ));
    }

    let validation = JobValidator.validate(&body);
    if !validation.is_valid {
        warn!(user_id = %authed.id, errors = ?validation.errors, "Job validation failed");
        return Err(ApiError::from(validation));
    }

    let id = generate_job_id();
    let now = chrono::Utc::now().to_rfc3339();
    // Only admins may post on behalf of someone else
    let posted_by = body
        .posted_by
        .as_deref()
        .map(str::trim)
        .filter(|p| authed.is_admin && !p.is_empty())
        .unwrap_or(authed.email.as_str())
        .to_string();

    sqlx::query(
        r#"INSERT INTO jobs (
            id, job_title, job_description, company_name, skills_required,
            marks_10th, marks_12th, college_cgpa, posted_by, posted_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&id)
    .bind(body.job_title.trim())
    .bind(body.job_description.as_deref())
    .bind(body.company_name.as_deref())
    .bind(body.skills_required.as_deref())
    .bind(body.marks_10th)
    .bind(body.marks_12th)
    .bind(body.college_cgpa)
    .bind(&posted_by)
    .bind(&now)
    .bind(&now)
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(
            error = %e,
            job_id = %id,
            user_id = %authed.id,
            "Database error creating job"
        );
        ApiError::DatabaseError(e)
    })?;

    let job = fetch_job(&state, &id)
        .await?
        .ok_or_else(|| ApiError::InternalServer("job vanished after insert".to_string()))?;

    info!(job_id = %id, user_id = %authed.id, "Job posted");

    Ok(Json(JobPostedResponse {
        message: "Job posted successfully".to_string(),
        job,
    }))
}

/// PUT /api/jobs/:id - Partially update a job (poster or admin)
pub async fn update_job(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateJob>,
) -> Result<Json<Job>, ApiError> {
    let validation = JobUpdateValidator.validate(&body);
    if !validation.is_valid {
        return Err(ApiError::from(validation));
    }

    let existing = fetch_job(&state, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Job not found: {}", id)))?;
    ensure_can_manage(&authed, &existing)?;

    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        r#"UPDATE jobs SET
            job_title = COALESCE(?, job_title),
            job_description = COALESCE(?, job_description),
            company_name = COALESCE(?, company_name),
            skills_required = COALESCE(?, skills_required),
            marks_10th = COALESCE(?, marks_10th),
            marks_12th = COALESCE(?, marks_12th),
            college_cgpa = COALESCE(?, college_cgpa),
            updated_at = ?
        WHERE id = ?"#,
    )
    .bind(body.job_title.as_deref().map(str::trim))
    .bind(body.job_description.as_deref())
    .bind(body.company_name.as_deref())
    .bind(body.skills_required.as_deref())
    .bind(body.marks_10th)
    .bind(body.marks_12th)
    .bind(body.college_cgpa)
    .bind(&now)
    .bind(&id)
    .execute(&state.db)
    .await
    .map_err(|e| {
        error!(error = %e, job_id = %id, "Database error updating job");
        ApiError::DatabaseError(e)
    })?;

    let job = fetch_job(&state, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Job not found: {}", id)))?;

    info!(job_id = %id, user_id = %authed.id, "Job updated");

    Ok(Json(job))
}

/// DELETE /api/jobs/:id - Delete a job (poster or admin)
pub async fn delete_job(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let existing = fetch_job(&state, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Job not found: {}", id)))?;
    ensure_can_manage(&authed, &existing)?;

    sqlx::query("DELETE FROM jobs WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(job_id = %id, user_id = %authed.id, "Job deleted");

    Ok(Json(serde_json::json!({ "message": "Job deleted successfully" })))
}

fn ensure_can_manage(authed: &AuthedUser, job: &Job) -> Result<(), ApiError> {
    let is_poster = job
        .posted_by
        .as_deref()
        .map_or(false, |p| p.eq_ignore_ascii_case(&authed.email));

    if authed.is_admin || (is_poster && authed.is_recruiter_or_admin()) {
        Ok(())
    } else {
        warn!(job_id = %job.id, user_id = %authed.id, "Job management denied");
        Err(ApiError::Forbidden(
            "only the poster or an admin can modify this job".to_string(),
        ))
    }
}
