// src/jobs/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ============================================================================
// Job Models
// ============================================================================

#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Job {
    pub id: String,
    pub job_title: String,
    pub job_description: Option<String>,
    pub company_name: Option<String>,
    pub skills_required: Option<String>,
    pub marks_10th: Option<f64>,
    pub marks_12th: Option<f64>,
    pub college_cgpa: Option<f64>,
    pub posted_by: Option<String>,
    pub posted_at: String,
    pub updated_at: Option<String>,
}

// Paginated job list response
#[derive(Serialize, Debug)]
pub struct JobListResponse {
    pub jobs: Vec<Job>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

#[derive(Serialize, Debug)]
pub struct JobPostedResponse {
    pub message: String,
    pub job: Job,
}

// Request bodies accept the snake_case names and the legacy camelCase ones.

#[derive(Deserialize, Debug, Default)]
pub struct CreateJob {
    #[serde(alias = "jobTitle")]
    pub job_title: String,
    #[serde(alias = "jobDescription")]
    pub job_description: Option<String>,
    #[serde(alias = "companyName")]
    pub company_name: Option<String>,
    #[serde(alias = "skillsRequired")]
    pub skills_required: Option<String>,
    #[serde(alias = "marks10th")]
    pub marks_10th: Option<f64>,
    #[serde(alias = "marks12th")]
    pub marks_12th: Option<f64>,
    #[serde(alias = "collegeCgpa")]
    pub college_cgpa: Option<f64>,
    #[serde(alias = "postedBy")]
    pub posted_by: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct UpdateJob {
    #[serde(alias = "jobTitle")]
    pub job_title: Option<String>,
    #[serde(alias = "jobDescription")]
    pub job_description: Option<String>,
    #[serde(alias = "companyName")]
    pub company_name: Option<String>,
    #[serde(alias = "skillsRequired")]
    pub skills_required: Option<String>,
    #[serde(alias = "marks10th")]
    pub marks_10th: Option<f64>,
    #[serde(alias = "marks12th")]
    pub marks_12th: Option<f64>,
    #[serde(alias = "collegeCgpa")]
    pub college_cgpa: Option<f64>,
}

impl UpdateJob {
    pub fn is_empty(&self) -> bool {
        self.job_title.is_none()
            && self.job_description.is_none()
            && self.company_name.is_none()
            && self.skills_required.is_none()
            && self.marks_10th.is_none()
            && self.marks_12th.is_none()
            && self.college_cgpa.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct JobQueryParams {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}
