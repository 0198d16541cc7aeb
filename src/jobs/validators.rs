// src/jobs/validators.rs

use super::models::*;
use crate::common::{ValidationResult, Validator};

const MAX_TITLE_LENGTH: usize = 255;
const MAX_DESCRIPTION_LENGTH: usize = 10_000;
const MAX_SHORT_FIELD_LENGTH: usize = 1_000;
const MAX_MARKS: f64 = 100.0;
const MAX_CGPA: f64 = 10.0;

// ============================================================================
// Job Validators
// ============================================================================

pub struct JobValidator;

impl Validator<CreateJob> for JobValidator {
    fn validate(&self, data: &CreateJob) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.job_title.trim().is_empty() {
            result.add_error("job_title", "Job title is required");
        }

        validate_common_fields(
            &mut result,
            Some(&data.job_title),
            data.job_description.as_deref(),
            data.company_name.as_deref(),
            data.skills_required.as_deref(),
            [data.marks_10th, data.marks_12th],
            data.college_cgpa,
        );

        result
    }
}

pub struct JobUpdateValidator;

impl Validator<UpdateJob> for JobUpdateValidator {
    fn validate(&self, data: &UpdateJob) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.is_empty() {
            result.add_error("body", "At least one field must be provided");
            return result;
        }

        if let Some(title) = &data.job_title {
            if title.trim().is_empty() {
                result.add_error("job_title", "Job title cannot be empty");
            }
        }

        validate_common_fields(
            &mut result,
            data.job_title.as_deref(),
            data.job_description.as_deref(),
            data.company_name.as_deref(),
            data.skills_required.as_deref(),
            [data.marks_10th, data.marks_12th],
            data.college_cgpa,
        );

        result
    }
}

fn validate_common_fields(
    result: &mut ValidationResult,
    title: Option<&str>,
    description: Option<&str>,
    company: Option<&str>,
    skills: Option<&str>,
    marks: [Option<f64>; 2],
    cgpa: Option<f64>,
) {
    if title.map_or(false, |t| t.len() > MAX_TITLE_LENGTH) {
        result.add_error("job_title", "Job title must be less than 255 characters");
    }

    if description.map_or(false, |d| d.len() > MAX_DESCRIPTION_LENGTH) {
        result.add_error(
            "job_description",
            "Description must be less than 10000 characters",
        );
    }

    if company.map_or(false, |c| c.len() > MAX_TITLE_LENGTH) {
        result.add_error(
            "company_name",
            "Company name must be less than 255 characters",
        );
    }

    if skills.map_or(false, |s| s.len() > MAX_SHORT_FIELD_LENGTH) {
        result.add_error(
            "skills_required",
            "Skills must be less than 1000 characters",
        );
    }

    for (field, value) in ["marks_10th", "marks_12th"].iter().zip(marks) {
        if let Some(v) = value {
            if !(0.0..=MAX_MARKS).contains(&v) {
                result.add_error(field, "Marks must be between 0 and 100");
            }
        }
    }

    if let Some(v) = cgpa {
        if !(0.0..=MAX_CGPA).contains(&v) {
            result.add_error("college_cgpa", "CGPA must be between 0 and 10");
        }
    }
}
