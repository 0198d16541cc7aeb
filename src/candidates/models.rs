// src/candidates/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::common::helpers::decode_string_list;

/// Fields pulled out of a resume by the extraction service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileFields {
    pub name: String,
    pub summary: String,
    pub skills: Vec<String>,
    pub academic: Vec<String>,
}

/// Stored structured profile, keyed by email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub email: String,
    pub name: String,
    pub skills: Vec<String>,
    pub summary: String,
    pub academic: Vec<String>,
    pub uploaded_at: String,
}

impl CandidateProfile {
    pub fn fields(&self) -> ProfileFields {
        ProfileFields {
            name: self.name.clone(),
            summary: self.summary.clone(),
            skills: self.skills.clone(),
            academic: self.academic.clone(),
        }
    }
}

/// Listing projection: no summary, no timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub email: String,
    pub name: String,
    pub skills: Vec<String>,
    pub academic: Vec<String>,
}

// Row types mirror the table; list columns hold JSON arrays

#[derive(Debug, Clone, FromRow)]
pub struct CandidateProfileRow {
    pub email: String,
    pub name: String,
    pub skills: String,
    pub summary: String,
    pub academic: String,
    pub uploaded_at: String,
}

impl From<CandidateProfileRow> for CandidateProfile {
    fn from(row: CandidateProfileRow) -> Self {
        Self {
            email: row.email,
            name: row.name,
            skills: decode_string_list(&row.skills),
            summary: row.summary,
            academic: decode_string_list(&row.academic),
            uploaded_at: row.uploaded_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ProfileSummaryRow {
    pub email: String,
    pub name: String,
    pub skills: String,
    pub academic: String,
}

impl From<ProfileSummaryRow> for ProfileSummary {
    fn from(row: ProfileSummaryRow) -> Self {
        Self {
            email: row.email,
            name: row.name,
            skills: decode_string_list(&row.skills),
            academic: decode_string_list(&row.academic),
        }
    }
}
