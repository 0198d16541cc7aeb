// src/candidates/store.rs

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use super::models::{CandidateProfile, CandidateProfileRow, ProfileFields, ProfileSummary, ProfileSummaryRow};
use crate::common::helpers::encode_string_list;
use crate::common::safe_email_log;

/// Persistence for candidate profiles.
///
/// One row per email. `upsert` is a single statement, so concurrent uploads
/// for the same email never produce two rows; the last write wins.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    pool: SqlitePool,
}

impl ProfileStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert or replace the profile for `email`, stamping a fresh `uploaded_at`
    pub async fn upsert(
        &self,
        email: &str,
        fields: &ProfileFields,
    ) -> Result<CandidateProfile, sqlx::Error> {
        let uploaded_at = Utc::now().to_rfc3339();

        let row = sqlx::query_as::<_, CandidateProfileRow>(
            r#"
            INSERT INTO candidate_profiles (email, name, skills, summary, academic, uploaded_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(email) DO UPDATE SET
                name = excluded.name,
                skills = excluded.skills,
                summary = excluded.summary,
                academic = excluded.academic,
                uploaded_at = excluded.uploaded_at
            RETURNING email, name, skills, summary, academic, uploaded_at
            "#,
        )
        .bind(email)
        .bind(&fields.name)
        .bind(encode_string_list(&fields.skills))
        .bind(&fields.summary)
        .bind(encode_string_list(&fields.academic))
        .bind(&uploaded_at)
        .fetch_one(&self.pool)
        .await?;

        debug!(email = %safe_email_log(email), "Candidate profile upserted");

        Ok(row.into())
    }

    pub async fn fetch_by_email(&self, email: &str) -> Result<Option<CandidateProfile>, sqlx::Error> {
        let row = sqlx::query_as::<_, CandidateProfileRow>(
            r#"
            SELECT email, name, skills, summary, academic, uploaded_at
            FROM candidate_profiles
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CandidateProfile::from))
    }

    pub async fn list_summaries(&self) -> Result<Vec<ProfileSummary>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ProfileSummaryRow>(
            "SELECT email, name, skills, academic FROM candidate_profiles ORDER BY email",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProfileSummary::from).collect())
    }
}
