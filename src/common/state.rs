// Application state shared across all modules

use sqlx::SqlitePool;
use std::collections::HashSet;
use std::sync::Arc;

use crate::candidates::ingestion::ResumeIngestor;
use crate::candidates::store::ProfileStore;
use crate::common::dev_mode::DevModeConfig;

/// Application state containing database pool, services, and configuration.
///
/// Built once at startup and never mutated afterwards; handlers share it
/// through `Extension<Arc<AppState>>`.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub jwt_secret: String,
    pub admin_emails: HashSet<String>,
    pub dev_mode: DevModeConfig,
    pub profile_store: ProfileStore,
    pub resume_ingestor: Arc<ResumeIngestor>,
}

impl AppState {
    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails.contains(&email.to_lowercase())
    }
}
