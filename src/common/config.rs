// src/common/config.rs
//! Process configuration read from environment variables

use std::collections::HashSet;
use std::env;

use crate::services::gemini::GeminiConfig;

const DEFAULT_DATABASE_URL: &str = "sqlite://jobboard.db";
const DEFAULT_PORT: u16 = 5001;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub admin_emails: HashSet<String>,
    pub cors_origins: Vec<String>,
    pub max_upload_bytes: usize,
    pub gemini: GeminiConfig,
}

impl AppConfig {
    /// Build the configuration from the process environment.
    /// Call after `dotenv()` so `.env` values are visible.
    pub fn from_env() -> Self {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let jwt_secret =
            env::var("JWT_SECRET").unwrap_or_else(|_| "replace_with_strong_secret".to_string());

        let admin_emails = parse_admin_emails(&env::var("ADMIN_EMAILS").unwrap_or_default());

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        Self {
            database_url,
            port,
            jwt_secret,
            admin_emails,
            cors_origins,
            max_upload_bytes,
            gemini: GeminiConfig::from_env(),
        }
    }
}

/// Parse admin emails from a comma-separated list, lowercased
pub fn parse_admin_emails(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
