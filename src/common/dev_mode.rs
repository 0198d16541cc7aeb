// src/common/dev_mode.rs
//! Development mode configuration and utilities
//! Allows bypassing authentication for testing purposes

use chrono::Utc;
use std::env;
use tracing::{info, warn};

use crate::auth::models::{Role, User};

/// Fixed identifier so the dev user is stable across requests
const DEV_USER_ID: &str = "U_DEV000";

#[derive(Debug, Clone)]
pub struct DevModeConfig {
    pub enabled: bool,
    pub user_email: String,
    pub user_role: Role,
    pub user_is_admin: bool,
}

impl Default for DevModeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            user_email: "dev@test.com".to_string(),
            user_role: Role::Recruiter,
            user_is_admin: false,
        }
    }
}

impl DevModeConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let enabled = env_flag("DEV_MODE");
        let user_email = env::var("DEV_USER_EMAIL").unwrap_or(defaults.user_email);
        let user_role = env::var("DEV_USER_ROLE")
            .ok()
            .and_then(|r| Role::parse(&r))
            .unwrap_or(defaults.user_role);
        let user_is_admin = env_flag("DEV_USER_IS_ADMIN");

        Self {
            enabled,
            user_email,
            user_role,
            user_is_admin,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Create the dev user that stands in for an authenticated caller
    pub fn create_dev_user(&self) -> User {
        User {
            id: DEV_USER_ID.to_string(),
            email: self.user_email.clone(),
            password_hash: String::new(),
            role: self.user_role.as_str().to_string(),
            created_at: Some(Utc::now().to_rfc3339()),
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key)
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Log dev mode status on startup
pub fn log_dev_mode_status(config: &DevModeConfig) {
    if config.enabled {
        warn!(
            dev_user = %config.user_email,
            role = config.user_role.as_str(),
            admin = config.user_is_admin,
            "DEV MODE ENABLED: authentication bypassed, do not use in production"
        );
    } else {
        info!("Production mode - authentication required");
    }
}

/// CLI argument parsing for dev mode
pub fn parse_dev_mode_args<I>(args: I) -> Option<bool>
where
    I: IntoIterator<Item = String>,
{
    let mut result = None;
    for arg in args {
        match arg.as_str() {
            "--dev" | "--dev-mode" => result = Some(true),
            "--no-dev" | "--prod" | "--production" => result = Some(false),
            _ => {}
        }
    }
    result
}

/// Override dev mode from CLI args
pub fn apply_cli_override(mut config: DevModeConfig) -> DevModeConfig {
    if let Some(cli_dev_mode) = parse_dev_mode_args(env::args()) {
        info!(dev_mode = cli_dev_mode, "CLI override for DEV_MODE");
        config.enabled = cli_dev_mode;
    }

    config
}
