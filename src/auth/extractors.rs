//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::handlers::decode_token;
use super::models::User;
use crate::common::{safe_email_log, ApiError, AppState};

/// Authenticated user extractor
///
/// Validates the bearer JWT and loads the user from the database.
/// Admin rights are granted from the `ADMIN_EMAILS` list.
#[derive(Debug)]
pub struct AuthedUser {
    pub id: String,
    pub email: String,
    pub role: String,
    pub is_admin: bool,
}

impl AuthedUser {
    /// Recruiters and admins may post jobs and browse candidate profiles
    pub fn is_recruiter_or_admin(&self) -> bool {
        self.is_admin || self.role == "recruiter"
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(app_state): Extension<Arc<AppState>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        // DEV MODE: Bypass authentication completely
        if app_state.dev_mode.is_enabled() {
            let dev_user = app_state.dev_mode.create_dev_user();
            let is_admin =
                app_state.dev_mode.user_is_admin || app_state.is_admin_email(&dev_user.email);

            debug!(
                user_id = %dev_user.id,
                email = %safe_email_log(&dev_user.email),
                is_admin = is_admin,
                "DEV MODE: Authentication bypassed"
            );

            return Ok(AuthedUser {
                id: dev_user.id,
                email: dev_user.email,
                role: dev_user.role,
                is_admin,
            });
        }

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string());

        let token = match token {
            Some(t) => t,
            None => {
                warn!("Authentication failed: missing Authorization header");
                return Err(ApiError::Unauthorized("missing auth".into()));
            }
        };

        // Handle "Bearer <token>" format or raw token
        let bare_token = token.strip_prefix("Bearer ").unwrap_or(&token);

        let claims = decode_token(bare_token, &app_state.jwt_secret).map_err(|e| {
            warn!(error = %e, "JWT token validation failed");
            ApiError::Unauthorized("invalid token".into())
        })?;

        let user: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(&claims.sub)
            .fetch_optional(&app_state.db)
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    user_id = %claims.sub,
                    "Database error during user lookup in authentication"
                );
                ApiError::DatabaseError(e)
            })?;

        match user {
            Some(u) => {
                let is_admin = app_state.is_admin_email(&u.email);
                debug!(
                    user_id = %u.id,
                    email = %safe_email_log(&u.email),
                    role = %u.role,
                    is_admin = is_admin,
                    "User authentication successful via extractor"
                );
                Ok(AuthedUser {
                    id: u.id,
                    email: u.email,
                    role: u.role,
                    is_admin,
                })
            }
            None => {
                warn!(user_id = %claims.sub, "Authentication failed: user not found in database");
                Err(ApiError::Unauthorized("user not found".into()))
            }
        }
    }
}
