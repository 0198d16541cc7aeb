//! Authentication handlers

use axum::extract::{Extension, Json};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::extractors::AuthedUser;
use super::models::{Claims, LoginRequest, LoginResponse, RegisterRequest, Role, User};
use super::validators::{LoginValidator, RegisterValidator};
use crate::common::{generate_user_id, safe_email_log, ApiError, AppState, Validator};

/// bcrypt work factor for stored passwords
pub const PASSWORD_HASH_COST: u32 = 10;

/// How long an issued token stays valid
const TOKEN_TTL_HOURS: i64 = 24;

/// POST /api/register
/// Creates a password account
///
/// # Request Body
/// ```json
/// { "email": "jane@example.com", "password": "...", "role": "candidate" }
/// ```
pub async fn register_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let validation = RegisterValidator.validate(&payload);
    if !validation.is_valid {
        warn!(errors = ?validation.errors, "Registration validation failed");
        return Err(ApiError::from(validation));
    }

    let email = payload.email.trim().to_lowercase();
    let role = payload
        .role
        .as_deref()
        .and_then(Role::parse)
        .unwrap_or(Role::Candidate);

    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if existing.is_some() {
        warn!(email = %safe_email_log(&email), "Registration rejected: email already registered");
        return Err(ApiError::BadRequest("Email already registered".to_string()));
    }

    let password_hash = hash_password(payload.password, PASSWORD_HASH_COST).await?;
    let id = generate_user_id();

    sqlx::query("INSERT INTO users (id, email, password_hash, role) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(&email)
        .bind(&password_hash)
        .bind(role.as_str())
        .execute(&state.db)
        .await
        .map_err(|e| {
            let duplicate = e
                .as_database_error()
                .map(|db| db.is_unique_violation())
                .unwrap_or(false);
            if duplicate {
                ApiError::BadRequest("Email already registered".to_string())
            } else {
                error!(error = %e, user_id = %id, "Database error inserting new user");
                ApiError::DatabaseError(e)
            }
        })?;

    info!(
        user_id = %id,
        email = %safe_email_log(&email),
        role = role.as_str(),
        "User registered"
    );

    Ok(Json(serde_json::json!({
        "message": "User registered successfully"
    })))
}

/// POST /api/login
/// Verifies the password and issues a JWT
///
/// # Response
/// ```json
/// { "token": "<jwt>", "role": "recruiter" }
/// ```
pub async fn login_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let validation = LoginValidator.validate(&payload);
    if !validation.is_valid {
        return Err(ApiError::from(validation));
    }

    let email = payload.email.trim().to_lowercase();

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| {
            warn!(email = %safe_email_log(&email), "Login failed: user not found");
            ApiError::NotFound("User not found".to_string())
        })?;

    if !verify_password(payload.password, user.password_hash.clone()).await? {
        warn!(user_id = %user.id, "Login failed: invalid credentials");
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = issue_token(&user, &state.jwt_secret)?;

    info!(user_id = %user.id, email = %safe_email_log(&user.email), "User logged in");

    Ok(Json(LoginResponse {
        token,
        role: user.role,
    }))
}

/// GET /api/me
/// Returns the current authenticated user's information
pub async fn me_handler(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    if state.dev_mode.is_enabled() {
        let dev_user = state.dev_mode.create_dev_user();
        return Ok(Json(serde_json::json!({
            "user": dev_user,
            "is_admin": authed.is_admin
        })));
    }

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&authed.id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    Ok(Json(serde_json::json!({
        "user": user,
        "is_admin": authed.is_admin
    })))
}

/// POST /api/logout
/// Tokens are stateless, so logout only confirms the client dropped its token
pub async fn logout_handler(_authed: AuthedUser) -> Result<Json<serde_json::Value>, ApiError> {
    info!("User logout successful");
    Ok(Json(serde_json::json!({
        "message": "Logout successful"
    })))
}

// ---- Helper Functions ----

/// Sign a 24h HS256 token for the user
pub fn issue_token(user: &User, secret: &str) -> Result<String, ApiError> {
    let exp = (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize;
    let claims = Claims {
        sub: user.id.clone(),
        email: user.email.clone(),
        role: user.role.clone(),
        exp,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        error!(error = %e, user_id = %user.id, "JWT encoding error");
        ApiError::InternalServer("jwt error".to_string())
    })
}

/// Validate a token and return its claims
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
}

/// bcrypt is CPU-heavy, so hashing runs on the blocking pool
pub async fn hash_password(password: String, cost: u32) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| {
            error!(error = %e, "Password hashing task failed");
            ApiError::InternalServer("password hashing failed".to_string())
        })?
        .map_err(|e| {
            error!(error = %e, "Password hashing failed");
            ApiError::InternalServer("password hashing failed".to_string())
        })
}

pub async fn verify_password(password: String, hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| {
            error!(error = %e, "Password verification task failed");
            ApiError::InternalServer("password verification failed".to_string())
        })?
        .or_else(|e| {
            // A corrupt stored hash is treated as a mismatch
            warn!(error = %e, "Stored password hash could not be verified");
            Ok(false)
        })
}
