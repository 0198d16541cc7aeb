//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /api/register` - Create a password account
/// - `POST /api/login` - Exchange credentials for a JWT
/// - `POST /api/logout` - Logout (client-side token removal)
/// - `GET /api/me` - Get current user information
pub fn auth_routes() -> Router {
    Router::new()
        .route("/api/register", post(handlers::register_handler))
        .route("/api/login", post(handlers::login_handler))
        .route("/api/logout", post(handlers::logout_handler))
        .route("/api/me", get(handlers::me_handler))
}
