// src/candidates/routes.rs

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use super::handlers;

/// Candidate profile routes; uploads may be up to `max_upload_bytes`
pub fn candidates_routes(max_upload_bytes: usize) -> Router {
    Router::new()
        .route(
            "/api/upload-resume",
            post(handlers::upload_resume).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/api/resume/:email", get(handlers::get_resume))
        .route("/api/resumes", get(handlers::list_resumes))
}
