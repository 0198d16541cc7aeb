// src/jobs/routes.rs

use axum::{routing::get, Router};

use super::handlers;

/// Create the jobs router with all job-related routes
pub fn jobs_routes() -> Router {
    Router::new()
        .route(
            "/api/jobs",
            get(handlers::list_jobs).post(handlers::create_job),
        )
        .route(
            "/api/jobs/:id",
            get(handlers::get_job_by_id)
                .put(handlers::update_job)
                .delete(handlers::delete_job),
        )
}
