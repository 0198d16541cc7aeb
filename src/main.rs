// src/main.rs
use axum::{
    extract::Extension,
    http::{header, HeaderName, HeaderValue, Method},
    middleware, Router,
};
use dotenv::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::PathBuf;
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod auth;
mod candidates;
mod common;
mod jobs;
mod logging_middleware;
mod services;

#[cfg(test)]
mod test_support;

// ============================================================================
// COMMON IMPORTS
// ============================================================================

use candidates::ingestion::ResumeIngestor;
use candidates::store::ProfileStore;
use common::dev_mode::{apply_cli_override, log_dev_mode_status, DevModeConfig};
use common::{AppConfig, AppState};
use services::GeminiService;

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let config = AppConfig::from_env();
    info!(admin_count = config.admin_emails.len(), "Loaded admin emails");

    let dev_mode = apply_cli_override(DevModeConfig::from_env());
    log_dev_mode_status(&dev_mode);

    // ========================================================================
    // DATABASE SETUP
    // ========================================================================

    if let Some(path_part) = config.database_url.strip_prefix("sqlite://") {
        let path_without_params = path_part.split('?').next().unwrap_or("");
        if !path_without_params.is_empty() && !path_without_params.starts_with(':') {
            let db_path = PathBuf::from(path_without_params);
            if let Some(parent) = db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
    }

    let connect_options =
        SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await?;

    common::migrations::run_migrations(&pool).await?;

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let gemini = GeminiService::new(config.gemini.clone())?;
    if gemini.is_configured() {
        info!(model = %gemini.model(), "GeminiService initialized");
    } else {
        warn!("GEMINI_API_KEY is not set; resume uploads will fail until it is configured");
    }

    let profile_store = ProfileStore::new(pool.clone());
    let resume_ingestor = Arc::new(ResumeIngestor::with_pdf_extractor(
        Arc::new(gemini),
        profile_store.clone(),
    ));

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let shared = Arc::new(AppState {
        db: pool,
        jwt_secret: config.jwt_secret.clone(),
        admin_emails: config.admin_emails.clone(),
        dev_mode,
        profile_store,
        resume_ingestor,
    });

    let app = build_router(shared, &config);

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

// ============================================================================
// ROUTER COMPOSITION
// ============================================================================

pub(crate) fn build_router(state: Arc<AppState>, config: &AppConfig) -> Router {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
        .allow_credentials(true);

    Router::new()
        .merge(auth::auth_routes())
        .merge(jobs::jobs_routes())
        .merge(candidates::candidates_routes(config.max_upload_bytes))
        // Request/response bodies are only buffered when DEBUG is enabled
        .layer(middleware::from_fn(logging_middleware::log_request_response))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
