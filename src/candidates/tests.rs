//! Tests for the candidates module
//!
//! Pipeline tests drive `ResumeIngestor` with a fake extractor and generator.
//! Router tests go through the full axum stack with hand-built multipart bodies.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use bytes::Bytes;
use std::sync::Arc;
use tower::ServiceExt;

use super::ingestion::{ResumeIngestor, ResumeUpload, MAX_RESUME_CHARS};
use super::store::ProfileStore;
use crate::build_router;
use crate::test_support::*;

const JANE_REPLY: &str =
    "```json\n{\"name\":\"Jane Doe\",\"summary\":\"\",\"skills\":[\"Go\",\"SQL\"],\"academic\":[]}\n```";

fn ingestor(store: ProfileStore, generator: Arc<FakeGenerator>) -> ResumeIngestor {
    ResumeIngestor::new(Arc::new(FakeExtractor), generator, store)
}

fn upload(email: &str, text: &str) -> ResumeUpload {
    ResumeUpload {
        email: Some(email.to_string()),
        file: Some(Bytes::from(text.to_string())),
    }
}

async fn profile_count(pool: &sqlx::SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM candidate_profiles")
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---- Pipeline ----

#[tokio::test]
async fn test_fenced_reply_is_ingested_and_stored() {
    let pool = test_pool().await;
    let store = ProfileStore::new(pool.clone());
    let generator = FakeGenerator::replying(&[JANE_REPLY]);
    let ingestor = ingestor(store.clone(), generator.clone());

    let profile = ingestor
        .ingest_resume(upload("a@b.com", "Jane Doe ... skills: Go, SQL"))
        .await
        .unwrap();

    assert_eq!(profile.email, "a@b.com");
    assert_eq!(profile.name, "Jane Doe");
    assert_eq!(profile.skills, vec!["Go", "SQL"]);
    assert_eq!(profile.summary, "");
    assert!(profile.academic.is_empty());

    assert_eq!(store.fetch_by_email("a@b.com").await.unwrap(), Some(profile));
    assert_eq!(generator.call_count(), 1);
    assert!(generator
        .last_prompt()
        .unwrap()
        .contains("Jane Doe ... skills: Go, SQL"));
}

#[tokio::test]
async fn test_unparseable_reply_writes_nothing() {
    let pool = test_pool().await;
    let generator = FakeGenerator::replying(&["not json at all"]);
    let ingestor = ingestor(ProfileStore::new(pool.clone()), generator);

    let err = ingestor
        .ingest_resume(upload("a@b.com", "Jane Doe"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "ExtractionFormatError");
    assert_eq!(err.to_failure().detail.as_deref(), Some("not json at all"));
    assert_eq!(profile_count(&pool).await, 0);
}

#[tokio::test]
async fn test_second_ingestion_replaces_first() {
    let pool = test_pool().await;
    let store = ProfileStore::new(pool.clone());
    let generator = FakeGenerator::replying(&[
        r#"{"name":"Jane","skills":["Go"]}"#,
        r#"{"name":"Jane Doe","skills":["Rust"],"summary":"Systems engineer"}"#,
    ]);
    let ingestor = ingestor(store.clone(), generator.clone());

    ingestor.ingest_resume(upload("a@b.com", "v1")).await.unwrap();
    let second = ingestor.ingest_resume(upload("a@b.com", "v2")).await.unwrap();

    assert_eq!(profile_count(&pool).await, 1);
    assert_eq!(second.name, "Jane Doe");
    assert_eq!(second.skills, vec!["Rust"]);
    assert_eq!(second.summary, "Systems engineer");
    assert_eq!(generator.call_count(), 2);
}

#[tokio::test]
async fn test_long_resume_is_truncated_before_prompting() {
    let generator = FakeGenerator::replying(&["{}"]);
    let ingestor = ingestor(ProfileStore::new(test_pool().await), generator.clone());

    let long = format!("{}{}", "a".repeat(MAX_RESUME_CHARS), "TAIL-MARKER");
    ingestor.ingest_resume(upload("a@b.com", &long)).await.unwrap();

    let prompt = generator.last_prompt().unwrap();
    assert!(prompt.contains(&"a".repeat(MAX_RESUME_CHARS)));
    assert!(!prompt.contains("TAIL-MARKER"));
}

#[tokio::test]
async fn test_validation_failure_skips_every_step() {
    let pool = test_pool().await;
    let generator = FakeGenerator::replying(&[JANE_REPLY]);
    let ingestor = ingestor(ProfileStore::new(pool.clone()), generator.clone());

    let missing_file = ResumeUpload {
        email: Some("a@b.com".to_string()),
        file: None,
    };
    let err = ingestor.ingest_resume(missing_file).await.unwrap_err();
    assert_eq!(err.kind(), "ValidationError");
    assert_eq!(err.to_failure().message, "No file uploaded");

    let missing_email = ResumeUpload {
        email: None,
        file: Some(Bytes::from_static(b"Jane")),
    };
    let err = ingestor.ingest_resume(missing_email).await.unwrap_err();
    assert_eq!(err.to_failure().message, "Email is required");

    assert_eq!(generator.call_count(), 0);
    assert_eq!(profile_count(&pool).await, 0);
}

#[tokio::test]
async fn test_document_parse_failure_skips_generator() {
    let generator = FakeGenerator::replying(&[JANE_REPLY]);
    let ingestor = ingestor(ProfileStore::new(test_pool().await), generator.clone());

    let err = ingestor.ingest_resume(upload("a@b.com", "FAIL")).await.unwrap_err();

    assert_eq!(err.kind(), "DocumentParseError");
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_service_failure_is_external_error_without_write() {
    let pool = test_pool().await;
    let generator = FakeGenerator::unavailable();
    let ingestor = ingestor(ProfileStore::new(pool.clone()), generator.clone());

    let err = ingestor.ingest_resume(upload("a@b.com", "Jane")).await.unwrap_err();

    assert_eq!(err.kind(), "ExternalServiceError");
    assert_eq!(generator.call_count(), 1);
    assert_eq!(profile_count(&pool).await, 0);
}

#[tokio::test]
async fn test_store_failure_is_store_error() {
    let pool = test_pool().await;
    sqlx::query("DROP TABLE candidate_profiles")
        .execute(&pool)
        .await
        .unwrap();
    let ingestor = ingestor(ProfileStore::new(pool), FakeGenerator::replying(&[JANE_REPLY]));

    let err = ingestor.ingest_resume(upload("a@b.com", "Jane")).await.unwrap_err();
    assert_eq!(err.kind(), "StoreError");
}

#[tokio::test]
async fn test_real_pdf_extractor_rejects_non_pdf_upload() {
    let pool = test_pool().await;
    let generator = FakeGenerator::replying(&[JANE_REPLY]);
    let ingestor =
        ResumeIngestor::with_pdf_extractor(generator.clone(), ProfileStore::new(pool.clone()));

    let err = ingestor
        .ingest_resume(upload("a@b.com", "plain text, not a PDF"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "DocumentParseError");
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_real_pdf_upload_reaches_generator_and_store() {
    let pool = test_pool().await;
    let generator = FakeGenerator::replying(&[JANE_REPLY]);
    let ingestor =
        ResumeIngestor::with_pdf_extractor(generator.clone(), ProfileStore::new(pool.clone()));

    let profile = ingestor
        .ingest_resume(ResumeUpload {
            email: Some("jane@example.com".to_string()),
            file: Some(Bytes::from(minimal_pdf("Jane Doe Rust Engineer"))),
        })
        .await
        .unwrap();

    assert_eq!(profile.email, "jane@example.com");
    assert_eq!(profile.name, "Jane Doe");
    assert_eq!(generator.call_count(), 1);
    assert!(generator.last_prompt().unwrap().contains("Jane"));
    assert_eq!(profile_count(&pool).await, 1);
}

// ---- HTTP ----

async fn app_with(generator: Arc<FakeGenerator>) -> (Router, sqlx::SqlitePool) {
    let pool = test_pool().await;
    let state = test_state(pool.clone(), generator);
    (build_router(state, &test_config()), pool)
}

fn upload_request(email: Option<&str>, resume: Option<&[u8]>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/upload-resume")
        .header(header::CONTENT_TYPE, multipart_content_type())
        .body(Body::from(multipart_body(email, resume)))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_upload_route_returns_stored_profile() {
    let (app, _pool) = app_with(FakeGenerator::replying(&[JANE_REPLY])).await;

    let response = app
        .oneshot(upload_request(Some("a@b.com"), Some(b"Jane Doe ... skills: Go, SQL")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["email"], "a@b.com");
    assert_eq!(body["name"], "Jane Doe");
    assert_eq!(body["skills"], serde_json::json!(["Go", "SQL"]));
    assert!(body["uploadedAt"].is_string());
}

#[tokio::test]
async fn test_upload_route_without_file_is_bad_request() {
    let (app, _pool) = app_with(FakeGenerator::replying(&[JANE_REPLY])).await;

    let response = app.oneshot(upload_request(Some("a@b.com"), None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "No file uploaded");
    assert_eq!(body["kind"], "ValidationError");
}

#[tokio::test]
async fn test_upload_route_without_email_is_bad_request() {
    let (app, _pool) = app_with(FakeGenerator::replying(&[JANE_REPLY])).await;

    let response = app.oneshot(upload_request(None, Some(b"Jane"))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Email is required");
}

#[tokio::test]
async fn test_upload_route_surfaces_raw_text_on_format_error() {
    let (app, _pool) = app_with(FakeGenerator::replying(&["not json at all"])).await;

    let response = app
        .oneshot(upload_request(Some("a@b.com"), Some(b"Jane")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], "AI returned invalid JSON");
    assert_eq!(body["kind"], "ExtractionFormatError");
    assert_eq!(body["detail"], "not json at all");
}

#[tokio::test]
async fn test_upload_route_rejects_non_multipart_body() {
    let (app, _pool) = app_with(FakeGenerator::replying(&[JANE_REPLY])).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/upload-resume")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"email":"a@b.com"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["kind"], "ValidationError");
}

#[tokio::test]
async fn test_fetch_route_returns_profile_or_not_found() {
    let (app, pool) = app_with(FakeGenerator::replying(&[JANE_REPLY])).await;
    let store = ProfileStore::new(pool);
    store
        .upsert(
            "a@b.com",
            &crate::candidates::ProfileFields {
                name: "Jane Doe".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let found = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/resume/a@b.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(found.status(), StatusCode::OK);
    assert_eq!(json_body(found).await["name"], "Jane Doe");

    let missing = app
        .oneshot(
            Request::builder()
                .uri("/api/resume/ghost@b.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(missing).await["error"], "Resume not found");
}

#[tokio::test]
async fn test_list_route_requires_recruiter() {
    let (app, pool) = app_with(FakeGenerator::replying(&[JANE_REPLY])).await;
    ProfileStore::new(pool.clone())
        .upsert("a@b.com", &Default::default())
        .await
        .unwrap();

    let list = |auth: Option<String>| {
        let mut builder = Request::builder().uri("/api/resumes");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::empty()).unwrap()
    };

    let anonymous = app.clone().oneshot(list(None)).await.unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let candidate = seed_user_token(&pool, "cand@example.com", "candidate").await;
    let forbidden = app.clone().oneshot(list(Some(candidate))).await.unwrap();
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let recruiter = seed_user_token(&pool, "rec@example.com", "recruiter").await;
    let ok = app.oneshot(list(Some(recruiter))).await.unwrap();
    assert_eq!(ok.status(), StatusCode::OK);

    let body = json_body(ok).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["email"], "a@b.com");
    assert!(rows[0].get("summary").is_none());
}
