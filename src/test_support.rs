// src/test_support.rs
//! Shared fixtures for unit and router tests

use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::candidates::ingestion::{IngestionError, ResumeIngestor, TextExtractor};
use crate::candidates::store::ProfileStore;
use crate::common::dev_mode::DevModeConfig;
use crate::common::migrations::create_schema;
use crate::common::{AppConfig, AppState};
use crate::services::{GeminiConfig, GenerationError, TextGenerator};

pub const TEST_JWT_SECRET: &str = "test-secret";
pub const ADMIN_EMAIL: &str = "admin@example.com";

/// Single-connection in-memory database with the schema applied
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    create_schema(&pool).await.expect("schema");
    pool
}

pub enum FakeReply {
    Text(String),
    Unavailable,
}

/// Replays queued replies in order; the last reply repeats once the queue drains
pub struct FakeGenerator {
    replies: Mutex<VecDeque<FakeReply>>,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn replying(texts: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(
                texts
                    .iter()
                    .map(|t| FakeReply::Text(t.to_string()))
                    .collect(),
            ),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn unavailable() -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::from([FakeReply::Unavailable])),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        let mut replies = self.replies.lock().unwrap();
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().map(|r| match r {
                FakeReply::Text(t) => FakeReply::Text(t.clone()),
                FakeReply::Unavailable => FakeReply::Unavailable,
            })
        };

        match reply {
            Some(FakeReply::Text(text)) => Ok(text),
            Some(FakeReply::Unavailable) | None => Err(GenerationError::Api {
                status: 503,
                body: "service unavailable".to_string(),
            }),
        }
    }
}

/// Treats the uploaded bytes as UTF-8 resume text; `FAIL` fails like a bad PDF
pub struct FakeExtractor;

impl TextExtractor for FakeExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, IngestionError> {
        if bytes == b"FAIL" {
            return Err(IngestionError::DocumentParse("not a PDF".to_string()));
        }
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        port: 0,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        admin_emails: HashSet::from([ADMIN_EMAIL.to_string()]),
        cors_origins: vec!["http://localhost:3000".to_string()],
        max_upload_bytes: 1024 * 1024,
        gemini: GeminiConfig {
            api_key: None,
            timeout: Duration::from_secs(1),
            ..GeminiConfig::default()
        },
    }
}

pub fn test_state(pool: SqlitePool, generator: Arc<dyn TextGenerator>) -> Arc<AppState> {
    let profile_store = ProfileStore::new(pool.clone());
    let resume_ingestor = Arc::new(ResumeIngestor::new(
        Arc::new(FakeExtractor),
        generator,
        profile_store.clone(),
    ));

    Arc::new(AppState {
        db: pool,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        admin_emails: test_config().admin_emails,
        dev_mode: DevModeConfig::default(),
        profile_store,
        resume_ingestor,
    })
}

pub const MULTIPART_BOUNDARY: &str = "----jobboard-test-boundary";

/// Hand-built `multipart/form-data` body with optional `email` and `resume` parts
pub fn multipart_body(email: Option<&str>, resume: Option<&[u8]>) -> Vec<u8> {
    let mut body = Vec::new();

    if let Some(email) = email {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"email\"\r\n\r\n{}\r\n",
                MULTIPART_BOUNDARY, email
            )
            .as_bytes(),
        );
    }

    if let Some(resume) = resume {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"resume.pdf\"\r\nContent-Type: application/pdf\r\n\r\n",
                MULTIPART_BOUNDARY
            )
            .as_bytes(),
        );
        body.extend_from_slice(resume);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY)
}

/// Insert a user directly and return a bearer token for it
pub async fn seed_user_token(pool: &SqlitePool, email: &str, role: &str) -> String {
    let user = crate::auth::User {
        id: crate::common::generate_user_id(),
        email: email.to_string(),
        password_hash: "unused".to_string(),
        role: role.to_string(),
        created_at: None,
    };

    sqlx::query("INSERT INTO users (id, email, password_hash, role) VALUES (?, ?, ?, ?)")
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.role)
        .execute(pool)
        .await
        .expect("seed user");

    let token = crate::auth::handlers::issue_token(&user, TEST_JWT_SECRET).expect("token");
    format!("Bearer {}", token)
}

/// One-page PDF showing `text` in Helvetica, with a correct xref table
pub fn minimal_pdf(text: &str) -> Vec<u8> {
    let content = format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET", text);
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
        format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len(),
            content
        ),
    ];

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref_at = pdf.len();
    pdf.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    pdf.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        pdf.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_at
        )
        .as_bytes(),
    );
    pdf
}
