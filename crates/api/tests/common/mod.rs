#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use wonders_api::auth::ensure_bootstrap_admin;
use wonders_api::auth::jwt::JwtConfig;
use wonders_api::config::{BlobConfig, BootstrapAdmin, ServerConfig};
use wonders_api::router::build_app_router;
use wonders_api::state::AppState;
use wonders_api::storage::{BlobError, BlobStore, LocalBlobStore};
use wonders_db::{MemoryAccountStore, MemoryInquiryStore};
use wonders_events::EventBus;

pub const OPERATOR_USERNAME: &str = "operator";
pub const OPERATOR_PASSWORD: &str = "operator-password";

/// Build a test `ServerConfig` with safe defaults and blobs under `blob_root`.
pub fn test_config(blob_root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_url: None,
        blob: BlobConfig {
            root: blob_root.to_path_buf(),
            public_base_url: "/files".to_string(),
        },
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
            author_grant_expiry_mins: 30,
        },
        bootstrap_admin: Some(BootstrapAdmin {
            username: OPERATOR_USERNAME.to_string(),
            email: "operator@example.com".to_string(),
            password: OPERATOR_PASSWORD.to_string(),
        }),
    }
}

/// The application under test plus handles on its in-memory collaborators.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub inquiries: Arc<MemoryInquiryStore>,
    pub accounts: Arc<MemoryAccountStore>,
    pub event_bus: Arc<EventBus>,
    pub blob_root: PathBuf,
    _blob_dir: TempDir,
}

/// Full router (same middleware stack as production) on in-memory stores
/// and a temporary blob directory.
pub fn build_test_app() -> TestApp {
    build_with_blobs(|root| Arc::new(LocalBlobStore::new(root, "/files")) as Arc<dyn BlobStore>)
}

/// Like [`build_test_app`] but with a custom blob store built over the
/// temporary directory.
pub fn build_with_blobs(make_blobs: impl FnOnce(&Path) -> Arc<dyn BlobStore>) -> TestApp {
    let blob_dir = tempfile::tempdir().expect("tempdir should be created");
    let blob_root = blob_dir.path().to_path_buf();
    let config = test_config(&blob_root);

    let inquiries = Arc::new(MemoryInquiryStore::new());
    let accounts = Arc::new(MemoryAccountStore::new());
    let event_bus = Arc::new(EventBus::default());

    let state = AppState {
        inquiries: inquiries.clone(),
        accounts: accounts.clone(),
        blobs: make_blobs(&blob_root),
        config: Arc::new(config.clone()),
        event_bus: event_bus.clone(),
    };

    TestApp {
        router: build_app_router(state.clone(), &config),
        state,
        inquiries,
        accounts,
        event_bus,
        blob_root,
        _blob_dir: blob_dir,
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone()
        .oneshot(request)
        .await
        .expect("router should not fail")
}

pub async fn request(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    headers: &[(&str, &str)],
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    send(app, builder.body(body).unwrap()).await
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    request(app, Method::GET, uri, None, &[]).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    let bearer = format!("Bearer {token}");
    request(app, Method::GET, uri, None, &[(AUTHORIZATION.as_str(), bearer.as_str())]).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    request(app, Method::POST, uri, Some(body), &[]).await
}

pub async fn put_json_auth(app: &Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    let bearer = format!("Bearer {token}");
    request(
        app,
        Method::PUT,
        uri,
        Some(body),
        &[(AUTHORIZATION.as_str(), bearer.as_str())],
    )
    .await
}

pub async fn put_json_grant(app: &Router, uri: &str, body: Value, grant: &str) -> Response<Body> {
    request(app, Method::PUT, uri, Some(body), &[("x-author-grant", grant)]).await
}

pub async fn delete_grant(app: &Router, uri: &str, grant: &str) -> Response<Body> {
    request(app, Method::DELETE, uri, None, &[("x-author-grant", grant)]).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A valid submission body.
pub fn submission(title: &str, is_public: bool) -> Value {
    let mut body = json!({
        "title": title,
        "content": "What are your opening hours?",
        "category": "general",
        "author_name": "Alice",
        "author_email": "alice@example.com",
        "is_public": is_public,
    });
    if !is_public {
        body["access_secret"] = json!("1234");
    }
    body
}

/// Submit through the API and return the created view (`data`).
pub async fn create_inquiry(app: &Router, body: Value) -> Value {
    let response = post_json(app, "/api/v1/wonders", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

/// Ensure the bootstrap operator exists and log in as them.
pub async fn operator_token(app: &TestApp) -> String {
    let admin = app
        .state
        .config
        .bootstrap_admin
        .clone()
        .expect("test config has a bootstrap operator");
    ensure_bootstrap_admin(app.accounts.as_ref(), &admin)
        .await
        .expect("bootstrap should succeed");
    login(&app.router, OPERATOR_USERNAME, OPERATOR_PASSWORD).await
}

/// Log in and return the access token.
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "username": username, "password": password }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["access_token"]
        .as_str()
        .expect("access_token should be a string")
        .to_string()
}

/// Verify as the author and return the grant token.
pub async fn author_grant(app: &Router, id: &str, email: &str, secret: Option<&str>) -> String {
    let response = post_json(
        app,
        &format!("/api/v1/wonders/{id}/verify"),
        json!({ "author_email": email, "access_secret": secret }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]["grant"]
        .as_str()
        .expect("grant should be a string")
        .to_string()
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

pub struct TestImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl TestImage {
    pub fn png(file_name: &str, size: usize) -> Self {
        Self {
            file_name: file_name.to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0x89; size],
        }
    }
}

const BOUNDARY: &str = "wonders-test-boundary";

/// `POST /api/v1/wonders/upload` with a JSON payload and image parts.
pub fn multipart_request(payload: &Value, images: &[TestImage]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"payload\"\r\n\
             Content-Type: application/json\r\n\r\n{payload}\r\n"
        )
        .as_bytes(),
    );
    for image in images {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"images\"; \
                 filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                image.file_name, image.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(&image.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/api/v1/wonders/upload")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Number of regular files anywhere under `dir`.
pub fn count_files(dir: &Path) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .filter_map(Result::ok)
        .map(|entry| {
            let path = entry.path();
            if path.is_dir() {
                count_files(&path)
            } else {
                1
            }
        })
        .sum()
}

// ---------------------------------------------------------------------------
// Blob store that fails on demand
// ---------------------------------------------------------------------------

/// Local store whose `n`-th `put` (0-based) fails. Records every delete.
pub struct FlakyBlobStore {
    inner: LocalBlobStore,
    fail_on_put: usize,
    puts: AtomicUsize,
    pub deleted: Mutex<Vec<String>>,
}

impl FlakyBlobStore {
    pub fn new(root: &Path, fail_on_put: usize) -> Self {
        Self {
            inner: LocalBlobStore::new(root, "/files"),
            fail_on_put,
            puts: AtomicUsize::new(0),
            deleted: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl BlobStore for FlakyBlobStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<String, BlobError> {
        if self.puts.fetch_add(1, Ordering::SeqCst) == self.fail_on_put {
            return Err(BlobError::Io(std::io::Error::other("disk full")));
        }
        self.inner.put(key, bytes, content_type).await
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        self.deleted.lock().unwrap().push(key.to_string());
        self.inner.delete(key).await
    }
}
