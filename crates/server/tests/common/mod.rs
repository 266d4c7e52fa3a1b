//! Common test utilities for API testing with a mock toolchain.
//!
//! Builds the real router in-process with [`MockToolchain`] injected, so the
//! browse, convert and upload endpoints run against a temp directory without
//! ffmpeg installed.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use clipsqueeze_core::testing::MockToolchain;
use clipsqueeze_core::{Config, Toolchain};
use clipsqueeze_server::state::AppState;

/// Re-export fixtures for test convenience
pub use clipsqueeze_core::testing::fixtures;

const BOUNDARY: &str = "clipsqueeze-test-boundary";

/// Test fixture wrapping an in-process router.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_browse_root() {
///     let fixture = TestFixture::new();
///     fixtures::video_file(fixture.root(), "a.mp4");
///
///     let response = fixture.get("/api/browse").await;
///     assert_eq!(response.body["items"][0]["name"], "a.mp4");
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock toolchain - script durations, exit codes, output creation
    pub toolchain: Arc<MockToolchain>,
    /// Configuration the router was built with
    pub config: Config,
    /// Holds the browser root, uploads and outputs
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a fixture whose browser root is a fresh temp directory.
    pub fn new() -> Self {
        Self::with_config(|_, _| {})
    }

    /// Create a fixture, letting the caller adjust the config first. The
    /// closure also receives the temp directory path.
    pub fn with_config(adjust: impl FnOnce(&mut Config, &Path)) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().join("media");
        std::fs::create_dir_all(&root).expect("Failed to create media dir");

        let mut config = Config::default();
        config.server.port = 0;
        config.browser.root = root;
        config.browser.uploads_dir = temp_dir.path().join("uploads");
        adjust(&mut config, temp_dir.path());

        let toolchain = Arc::new(MockToolchain::new());
        let state = Arc::new(AppState::new(
            config.clone(),
            Arc::clone(&toolchain) as Arc<dyn Toolchain>,
        ));
        let router = clipsqueeze_server::api::create_router(state);

        Self {
            router,
            toolchain,
            config,
            temp_dir,
        }
    }

    /// The directory listed by a browse request without a path.
    pub fn root(&self) -> &Path {
        &self.config.browser.root
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.config.browser.uploads_dir.clone()
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        self.send(request).await
    }

    /// Send a multipart POST with a single file field.
    pub async fn upload(
        &self,
        path: &str,
        field: &str,
        filename: &str,
        contents: &[u8],
    ) -> TestResponse {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(contents);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        self.post_multipart(path, body).await
    }

    /// Send a multipart POST with a raw, already encoded body.
    pub async fn post_multipart(&self, path: &str, body: Vec<u8>) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Multipart body holding one text field and no file.
    pub fn text_only_multipart(name: &str, value: &str) -> Vec<u8> {
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"{n}\"\r\n\r\n{v}\r\n--{b}--\r\n",
            b = BOUNDARY,
            n = name,
            v = value
        )
        .into_bytes()
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
