//! Shared test harness: a router over a temporary storage directory.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use image_api::{app, config::Settings, ServerState};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const API_KEY: &str = "abc123";
pub const ONE_MB: usize = 1 << 20;

pub struct TestServer {
    pub router: Router,
    pub dir: TempDir,
}

impl TestServer {
    /// `API_KEYS=abc123`, `MAX_FILE_SIZE_MB=1`
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let settings = Settings::new("8888", ONE_MB as u64, [API_KEY]);
        let router = app(ServerState::new(settings, dir.path()));
        TestServer { router, dir }
    }

    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        names
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, body.to_vec())
    }

    pub async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, _, body) = self.send(request).await;
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn upload(
        &self,
        api_key: Option<&str>,
        content_type: &str,
        data: Vec<u8>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/new")
            .header("Content-Type", content_type);
        if let Some(key) = api_key {
            builder = builder.header("X-API-Key", key);
        }
        self.send_json(builder.body(Body::from(data)).unwrap()).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }
}

/// Bytes starting with the PNG signature, padded to `len`.
pub fn png_like(len: usize) -> Vec<u8> {
    let mut data = vec![0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];
    data.extend((0..len.saturating_sub(data.len())).map(|i| (i % 251) as u8));
    data.truncate(len);
    data
}
