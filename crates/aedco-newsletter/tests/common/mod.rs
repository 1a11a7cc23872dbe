//! Shared helpers for router tests

#![allow(dead_code)]

use aedco_newsletter::{
    config::{NewsletterConfig, StorageConfig},
    server::NewsletterServer,
    Completion, Error, LlmProvider, Result, Usage,
};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub const TWO_EDITIONS: &str = "Principals below.\n\
<!DOCTYPE html>\n<html><body><h1>Principals</h1></body></html>\n\
Egyptian Clients below.\n\
<!DOCTYPE html>\n<html><body><h1>Egyptian Clients</h1></body></html>\n";

/// Canned LLM that records every prompt it receives
pub struct MockProvider {
    reply: std::result::Result<String, String>,
    prompts: Mutex<Vec<(String, String)>>,
}

impl MockProvider {
    pub fn replying(content: &str) -> Self {
        Self {
            reply: Ok(content.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Fails every call as if retries were exhausted
    pub fn unavailable() -> Self {
        Self {
            reply: Err("429 Too Many Requests".to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// (system, user) pairs in call order
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn complete(&self, system: &str, user: &str) -> Result<Completion> {
        self.prompts.lock().push((system.to_string(), user.to_string()));
        match &self.reply {
            Ok(content) => Ok(Completion {
                content: content.clone(),
                usage: Usage {
                    prompt_tokens: 1200,
                    completion_tokens: 3400,
                    total_tokens: 4600,
                },
            }),
            Err(message) => Err(Error::LlmUnavailable(message.clone())),
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.reply.is_ok())
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}

pub struct TestApp {
    pub router: Router,
    pub provider: Arc<MockProvider>,
    pub dir: TempDir,
}

/// Router over a fresh base directory with prompt files for every sector
pub fn test_app(provider: MockProvider) -> TestApp {
    let dir = TempDir::new().expect("temp dir");
    let storage = StorageConfig::rooted_at(dir.path().to_path_buf());
    std::fs::create_dir_all(&storage.prompts_dir).expect("prompts dir");
    for name in ["OilGas", "Transportation", "Electricity"] {
        std::fs::write(
            storage.prompts_dir.join(format!("{}.txt", name)),
            format!("Research the {} sector in Egypt.\nSubject: weekly email\n", name),
        )
        .expect("prompt file");
    }

    let config = NewsletterConfig {
        storage,
        ..Default::default()
    };
    let provider = Arc::new(provider);
    let server = NewsletterServer::with_provider(config, provider.clone()).expect("server");
    TestApp {
        router: server.build_router(),
        provider,
        dir,
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    (status, headers, bytes.to_vec())
}

pub async fn json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let (status, _, bytes) = send(app, request).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

/// Multipart form with text fields and an optional file part
pub fn multipart_form(uri: &str, fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Request<Body> {
    let boundary = "aedco-test-boundary";
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some((filename, content)) = file {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
                filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: text/plain\r\n\r\n");
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .expect("request")
}
