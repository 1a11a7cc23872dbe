//! OpenAI chat completions client
//!
//! Rate limiting, server errors and transport failures are retried with
//! exponential backoff. Any other non-success status fails immediately.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

use super::llm::{Completion, LlmProvider, Usage};
use crate::config::OpenAiConfig;
use crate::error::{Error, Result};

/// Chat completions client
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    max_retries: u32,
    base_delay: Duration,
}

impl OpenAiClient {
    /// Create a client from configuration
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            max_retries: config.max_retries,
            base_delay: Duration::from_secs(1),
        })
    }

    /// Override the first backoff delay; later retries double it
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    async fn send_once(&self, request: &ChatRequest<'_>) -> Attempt {
        let response = match self
            .client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Attempt::Retry(format!("OpenAI request failed: {}", e)),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = format!("OpenAI request failed ({}): {}", status, body);
            return if is_retryable(status) {
                Attempt::Retry(message)
            } else {
                Attempt::Fail(Error::Llm(message))
            };
        }

        match response.json::<ChatResponse>().await {
            Ok(parsed) => Attempt::Done(parsed),
            Err(e) => Attempt::Fail(Error::Llm(format!(
                "Failed to parse OpenAI response: {}",
                e
            ))),
        }
    }
}

/// 429 and 5xx are worth another try
fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

enum Attempt {
    Done(ChatResponse),
    Retry(String),
    Fail(Error),
}

#[derive(serde::Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(serde::Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(serde::Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Usage,
}

#[derive(serde::Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(serde::Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl LlmProvider for OpenAiClient {
    async fn complete(&self, system: &str, user: &str) -> Result<Completion> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let mut attempt = 0;
        let response = loop {
            match self.send_once(&request).await {
                Attempt::Done(response) => break response,
                Attempt::Fail(e) => return Err(e),
                Attempt::Retry(message) if attempt < self.max_retries => {
                    let delay = self.backoff(attempt);
                    tracing::warn!(
                        "{} (attempt {}/{}), retrying in {:?}",
                        message,
                        attempt + 1,
                        self.max_retries + 1,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Attempt::Retry(message) => return Err(Error::LlmUnavailable(message)),
            }
        };

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::llm("No content in OpenAI response"))?;

        tracing::info!(
            "OpenAI completion: {} prompt + {} completion tokens",
            response.usage.prompt_tokens,
            response.usage.completion_tokens
        );

        Ok(Completion {
            content,
            usage: response.usage,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        match self
            .client
            .get(self.endpoint("models"))
            .bearer_auth(&self.api_key)
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                tracing::debug!("OpenAI health check failed: {}", e);
                Ok(false)
            }
        }
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode as AxumStatus, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Serve `/v1/chat/completions`, failing with `status` for the first
    /// `failures` calls
    async fn mock_api(failures: usize, status: AxumStatus) -> (String, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let app = Router::new().route(
            "/v1/chat/completions",
            post(move |Json(body): Json<Value>| {
                let counter = counter.clone();
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    if n < failures {
                        return (status, Json(json!({"error": "busy"})));
                    }
                    assert_eq!(body["messages"][0]["role"], "system");
                    (
                        AxumStatus::OK,
                        Json(json!({
                            "choices": [{"message": {"role": "assistant", "content": "<!DOCTYPE html><html></html>"}}],
                            "usage": {"prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30}
                        })),
                    )
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), calls)
    }

    fn client(base_url: String, max_retries: u32) -> OpenAiClient {
        let config = OpenAiConfig {
            api_key: "test-key".to_string(),
            base_url,
            max_retries,
            timeout_secs: 5,
            ..Default::default()
        };
        OpenAiClient::new(&config)
            .unwrap()
            .with_base_delay(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_retries_rate_limits_then_succeeds() {
        let (url, calls) = mock_api(2, AxumStatus::TOO_MANY_REQUESTS).await;
        let completion = client(url, 3).complete("sys", "user").await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(completion.content, "<!DOCTYPE html><html></html>");
        assert_eq!(completion.usage.total_tokens, 30);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let (url, calls) = mock_api(10, AxumStatus::BAD_GATEWAY).await;
        let err = client(url, 2).complete("sys", "user").await.unwrap_err();

        assert!(matches!(err, Error::LlmUnavailable(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let (url, calls) = mock_api(10, AxumStatus::UNAUTHORIZED).await;
        let err = client(url, 3).complete("sys", "user").await.unwrap_err();

        assert!(matches!(err, Error::Llm(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backoff_doubles() {
        let client = client("http://localhost".to_string(), 3).with_base_delay(Duration::from_secs(1));
        assert_eq!(client.backoff(0), Duration::from_secs(1));
        assert_eq!(client.backoff(2), Duration::from_secs(4));
    }
}
