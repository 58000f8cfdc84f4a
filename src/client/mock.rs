//! Mock transport for testing
//!
//! Provides a scripted [`Transport`] so cache behavior can be exercised
//! without making real network calls.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use super::{HttpRequest, HttpResponse, Transport};
use crate::error::ApiError;

/// Mock transport for testing.
///
/// Configure responses via builder methods, then hand it to a cache.
///
/// # Example
/// ```ignore
/// let mock = MockTransport::new()
///     .with_json("https://api.test/wards", r#"[{"id":1}]"#)
///     .with_delay(Duration::from_millis(50));
///
/// let cache = RequestCache::new(mock, CachePolicy::default());
/// ```
#[derive(Default)]
pub struct MockTransport {
    /// Canned responses keyed by URL
    responses: Arc<Mutex<HashMap<String, HttpResponse>>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Simulated network latency
    delay: Option<Duration>,
    /// Never settle, simulating a stalled connection
    hang: bool,
    /// Number of exchanges performed
    call_count: Arc<Mutex<usize>>,
    /// Captured requests for test assertions
    captured_requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `url` with 200 and the given body
    pub fn with_json(self, url: &str, body: &str) -> Self {
        self.with_status(url, 200, "OK", body)
    }

    /// Respond to `url` with an arbitrary status
    pub fn with_status(self, url: &str, status: u16, status_text: &str, body: &str) -> Self {
        if let Ok(mut responses) = self.responses.try_lock() {
            responses.insert(
                url.to_string(),
                HttpResponse {
                    status,
                    status_text: status_text.to_string(),
                    body: body.as_bytes().to_vec(),
                },
            );
        }
        self
    }

    /// Fail the next exchange with `error`
    pub fn with_error(self, error: ApiError) -> Self {
        if let Ok(mut slot) = self.error.try_lock() {
            *slot = Some(error);
        }
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn hanging(mut self) -> Self {
        self.hang = true;
        self
    }

    /// Replace the body served for `url` after construction
    pub async fn set_json(&self, url: &str, body: &str) {
        self.responses.lock().await.insert(
            url.to_string(),
            HttpResponse {
                status: 200,
                status_text: "OK".to_string(),
                body: body.as_bytes().to_vec(),
            },
        );
    }

    /// Arm an error for the next exchange after construction
    pub async fn fail_next(&self, error: ApiError) {
        *self.error.lock().await = Some(error);
    }

    pub async fn call_count(&self) -> usize {
        *self.call_count.lock().await
    }

    pub async fn captured_requests(&self) -> Vec<HttpRequest> {
        self.captured_requests.lock().await.clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        *self.call_count.lock().await += 1;
        self.captured_requests.lock().await.push(request.clone());

        if self.hang {
            std::future::pending::<()>().await;
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.error.lock().await.take() {
            return Err(error);
        }

        let responses = self.responses.lock().await;
        Ok(responses
            .get(&request.url)
            .cloned()
            .unwrap_or_else(|| HttpResponse {
                status: 404,
                status_text: "Not Found".to_string(),
                body: Vec::new(),
            }))
    }
}
