//! reqwest-backed transport

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;

use super::{HttpRequest, HttpResponse, Transport};
use crate::error::ApiError;

/// Default connection-level timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport that performs real HTTP exchanges
pub struct HttpTransport {
    http: HttpClient,
    timeout: Option<Duration>,
}

impl HttpTransport {
    /// Create a transport with the default timeout
    pub fn new() -> Result<Self, ApiError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a transport whose underlying client gives up after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self, ApiError> {
        Self::build(Some(timeout))
    }

    /// Create a transport with no client-side timeout
    pub fn unbounded() -> Result<Self, ApiError> {
        Self::build(None)
    }

    fn build(timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder =
            HttpClient::builder().user_agent(concat!("wardgate/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self { http, timeout })
    }

    /// Client-side expiry reports the same error as the cache's own timer
    fn map_error(&self, err: reqwest::Error) -> ApiError {
        match self.timeout {
            Some(limit) if err.is_timeout() => ApiError::Timeout(limit),
            _ => ApiError::from(err),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = self.http.request(request.method.clone(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| self.map_error(e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.map_error(e))?;

        log::debug!("{} {} -> {}", request.method, request.url, status);

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RequestOptions;
    use reqwest::Method;

    #[test]
    fn test_transport_creation() {
        assert!(HttpTransport::new().is_ok());
    }

    #[tokio::test]
    async fn test_send_returns_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/departments")
            .with_status(200)
            .with_body(r#"[{"id":1,"name":"Cardiology"}]"#)
            .create_async()
            .await;

        let transport = HttpTransport::new().unwrap();
        let url = format!("{}/api/departments", server.url());
        let response = transport
            .send(HttpRequest::from_options(&url, &RequestOptions::default()))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.status_text, "OK");
        assert!(String::from_utf8_lossy(&response.body).contains("Cardiology"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_passes_method_headers_and_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/settings")
            .match_header("x-ward", "icu")
            .match_body(r#"{"beds":12}"#)
            .with_status(201)
            .with_body("{}")
            .create_async()
            .await;

        let transport = HttpTransport::new().unwrap();
        let options = RequestOptions::new()
            .with_method(Method::POST)
            .with_header("x-ward", "icu")
            .with_body(r#"{"beds":12}"#);
        let url = format!("{}/api/settings", server.url());
        let response = transport
            .send(HttpRequest::from_options(&url, &options))
            .await
            .unwrap();

        assert_eq!(response.status, 201);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_error_status_is_not_transport_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/missing")
            .with_status(404)
            .create_async()
            .await;

        let transport = HttpTransport::new().unwrap();
        let url = format!("{}/api/missing", server.url());
        let response = transport
            .send(HttpRequest::from_options(&url, &RequestOptions::default()))
            .await
            .unwrap();

        assert_eq!(response.status, 404);
        assert_eq!(response.status_text, "Not Found");
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_send_connection_refused_is_transport_error() {
        let transport = HttpTransport::with_timeout(Duration::from_secs(2)).unwrap();
        let request = HttpRequest::from_options("http://127.0.0.1:9/", &RequestOptions::default());

        match transport.send(request).await {
            Err(ApiError::Transport(_)) => (),
            other => panic!("Expected ApiError::Transport, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_client_timeout_is_timeout_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept the connection and never answer
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let limit = Duration::from_millis(200);
        let transport = HttpTransport::with_timeout(limit).unwrap();
        let url = format!("http://{}/api/wards", addr);
        let result = transport
            .send(HttpRequest::from_options(&url, &RequestOptions::default()))
            .await;

        match result {
            Err(ApiError::Timeout(d)) => assert_eq!(d, limit),
            other => panic!("Expected ApiError::Timeout, got {:?}", other),
        }
        server.abort();
    }
}
