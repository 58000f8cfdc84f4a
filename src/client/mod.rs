//! Network seam for the request cache
//!
//! The cache never talks to reqwest directly. It hands an [`HttpRequest`] to a
//! [`Transport`] and interprets the [`HttpResponse`] itself, so tests can swap
//! in a scripted mock.

use async_trait::async_trait;
use reqwest::Method;

use crate::error::ApiError;

pub mod http;
#[cfg(test)]
pub mod mock;

pub use http::HttpTransport;
#[cfg(test)]
pub use mock::MockTransport;

/// Transport trait implemented by the real HTTP client and test doubles
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one network exchange.
    ///
    /// Returns `Err` only when no response was received at all. Non-success
    /// statuses come back as an `Ok` response for the caller to judge.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Per-call request configuration, mirroring standard fetch options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// HTTP method, GET when unset
    pub method: Option<Method>,

    /// Extra request headers
    pub headers: Vec<(String, String)>,

    /// Request body, sent as given
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Effective method
    pub fn method(&self) -> Method {
        self.method.clone().unwrap_or(Method::GET)
    }

    /// Body as used for keying, empty when absent
    pub fn body_str(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }
}

/// A fully resolved request handed to a [`Transport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn from_options(url: &str, options: &RequestOptions) -> Self {
        Self {
            method: options.method(),
            url: url.to_string(),
            headers: options.headers.clone(),
            body: options.body.clone(),
        }
    }
}

/// Raw response as received from the network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Status in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
