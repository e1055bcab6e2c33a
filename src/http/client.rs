//! HTTP client for calculator API testing
//!
//! Thin wrapper over reqwest with a fixed per-request timeout and typed
//! transport errors.

use anyhow::{Context, Result};
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::utils::Timer;

/// HTTP client errors
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Connection refused to {0}")]
    ConnectionRefused(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP {code} from {url}")]
    Status { code: u16, url: String, body: String },
}

impl HttpError {
    /// Status code carried by the error, if it came from an HTTP response
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// HTTP client for testing
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    timeout_secs: u64,
}

impl HttpClient {
    /// Create client with the given per-request timeout
    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }

    /// Send HTTP request
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = request.url;
        debug!("Sending {} request to {}", request.method, url);

        let method =
            Method::from_bytes(request.method.as_bytes()).context("Invalid HTTP method")?;

        let mut req_builder = self.client.request(method, &url);

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key.as_str(), value.as_str());
        }

        let timer = Timer::start(format!("{} {url}", request.method));

        let response = req_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                anyhow::anyhow!(HttpError::Timeout(self.timeout_secs))
            } else if e.is_connect() {
                anyhow::anyhow!(HttpError::ConnectionRefused(url.clone()))
            } else if e.is_builder() {
                anyhow::anyhow!(HttpError::InvalidUrl(url.clone()))
            } else {
                anyhow::anyhow!(HttpError::RequestFailed(e.to_string()))
            }
        })?;

        let status = response.status();

        let mut headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(key.to_string(), v.to_string());
            }
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {url}"))?;

        let duration_ms = timer.elapsed_ms();

        debug!(
            "Response: {} {} in {}ms",
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            duration_ms
        );

        Ok(HttpResponse {
            url,
            status_code: status.as_u16(),
            headers,
            body,
            duration_ms,
        })
    }
}

/// HTTP request builder
#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub method: String,
    pub url: String,
    pub headers: HashMap<String, String>,
}

impl HttpRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: HashMap::new(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

/// HTTP response
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpResponse {
    pub url: String,
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub duration_ms: u64,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers.get(&name.to_lowercase())
    }

    /// Split into a normal response or an HTTP error carrying the status
    pub fn error_for_status(self) -> std::result::Result<Self, HttpError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(HttpError::Status {
                code: self.status_code,
                url: self.url,
                body: self.body,
            })
        }
    }
}
