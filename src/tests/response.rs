//! Exact response checks
//!
//! Tests 1-4: Add, Square Root, Multiply, Divide

use anyhow::Result;
use serde_json::json;
use tracing::{debug, info};

use crate::http::{HttpClient, HttpRequest};
use crate::models::{TestCase, TestResult};
use crate::utils::Timer;

/// Requires an exact status code and an exact body text
#[derive(Clone, Debug)]
pub struct ResponseCheck {
    pub test_case: TestCase,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub expected_status: u16,
    pub expected_body: String,
}

impl ResponseCheck {
    pub fn new(
        test_case: TestCase,
        url: impl Into<String>,
        expected_status: u16,
        expected_body: impl Into<String>,
    ) -> Self {
        Self {
            test_case,
            url: url.into(),
            headers: Vec::new(),
            expected_status,
            expected_body: expected_body.into(),
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Transport failures propagate to the caller
    pub async fn run(&self, client: &HttpClient) -> Result<TestResult> {
        info!("Running {} check", self.test_case.name());
        let timer = Timer::start(self.test_case.slug());

        let mut request = HttpRequest::get(&self.url);
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }

        let response = client.send(request).await?;
        let duration_ms = timer.elapsed_ms();

        debug!("{} -> {} {:?}", self.url, response.status_code, response.body);

        let details = json!({
            "url": self.url,
            "status": response.status_code,
            "body": response.body,
        });

        if response.status_code != self.expected_status {
            return Ok(TestResult::fail(
                self.test_case,
                duration_ms,
                format!(
                    "✗ {} expected status {} but got {}",
                    self.url, self.expected_status, response.status_code
                ),
            )
            .with_details(details));
        }

        if response.body != self.expected_body {
            return Ok(TestResult::fail(
                self.test_case,
                duration_ms,
                format!(
                    "✗ {} expected body {:?} but got {:?}",
                    self.url, self.expected_body, response.body
                ),
            )
            .with_details(details));
        }

        Ok(TestResult::pass(self.test_case, duration_ms)
            .with_message(format!("✓ {} -> {:?}", self.url, response.body))
            .with_details(details))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TestStatus;

    #[tokio::test]
    async fn test_matching_body_passes() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/calc/add/1/2")
            .with_status(200)
            .with_body("3")
            .create_async()
            .await;

        let client = HttpClient::with_timeout(2).unwrap();
        let url = format!("{}/calc/add/1/2", server.url());
        let result = ResponseCheck::new(TestCase::Add, &url, 200, "3")
            .run(&client)
            .await
            .unwrap();

        assert_eq!(result.status, TestStatus::Pass);
        assert_eq!(result.observed(), Some((200, "3")));
    }

    #[tokio::test]
    async fn test_integer_body_fails_float_division() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/calc/divide/8/2")
            .with_status(200)
            .with_body("4")
            .create_async()
            .await;

        let client = HttpClient::with_timeout(2).unwrap();
        let url = format!("{}/calc/divide/8/2", server.url());
        let result = ResponseCheck::new(TestCase::Divide, &url, 200, "4.0")
            .run(&client)
            .await
            .unwrap();

        assert_eq!(result.status, TestStatus::Fail);
        let message = result.message.unwrap();
        assert!(message.contains(&url));
        assert!(message.contains("\"4.0\""));
        assert!(message.contains("\"4\""));
    }

    #[tokio::test]
    async fn test_body_is_not_trimmed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/calc/multiply/3/4")
            .with_status(200)
            .with_body("12\n")
            .create_async()
            .await;

        let client = HttpClient::with_timeout(2).unwrap();
        let url = format!("{}/calc/multiply/3/4", server.url());
        let result = ResponseCheck::new(TestCase::Multiply, &url, 200, "12")
            .run(&client)
            .await
            .unwrap();

        assert_eq!(result.status, TestStatus::Fail);
    }

    #[tokio::test]
    async fn test_wrong_status_fails() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/calc/sqrt/64")
            .with_status(500)
            .with_body("8")
            .create_async()
            .await;

        let client = HttpClient::with_timeout(2).unwrap();
        let url = format!("{}/calc/sqrt/64", server.url());
        let result = ResponseCheck::new(TestCase::Sqrt, &url, 200, "8")
            .run(&client)
            .await
            .unwrap();

        assert_eq!(result.status, TestStatus::Fail);
        assert!(result.message.unwrap().contains("expected status 200 but got 500"));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let client = HttpClient::with_timeout(2).unwrap();
        let result = ResponseCheck::new(TestCase::Add, "http://127.0.0.1:9/calc/add/1/2", 200, "3")
            .run(&client)
            .await;

        assert!(result.is_err());
    }
}
