//! Calculator API test implementations
//!
//! ## Test Cases
//!
//! | # | Case           | Target  | Request               | Expected        |
//! |---|----------------|---------|-----------------------|-----------------|
//! | 1 | Add            | primary | `/calc/add/1/2`       | 200 `"3"`       |
//! | 2 | Square Root    | mock    | `/calc/sqrt/64`       | 200 `"8"`       |
//! | 3 | Multiply       | primary | `/calc/multiply/3/4`  | 200 `"12"`      |
//! | 4 | Divide         | primary | `/calc/divide/8/2`    | 200 `"4.0"`     |
//! | 5 | Divide by Zero | primary | `/calc/divide/8/0`    | HTTP error 406  |

mod response;

pub use error_status::ErrorStatusCheck;
pub use response::ResponseCheck;

use anyhow::Result;

use crate::http::HttpClient;
use crate::models::{Expectation, ServiceEndpoints, TestCase, TestResult};

/// Run a specific test case
pub async fn run_test(
    test_case: TestCase,
    client: &HttpClient,
    endpoints: &ServiceEndpoints,
) -> Result<TestResult> {
    let url = endpoints.url_for(test_case.target(), &test_case.call().path());

    match test_case.expectation() {
        Expectation::Body { status, body } => {
            let mut check = ResponseCheck::new(test_case, url, status, body);
            for (key, value) in test_case.headers() {
                check = check.header(key, value);
            }
            check.run(client).await
        }
        Expectation::ErrorStatus { status } => {
            let mut check = ErrorStatusCheck::new(test_case, url, status);
            for (key, value) in test_case.headers() {
                check = check.header(key, value);
            }
            check.run(client).await
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::models::TestStatus;

    #[tokio::test]
    async fn test_sqrt_goes_to_mock() {
        let mut primary = mockito::Server::new_async().await;
        let mut mock = mockito::Server::new_async().await;

        let primary_hit = primary
            .mock("GET", "/calc/sqrt/64")
            .expect(0)
            .create_async()
            .await;
        let mock_hit = mock
            .mock("GET", "/calc/sqrt/64")
            .with_status(200)
            .with_body("8")
            .create_async()
            .await;

        let client = HttpClient::with_timeout(2).unwrap();
        let endpoints = ServiceEndpoints::new(primary.url(), mock.url());
        let result = run_test(TestCase::Sqrt, &client, &endpoints).await.unwrap();

        assert_eq!(result.status, TestStatus::Pass);
        primary_hit.assert_async().await;
        mock_hit.assert_async().await;
    }

    #[tokio::test]
    async fn test_divide_by_zero_sends_accept() {
        let mut primary = mockito::Server::new_async().await;
        let hit = primary
            .mock("GET", "/calc/divide/8/0")
            .match_header("accept", "*/*")
            .with_status(406)
            .create_async()
            .await;

        let client = HttpClient::with_timeout(2).unwrap();
        let endpoints = ServiceEndpoints::new(primary.url(), "http://127.0.0.1:9");
        let result = run_test(TestCase::DivideByZero, &client, &endpoints)
            .await
            .unwrap();

        assert_eq!(result.status, TestStatus::Pass);
        hit.assert_async().await;
    }
}
