//! Test execution runner
//!
//! Runs calculator API checks one at a time.

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::http::{HttpClient, HttpRequest, HttpResponse};
use crate::models::{CalcCall, Target, TestCase, TestConfig, TestResult, TestRoundSummary};
use crate::tests;
use crate::utils::Timer;

/// Sequential test runner for the calculator API
pub struct TestRunner {
    config: TestConfig,
    client: HttpClient,
}

impl TestRunner {
    /// Create a new test runner
    pub fn new(config: TestConfig) -> Result<Self> {
        let client = HttpClient::with_timeout(config.timeout_secs)?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &TestConfig {
        &self.config
    }

    /// Label used in summaries
    fn service_label(&self) -> String {
        self.config.endpoints.label()
    }

    /// Run a single test case
    ///
    /// Never fails: transport errors become `Error` results.
    pub async fn run_test(&self, test_case: TestCase) -> TestResult {
        if self.config.skip_tests.contains(&test_case.number()) {
            return TestResult::skip(test_case, "Skipped by configuration");
        }

        info!("Running {}", test_case);

        match tests::run_test(test_case, &self.client, &self.config.endpoints).await {
            Ok(result) => result,
            Err(e) => {
                error!("Test {} failed with error: {:#}", test_case, e);
                TestResult::error(test_case, format!("{e:#}"))
            }
        }
    }

    /// Run all test cases sequentially
    pub async fn run_all(&self) -> Result<TestRoundSummary> {
        self.run_round(1, &TestCase::all()).await
    }

    /// Run specific test cases
    pub async fn run_tests(&self, test_cases: &[TestCase]) -> Result<TestRoundSummary> {
        info!("Running {} selected tests", test_cases.len());
        self.run_round(1, test_cases).await
    }

    /// Run multiple test rounds
    pub async fn run_rounds(&self, num_rounds: u32) -> Result<Vec<TestRoundSummary>> {
        self.run_rounds_of(num_rounds, &TestCase::all()).await
    }

    /// Run the given cases `num_rounds` times
    pub async fn run_rounds_of(
        &self,
        num_rounds: u32,
        test_cases: &[TestCase],
    ) -> Result<Vec<TestRoundSummary>> {
        info!(
            "Running {} rounds against {}",
            num_rounds,
            self.service_label()
        );

        let mut summaries = Vec::new();
        for round in 1..=num_rounds {
            info!("=== Round {}/{} ===", round, num_rounds);
            summaries.push(self.run_round(round, test_cases).await?);
        }

        Ok(summaries)
    }

    async fn run_round(&self, round: u32, test_cases: &[TestCase]) -> Result<TestRoundSummary> {
        let timer = Timer::start(format!("round {round}"));
        let mut results = Vec::new();

        for &test_case in test_cases {
            let result = self.run_test(test_case).await;
            info!("  {}", result);
            results.push(result);
        }

        let summary = TestRoundSummary::new(round, self.service_label(), results);

        info!(
            "Round {} completed in {}ms - Pass: {}/{} ({:.1}%)",
            round,
            timer.stop().as_millis(),
            summary.passed,
            summary.total,
            summary.pass_rate()
        );

        Ok(summary)
    }

    /// Issue an unchecked request against one of the targets
    pub async fn call(
        &self,
        target: Target,
        call: &CalcCall,
        headers: &[(String, String)],
    ) -> Result<HttpResponse> {
        let url = self.config.endpoints.url_for(target, &call.path());
        info!("Calling {} on {} ({})", call, target, url);

        let mut request = HttpRequest::get(&url);
        for (key, value) in headers {
            request = request.header(key, value);
        }

        self.client
            .send(request)
            .await
            .with_context(|| format!("Request to {url} failed"))
    }
}
