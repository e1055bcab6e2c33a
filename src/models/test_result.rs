//! Test result models for calculator API testing
//!
//! Defines test cases, expectations, results, and status types.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::calc::{CalcCall, CalcOp};
use super::service::Target;

/// The five calculator API checks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestCase {
    Add,
    Sqrt,
    Multiply,
    Divide,
    DivideByZero,
}

impl TestCase {
    /// Get test case number (1-5)
    pub fn number(&self) -> u8 {
        match self {
            TestCase::Add => 1,
            TestCase::Sqrt => 2,
            TestCase::Multiply => 3,
            TestCase::Divide => 4,
            TestCase::DivideByZero => 5,
        }
    }

    /// Get test case name
    pub fn name(&self) -> &'static str {
        match self {
            TestCase::Add => "Add",
            TestCase::Sqrt => "Square Root",
            TestCase::Multiply => "Multiply",
            TestCase::Divide => "Divide",
            TestCase::DivideByZero => "Divide by Zero",
        }
    }

    /// Short identifier accepted on the command line
    pub fn slug(&self) -> &'static str {
        match self {
            TestCase::Add => "add",
            TestCase::Sqrt => "sqrt",
            TestCase::Multiply => "multiply",
            TestCase::Divide => "divide",
            TestCase::DivideByZero => "divide_by_zero",
        }
    }

    pub fn target(&self) -> Target {
        match self {
            TestCase::Sqrt => Target::Mock,
            _ => Target::Primary,
        }
    }

    pub fn call(&self) -> CalcCall {
        match self {
            TestCase::Add => CalcCall::binary(CalcOp::Add, "1", "2"),
            TestCase::Sqrt => CalcCall::unary(CalcOp::Sqrt, "64"),
            TestCase::Multiply => CalcCall::binary(CalcOp::Multiply, "3", "4"),
            TestCase::Divide => CalcCall::binary(CalcOp::Divide, "8", "2"),
            TestCase::DivideByZero => CalcCall::binary(CalcOp::Divide, "8", "0"),
        }
    }

    /// Extra request headers
    pub fn headers(&self) -> Vec<(&'static str, &'static str)> {
        match self {
            // Drives the service through its content negotiation error path
            TestCase::DivideByZero => vec![("Accept", "*/*")],
            _ => Vec::new(),
        }
    }

    pub fn expectation(&self) -> Expectation {
        match self {
            TestCase::Add => Expectation::body(200, "3"),
            TestCase::Sqrt => Expectation::body(200, "8"),
            TestCase::Multiply => Expectation::body(200, "12"),
            TestCase::Divide => Expectation::body(200, "4.0"),
            TestCase::DivideByZero => Expectation::error_status(406),
        }
    }

    /// Get all test cases
    pub fn all() -> Vec<TestCase> {
        vec![
            TestCase::Add,
            TestCase::Sqrt,
            TestCase::Multiply,
            TestCase::Divide,
            TestCase::DivideByZero,
        ]
    }

    /// Parse from test number
    pub fn from_number(n: u8) -> Option<TestCase> {
        match n {
            1 => Some(TestCase::Add),
            2 => Some(TestCase::Sqrt),
            3 => Some(TestCase::Multiply),
            4 => Some(TestCase::Divide),
            5 => Some(TestCase::DivideByZero),
            _ => None,
        }
    }

    /// Parse from a test number or slug
    pub fn from_str(s: &str) -> Option<TestCase> {
        if let Ok(n) = s.trim().parse::<u8>() {
            return Self::from_number(n);
        }
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::all().into_iter().find(|tc| tc.slug() == normalized)
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Test {}: {}", self.number(), self.name())
    }
}

/// What a check requires of the response
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expectation {
    /// Exact status code and exact body text
    Body { status: u16, body: String },
    /// An HTTP error response carrying this status
    ErrorStatus { status: u16 },
}

impl Expectation {
    pub fn body(status: u16, body: impl Into<String>) -> Self {
        Expectation::Body {
            status,
            body: body.into(),
        }
    }

    pub fn error_status(status: u16) -> Self {
        Expectation::ErrorStatus { status }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Body { status, body } => write!(f, "{status} {body:?}"),
            Expectation::ErrorStatus { status } => write!(f, "HTTP error {status}"),
        }
    }
}

/// Test execution status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Fail,
    Skip,
    Error,
}

impl TestStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            TestStatus::Pass => "✓",
            TestStatus::Fail => "✗",
            TestStatus::Skip => "○",
            TestStatus::Error => "!",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Pass => write!(f, "PASS"),
            TestStatus::Fail => write!(f, "FAIL"),
            TestStatus::Skip => write!(f, "SKIP"),
            TestStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Result of a single test execution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestResult {
    pub test_case: TestCase,
    pub status: TestStatus,
    pub duration_ms: u64,
    pub message: Option<String>,
    pub details: Option<serde_json::Value>,
}

impl TestResult {
    pub fn pass(test_case: TestCase, duration_ms: u64) -> Self {
        Self {
            test_case,
            status: TestStatus::Pass,
            duration_ms,
            message: None,
            details: None,
        }
    }

    pub fn fail(test_case: TestCase, duration_ms: u64, message: impl Into<String>) -> Self {
        Self {
            test_case,
            status: TestStatus::Fail,
            duration_ms,
            message: Some(message.into()),
            details: None,
        }
    }

    pub fn skip(test_case: TestCase, reason: impl Into<String>) -> Self {
        Self {
            test_case,
            status: TestStatus::Skip,
            duration_ms: 0,
            message: Some(reason.into()),
            details: None,
        }
    }

    pub fn error(test_case: TestCase, error: impl Into<String>) -> Self {
        Self {
            test_case,
            status: TestStatus::Error,
            duration_ms: 0,
            message: Some(error.into()),
            details: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Status code and body observed on the wire, if the request completed
    pub fn observed(&self) -> Option<(u16, &str)> {
        let details = self.details.as_ref()?;
        let status = details.get("status")?.as_u64()?;
        let body = details.get("body")?.as_str()?;
        Some((status as u16, body))
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}ms]",
            self.status.symbol(),
            self.test_case,
            self.duration_ms
        )?;
        if let Some(msg) = &self.message {
            write!(f, " - {msg}")?;
        }
        Ok(())
    }
}

/// Summary of test round execution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestRoundSummary {
    pub round: u32,
    pub service: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errors: usize,
    pub total_duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl TestRoundSummary {
    pub fn new(round: u32, service: impl Into<String>, results: Vec<TestResult>) -> Self {
        let count = |status: TestStatus| results.iter().filter(|r| r.status == status).count();

        let total = results.len();
        let passed = count(TestStatus::Pass);
        let failed = count(TestStatus::Fail);
        let skipped = count(TestStatus::Skip);
        let errors = count(TestStatus::Error);
        let total_duration_ms = results.iter().map(|r| r.duration_ms).sum();

        Self {
            round,
            service: service.into(),
            total,
            passed,
            failed,
            skipped,
            errors,
            total_duration_ms,
            results,
        }
    }

    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    /// No case failed or errored; skipped cases do not count against the round
    pub fn is_all_passed(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

impl fmt::Display for TestRoundSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Round {} - {}", self.round, self.service)?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        for result in &self.results {
            writeln!(f, "  {result}")?;
        }
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            f,
            "Total: {} | Pass: {} | Fail: {} | Skip: {} | Error: {}",
            self.total, self.passed, self.failed, self.skipped, self.errors
        )?;
        writeln!(
            f,
            "Pass Rate: {:.1}% | Duration: {}ms",
            self.pass_rate(),
            self.total_duration_ms
        )
    }
}
