//! Service target models
//!
//! Defines the two calculator deployments under test and the test
//! configuration handed to the runner.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_PRIMARY_URL: &str = "http://localhost:5000";
pub const DEFAULT_MOCK_URL: &str = "http://localhost:9090";
pub const DEFAULT_TIMEOUT_SECS: u64 = 2;

/// Which deployment a request goes to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// The live calculator API
    Primary,
    /// The stand-in mock server
    Mock,
}

impl Target {
    pub fn name(&self) -> &'static str {
        match self {
            Target::Primary => "primary",
            Target::Mock => "mock",
        }
    }

    pub fn from_str(s: &str) -> Option<Target> {
        match s.to_lowercase().as_str() {
            "primary" | "api" | "live" => Some(Target::Primary),
            "mock" => Some(Target::Mock),
            _ => None,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Base URLs of both deployments
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoints {
    pub primary_url: String,
    pub mock_url: String,
}

impl ServiceEndpoints {
    pub fn new(primary_url: impl Into<String>, mock_url: impl Into<String>) -> Self {
        Self {
            primary_url: primary_url.into(),
            mock_url: mock_url.into(),
        }
    }

    pub fn base_url(&self, target: Target) -> &str {
        match target {
            Target::Primary => &self.primary_url,
            Target::Mock => &self.mock_url,
        }
    }

    /// Join a target's base URL with a request path
    pub fn url_for(&self, target: Target, path: &str) -> String {
        format!("{}{}", self.base_url(target).trim_end_matches('/'), path)
    }

    /// Names both deployments, e.g. for round summaries
    pub fn label(&self) -> String {
        format!("{} (mock {})", self.primary_url, self.mock_url)
    }
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self::new(DEFAULT_PRIMARY_URL, DEFAULT_MOCK_URL)
    }
}

/// Test run configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestConfig {
    pub endpoints: ServiceEndpoints,
    pub rounds: u32,
    pub timeout_secs: u64,
    pub skip_tests: Vec<u8>,
}

impl TestConfig {
    pub fn new(endpoints: ServiceEndpoints) -> Self {
        Self {
            endpoints,
            rounds: 1,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            skip_tests: Vec::new(),
        }
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn skip_test(mut self, test_number: u8) -> Self {
        self.skip_tests.push(test_number);
        self
    }
}
