//! Data models for calculator API testing
//!
//! This module contains all data structures used throughout the application.

mod calc;
mod service;
mod test_result;

pub use calc::{CalcCall, CalcOp};
pub use service::{
    ServiceEndpoints, Target, TestConfig, DEFAULT_MOCK_URL, DEFAULT_PRIMARY_URL,
    DEFAULT_TIMEOUT_SECS,
};
pub use test_result::{Expectation, TestCase, TestResult, TestRoundSummary, TestStatus};
