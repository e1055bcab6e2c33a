//! Test execution engine
//!
//! Provides sequential test execution and cross-round aggregation.

mod aggregate;
mod runner;

pub use aggregate::AggregateResult;
pub use runner::TestRunner;
