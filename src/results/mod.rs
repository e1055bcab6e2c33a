//! Results storage module
//!
//! Persists test runs to JSON or CSV files.

mod storage;

pub use storage::StoredTestRun;
