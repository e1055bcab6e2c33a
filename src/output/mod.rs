//! Rendering of check results, round summaries and aggregates

mod formatter;

pub use formatter::{OutputFormat, ResultFormatter};
