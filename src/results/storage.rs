//! Results storage
//!
//! Writes a completed test run to disk as JSON or CSV.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

use crate::models::{TestConfig, TestResult, TestRoundSummary};

/// Stored test run containing all results
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredTestRun {
    /// Unique run ID
    pub id: String,

    /// Timestamp when test started
    pub started_at: DateTime<Utc>,

    /// Timestamp when test completed
    pub completed_at: DateTime<Utc>,

    pub config: TestConfig,

    pub summaries: Vec<StoredRoundSummary>,

    pub environment: EnvironmentInfo,
}

/// Stored round summary
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredRoundSummary {
    pub round: u32,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errors: usize,
    /// Pass rate (0.0 - 1.0)
    pub pass_rate: f64,
    pub duration_ms: u64,
    pub results: Vec<StoredTestResult>,
}

/// Stored test result
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredTestResult {
    pub test_number: u8,
    pub test_name: String,
    pub status: String,
    pub duration_ms: u64,
    /// HTTP status code (if the request completed)
    pub status_code: Option<u16>,
    pub body: Option<String>,
    pub message: Option<String>,
}

/// Environment information
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    pub os: String,
    pub arch: String,
    pub tool_version: String,
}

impl Default for EnvironmentInfo {
    fn default() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Export file format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    /// Pick a format from the file extension, JSON unless `.csv`
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => ExportFormat::Csv,
            _ => ExportFormat::Json,
        }
    }
}

impl StoredTestRun {
    /// Create a new stored test run
    pub fn new(config: &TestConfig, started_at: DateTime<Utc>) -> Self {
        Self {
            id: generate_run_id(),
            started_at,
            completed_at: Utc::now(),
            config: config.clone(),
            summaries: Vec::new(),
            environment: EnvironmentInfo::default(),
        }
    }

    /// Add a round summary
    pub fn add_round(&mut self, summary: &TestRoundSummary) {
        self.summaries
            .push(StoredRoundSummary::from_round_summary(summary));
        self.completed_at = Utc::now();
    }

    /// Save the run, choosing the format from the file extension
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        match ExportFormat::from_path(path) {
            ExportFormat::Json => {
                let file = File::create(path).context("Failed to create results file")?;
                let writer = BufWriter::new(file);
                serde_json::to_writer_pretty(writer, self).context("Failed to write results")?;
            }
            ExportFormat::Csv => self.write_csv(path)?,
        }

        info!("Saved test results to {}", path.display());
        Ok(())
    }

    fn write_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

        writer.write_record([
            "round",
            "test_number",
            "test_name",
            "status",
            "duration_ms",
            "status_code",
            "body",
            "message",
        ])?;

        for summary in &self.summaries {
            for result in &summary.results {
                writer.write_record([
                    summary.round.to_string(),
                    result.test_number.to_string(),
                    result.test_name.clone(),
                    result.status.clone(),
                    result.duration_ms.to_string(),
                    result
                        .status_code
                        .map(|s| s.to_string())
                        .unwrap_or_default(),
                    result.body.clone().unwrap_or_default(),
                    result.message.clone().unwrap_or_default(),
                ])?;
            }
        }

        writer.flush()?;
        Ok(())
    }
}

impl StoredRoundSummary {
    /// Convert from TestRoundSummary
    pub fn from_round_summary(summary: &TestRoundSummary) -> Self {
        Self {
            round: summary.round,
            total: summary.total,
            passed: summary.passed,
            failed: summary.failed,
            skipped: summary.skipped,
            errors: summary.errors,
            pass_rate: summary.pass_rate() / 100.0,
            duration_ms: summary.total_duration_ms,
            results: summary
                .results
                .iter()
                .map(StoredTestResult::from_test_result)
                .collect(),
        }
    }
}

impl StoredTestResult {
    /// Convert from TestResult
    pub fn from_test_result(result: &TestResult) -> Self {
        let observed = result.observed();
        Self {
            test_number: result.test_case.number(),
            test_name: result.test_case.slug().to_string(),
            status: result.status.to_string(),
            duration_ms: result.duration_ms,
            status_code: observed.map(|(status, _)| status),
            body: observed.map(|(_, body)| body.to_string()),
            message: result.message.clone(),
        }
    }
}

/// Generate unique run ID
fn generate_run_id() -> String {
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let random: u32 = rand::random::<u32>() % 10000;
    format!("{timestamp}_{random:04}")
}
