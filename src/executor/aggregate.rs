//! Aggregation across repeated test rounds
//!
//! Besides pass rates, tracks whether every round observed the same
//! response for a case. The calculator endpoints are pure, so a case that
//! sees different responses across rounds is flagged as inconsistent.

use std::collections::{BTreeSet, HashMap};

use crate::models::{TestCase, TestRoundSummary, TestStatus};

/// Statistics for a single test case across rounds
#[derive(Clone, Debug, Default)]
pub struct TestStats {
    pub passes: u32,
    pub failures: u32,
    pub skips: u32,
    pub errors: u32,
    pub total_duration_ms: u64,
    /// Distinct `(status, body)` pairs seen on the wire
    pub observed: BTreeSet<(u16, String)>,
}

impl TestStats {
    pub fn executed(&self) -> u32 {
        self.passes + self.failures + self.errors
    }

    pub fn avg_duration_ms(&self) -> u64 {
        let total = self.executed();
        if total > 0 {
            self.total_duration_ms / total as u64
        } else {
            0
        }
    }

    pub fn pass_rate(&self) -> f64 {
        let total = self.executed();
        if total > 0 {
            (self.passes as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.observed.len() <= 1
    }
}

/// Aggregate results across multiple test rounds
#[derive(Clone, Debug)]
pub struct AggregateResult {
    pub total_rounds: u32,
    pub test_stats: HashMap<TestCase, TestStats>,
    pub overall_pass_rate: f64,
}

impl AggregateResult {
    pub fn from_rounds(summaries: &[TestRoundSummary]) -> Self {
        let mut test_stats: HashMap<TestCase, TestStats> = HashMap::new();

        for summary in summaries {
            for result in &summary.results {
                let stats = test_stats.entry(result.test_case).or_default();

                match result.status {
                    TestStatus::Pass => stats.passes += 1,
                    TestStatus::Fail => stats.failures += 1,
                    TestStatus::Skip => stats.skips += 1,
                    TestStatus::Error => stats.errors += 1,
                }
                stats.total_duration_ms += result.duration_ms;

                if let Some((status, body)) = result.observed() {
                    stats.observed.insert((status, body.to_string()));
                }
            }
        }

        let overall_pass_rate = if summaries.is_empty() {
            0.0
        } else {
            summaries.iter().map(|s| s.pass_rate()).sum::<f64>() / summaries.len() as f64
        };

        Self {
            total_rounds: summaries.len() as u32,
            test_stats,
            overall_pass_rate,
        }
    }

    /// Per-case pass rates ordered by test number
    pub fn pass_rates(&self) -> Vec<(TestCase, f64)> {
        let mut rates: Vec<_> = self
            .test_stats
            .iter()
            .map(|(tc, stats)| (*tc, stats.pass_rate()))
            .collect();
        rates.sort_by_key(|(tc, _)| tc.number());
        rates
    }

    /// Cases that did not pass in every executed round, lowest pass rate first
    pub fn flaky_tests(&self) -> Vec<(TestCase, f64)> {
        let mut tests: Vec<_> = self
            .pass_rates()
            .into_iter()
            .filter(|(tc, rate)| *rate < 100.0 && self.test_stats[tc].executed() > 0)
            .collect();
        tests.sort_by(|a, b| a.1.total_cmp(&b.1));
        tests
    }

    /// Cases whose responses differed between rounds
    pub fn inconsistent_tests(&self) -> Vec<TestCase> {
        let mut tests: Vec<_> = self
            .test_stats
            .iter()
            .filter(|(_, stats)| !stats.is_consistent())
            .map(|(tc, _)| *tc)
            .collect();
        tests.sort_by_key(|tc| tc.number());
        tests
    }
}
