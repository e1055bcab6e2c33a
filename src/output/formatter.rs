//! Output formatters for test results
//!
//! Provides JSON, Table, CSV, and summary output formats.

use serde::Serialize;

use crate::executor::AggregateResult;
use crate::models::{TestResult, TestRoundSummary, TestStatus};

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Csv,
    Summary,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "csv" => Some(OutputFormat::Csv),
            "summary" => Some(OutputFormat::Summary),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct AggregateJson<'a> {
    service: &'a str,
    total_rounds: u32,
    overall_pass_rate: f64,
    test_pass_rates: Vec<(&'static str, f64)>,
    inconsistent: Vec<&'static str>,
}

impl<'a> AggregateJson<'a> {
    fn new(aggregate: &AggregateResult, service: &'a str) -> Self {
        Self {
            service,
            total_rounds: aggregate.total_rounds,
            overall_pass_rate: aggregate.overall_pass_rate,
            test_pass_rates: aggregate
                .pass_rates()
                .into_iter()
                .map(|(tc, rate)| (tc.slug(), rate))
                .collect(),
            inconsistent: aggregate
                .inconsistent_tests()
                .into_iter()
                .map(|tc| tc.slug())
                .collect(),
        }
    }
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    fn to_json<T: Serialize>(&self, value: &T) -> String {
        let rendered = if self.format == OutputFormat::JsonPretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_default()
    }

    /// Format a single test result
    pub fn format_result(&self, result: &TestResult) -> String {
        match self.format {
            OutputFormat::Table => self.format_result_table(result),
            OutputFormat::Json | OutputFormat::JsonPretty => self.to_json(result),
            OutputFormat::Csv => self.format_result_csv(result),
            OutputFormat::Summary => self.format_result_summary(result),
        }
    }

    fn status_label(&self, status: TestStatus) -> &'static str {
        if self.colorize {
            match status {
                TestStatus::Pass => "\x1b[32m✓ PASS\x1b[0m",
                TestStatus::Fail => "\x1b[31m✗ FAIL\x1b[0m",
                TestStatus::Skip => "\x1b[33m○ SKIP\x1b[0m",
                TestStatus::Error => "\x1b[31m! ERROR\x1b[0m",
            }
        } else {
            match status {
                TestStatus::Pass => "✓ PASS",
                TestStatus::Fail => "✗ FAIL",
                TestStatus::Skip => "○ SKIP",
                TestStatus::Error => "! ERROR",
            }
        }
    }

    fn format_result_table(&self, result: &TestResult) -> String {
        format!(
            "{:2}. {:16} {} [{:>6}ms]",
            result.test_case.number(),
            result.test_case.name(),
            self.status_label(result.status),
            result.duration_ms
        )
    }

    fn format_result_csv(&self, result: &TestResult) -> String {
        let (status_code, body) = result
            .observed()
            .map(|(s, b)| (s.to_string(), b.to_string()))
            .unwrap_or_default();
        format!(
            "{},{},{},{},{},\"{}\",\"{}\"",
            result.test_case.number(),
            result.test_case.slug(),
            result.status,
            result.duration_ms,
            status_code,
            body.replace('"', "\"\""),
            result.message.as_deref().unwrap_or("").replace('"', "\"\"")
        )
    }

    fn format_result_summary(&self, result: &TestResult) -> String {
        format!(
            "{} {} ({}ms)",
            result.status.symbol(),
            result.test_case.name(),
            result.duration_ms
        )
    }

    /// Format test round summary
    pub fn format_summary(&self, summary: &TestRoundSummary) -> String {
        match self.format {
            OutputFormat::Table => self.format_summary_table(summary),
            OutputFormat::Json | OutputFormat::JsonPretty => self.to_json(summary),
            OutputFormat::Csv => self.format_summary_csv(summary),
            OutputFormat::Summary => self.format_summary_brief(summary),
        }
    }

    fn format_summary_table(&self, summary: &TestRoundSummary) -> String {
        let mut output = String::new();

        output.push_str("\n╔══════════════════════════════════════════════════════════════╗\n");
        output.push_str(&format!(
            "║  Round {:3} - {:46} ║\n",
            summary.round, summary.service
        ));
        output.push_str("╠══════════════════════════════════════════════════════════════╣\n");

        for result in &summary.results {
            output.push_str(&format!("║  {}\n", self.format_result_table(result)));
        }

        // Failure messages name the URL and the mismatch
        let failures: Vec<_> = summary
            .results
            .iter()
            .filter(|r| matches!(r.status, TestStatus::Fail | TestStatus::Error))
            .collect();
        if !failures.is_empty() {
            output.push_str("╠══════════════════════════════════════════════════════════════╣\n");
            for result in failures {
                output.push_str(&format!(
                    "║  {}: {}\n",
                    result.test_case.name(),
                    result.message.as_deref().unwrap_or("")
                ));
            }
        }

        output.push_str("╠══════════════════════════════════════════════════════════════╣\n");

        let pass_str = if self.colorize {
            format!("\x1b[32m{}\x1b[0m", summary.passed)
        } else {
            summary.passed.to_string()
        };
        let fail_str = if self.colorize && summary.failed > 0 {
            format!("\x1b[31m{}\x1b[0m", summary.failed)
        } else {
            summary.failed.to_string()
        };

        output.push_str(&format!(
            "║  Total: {:2} | Pass: {} | Fail: {} | Skip: {:2} | Error: {:2}\n",
            summary.total, pass_str, fail_str, summary.skipped, summary.errors
        ));
        output.push_str(&format!(
            "║  Pass Rate: {:5.1}% | Duration: {:6}ms\n",
            summary.pass_rate(),
            summary.total_duration_ms
        ));
        output.push_str("╚══════════════════════════════════════════════════════════════╝\n");

        output
    }

    fn format_summary_csv(&self, summary: &TestRoundSummary) -> String {
        let mut output = String::new();
        output.push_str("test_num,test_name,status,duration_ms,status_code,body,message\n");
        for result in &summary.results {
            output.push_str(&self.format_result_csv(result));
            output.push('\n');
        }
        output
    }

    fn format_summary_brief(&self, summary: &TestRoundSummary) -> String {
        format!(
            "{} - Round {}: {}/{} passed ({:.1}%) in {}ms",
            summary.service,
            summary.round,
            summary.passed,
            summary.total,
            summary.pass_rate(),
            summary.total_duration_ms
        )
    }

    /// Format aggregate results
    pub fn format_aggregate(&self, aggregate: &AggregateResult, service: &str) -> String {
        match self.format {
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.to_json(&AggregateJson::new(aggregate, service))
            }
            _ => self.format_aggregate_table(aggregate, service),
        }
    }

    /// Format every round followed by the aggregate
    ///
    /// JSON formats produce a single document with `rounds` and `aggregate`.
    pub fn format_rounds(
        &self,
        summaries: &[TestRoundSummary],
        aggregate: &AggregateResult,
        service: &str,
    ) -> String {
        match self.format {
            OutputFormat::Json | OutputFormat::JsonPretty => {
                #[derive(Serialize)]
                struct RoundsJson<'a> {
                    rounds: &'a [TestRoundSummary],
                    aggregate: AggregateJson<'a>,
                }

                self.to_json(&RoundsJson {
                    rounds: summaries,
                    aggregate: AggregateJson::new(aggregate, service),
                })
            }
            _ => {
                let mut output: Vec<String> =
                    summaries.iter().map(|s| self.format_summary(s)).collect();
                output.push(self.format_aggregate(aggregate, service));
                output.join("\n")
            }
        }
    }

    fn rate_label(&self, rate: f64) -> String {
        if !self.colorize {
            return format!("{rate:5.1}%");
        }
        if rate >= 90.0 {
            format!("\x1b[32m{rate:5.1}%\x1b[0m")
        } else if rate >= 50.0 {
            format!("\x1b[33m{rate:5.1}%\x1b[0m")
        } else {
            format!("\x1b[31m{rate:5.1}%\x1b[0m")
        }
    }

    fn format_aggregate_table(&self, aggregate: &AggregateResult, service: &str) -> String {
        let mut output = String::new();

        output.push_str("\n═══════════════════════════════════════════════════════════════\n");
        output.push_str(&format!(
            " Aggregate Results: {} ({} rounds)\n",
            service, aggregate.total_rounds
        ));
        output.push_str("═══════════════════════════════════════════════════════════════\n");

        output.push_str(&format!(
            " Overall Pass Rate: {:.1}%\n\n",
            aggregate.overall_pass_rate
        ));

        output.push_str(" Test Pass Rates:\n");
        output.push_str(" ───────────────────────────────────────────────────────────\n");

        for (test_case, rate) in aggregate.pass_rates() {
            let stats = &aggregate.test_stats[&test_case];
            let bar_len = ((rate / 5.0) as usize).min(20);
            let bar = "█".repeat(bar_len);
            let empty = "░".repeat(20 - bar_len);

            output.push_str(&format!(
                " {:2}. {:16} {}{} {} {:>6}ms avg\n",
                test_case.number(),
                test_case.name(),
                bar,
                empty,
                self.rate_label(rate),
                stats.avg_duration_ms()
            ));
            if stats.skips > 0 {
                output.push_str(&format!("       skipped in {} round(s)\n", stats.skips));
            }
        }

        output.push_str(" ───────────────────────────────────────────────────────────\n");

        let flaky = aggregate.flaky_tests();
        if !flaky.is_empty() {
            output.push_str("\n Flaky Tests (< 100% pass rate):\n");
            for (tc, rate) in &flaky {
                output.push_str(&format!("   - {} ({:.1}%)\n", tc.name(), rate));
            }
        }

        let inconsistent = aggregate.inconsistent_tests();
        if !inconsistent.is_empty() {
            output.push_str("\n Inconsistent Responses Across Rounds:\n");
            for tc in inconsistent {
                let observed: Vec<String> = aggregate.test_stats[&tc]
                    .observed
                    .iter()
                    .map(|(status, body)| format!("{status} {body:?}"))
                    .collect();
                output.push_str(&format!("   - {}: {}\n", tc.name(), observed.join(", ")));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TestCase;
    use serde_json::json;

    fn sample_summary() -> TestRoundSummary {
        TestRoundSummary::new(
            1,
            "http://localhost:5000",
            vec![
                TestResult::pass(TestCase::Add, 4)
                    .with_details(json!({ "url": "u", "status": 200, "body": "3" })),
                TestResult::fail(
                    TestCase::Divide,
                    6,
                    "✗ http://localhost:5000/calc/divide/8/2 expected body \"4.0\" but got \"4\"",
                )
                .with_details(json!({ "url": "u", "status": 200, "body": "4" })),
            ],
        )
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("TABLE"), Some(OutputFormat::Table));
        assert_eq!(OutputFormat::from_str("unknown"), None);
    }

    #[test]
    fn test_format_result() {
        let result = TestResult::pass(TestCase::Multiply, 100);
        let formatter = ResultFormatter::new(OutputFormat::Summary);
        let output = formatter.format_result(&result);
        assert!(output.contains("Multiply"));
        assert!(output.starts_with('✓'));
    }

    #[test]
    fn test_table_lists_failure_messages() {
        let output = ResultFormatter::new(OutputFormat::Table)
            .no_color()
            .format_summary(&sample_summary());

        assert!(output.contains("✓ PASS"));
        assert!(output.contains("✗ FAIL"));
        assert!(output.contains("expected body \"4.0\" but got \"4\""));
        assert!(output.contains("Pass Rate:  50.0%"));
    }

    #[test]
    fn test_csv_summary() {
        let output = ResultFormatter::new(OutputFormat::Csv).format_summary(&sample_summary());
        let lines: Vec<_> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("1,add,PASS,4,200,\"3\","));
        assert!(lines[2].contains("\"\"4.0\"\""));
    }

    #[test]
    fn test_json_summary() {
        let output = ResultFormatter::new(OutputFormat::Json).format_summary(&sample_summary());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["passed"], 1);
        assert_eq!(value["results"][1]["test_case"], "divide");
    }

    #[test]
    fn test_aggregate_table() {
        let aggregate = AggregateResult::from_rounds(&[sample_summary()]);
        let output = ResultFormatter::new(OutputFormat::Table)
            .no_color()
            .format_aggregate(&aggregate, "http://localhost:5000");

        assert!(output.contains("(1 rounds)"));
        assert!(output.contains("Flaky Tests"));
        assert!(output.contains("Divide (0.0%)"));
    }

    #[test]
    fn test_rounds_json_is_one_document() {
        let summaries = vec![sample_summary(), sample_summary()];
        let aggregate = AggregateResult::from_rounds(&summaries);
        let output = ResultFormatter::new(OutputFormat::JsonPretty).format_rounds(
            &summaries,
            &aggregate,
            "http://localhost:5000 (mock http://localhost:9090)",
        );

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["rounds"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["aggregate"]["total_rounds"], 2);
    }
}
