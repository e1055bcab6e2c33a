//! Calculator API checker
//!
//! A CLI tool that runs a fixed set of HTTP checks against a calculator
//! service and its mock, and reports which ones passed.
//!
//! ## Features
//!
//! - 5 test cases covering add, sqrt (mock), multiply, divide and
//!   divide-by-zero error handling
//! - Exact status and body matching with a fixed per-request timeout
//! - Repeated rounds with flaky and inconsistent case detection
//! - Multiple output formats (Table, JSON, CSV, Summary)
//! - Layered configuration (file, named environment, env vars, flags)
//!
//! ## Usage
//!
//! ```bash
//! # Run all tests against the default services
//! calc-api-check test
//!
//! # Run specific tests against another host
//! calc-api-check test --primary-url http://10.0.0.5:5000 --case add --case 5
//!
//! # Run multiple rounds
//! calc-api-check test --rounds 10 --output runs/latest.json
//!
//! # List available tests
//! calc-api-check list --detailed
//!
//! # Send a single request
//! calc-api-check call divide 8 0 --accept '*/*'
//! ```

use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use clap::Parser;
use std::path::Path;
use tracing::{debug, info};

mod cli;
mod config;
mod executor;
mod http;
mod models;
mod output;
mod results;
mod tests;
mod utils;

use cli::Args;
use config::{AppConfig, ConfigFile, ConfigOverrides, EnvConfig};
use executor::{AggregateResult, TestRunner};
use models::{CalcCall, Expectation, Target, TestCase, TestRoundSummary};
use output::{OutputFormat, ResultFormatter};
use results::StoredTestRun;
use utils::{init_logger, LogLevel};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let env = EnvConfig::load();

    init_logger(LogLevel::from_verbose(
        args.verbose || env.verbose.unwrap_or(false),
    ));

    if env.has_any() {
        debug!("Environment overrides: {:?}", env);
    }

    match args.command {
        cli::Command::Test(ref test_args) => {
            run_tests(&args, test_args, &env).await?;
        }
        cli::Command::List(ref list_args) => {
            list_tests(list_args);
        }
        cli::Command::Call(ref call_args) => {
            call_command(&args, call_args, &env).await?;
        }
        cli::Command::Config(ref config_args) => {
            manage_config(&args, config_args, &env)?;
        }
    }

    Ok(())
}

fn config_overrides(args: &Args, service: &cli::ServiceArgs) -> ConfigOverrides {
    ConfigOverrides {
        config_path: args.config.clone(),
        environment: args.env.clone(),
        primary_url: service.primary_url.clone(),
        mock_url: service.mock_url.clone(),
        timeout_secs: service.timeout,
        ..Default::default()
    }
}

fn parse_case(value: &str) -> Result<TestCase> {
    TestCase::from_str(value.trim())
        .ok_or_else(|| anyhow!("Invalid test case: {value}. Use 1-5 or a name from `list`"))
}

async fn run_tests(args: &Args, test_args: &cli::TestArgs, env: &EnvConfig) -> Result<()> {
    let overrides = ConfigOverrides {
        rounds: test_args.rounds,
        format: test_args.format.clone(),
        ..config_overrides(args, &test_args.service)
    };
    let mut app = AppConfig::resolve(&overrides, env)?;

    if let Some(skip) = &test_args.skip {
        for value in skip.split(',').filter(|s| !s.trim().is_empty()) {
            let number = parse_case(value)?.number();
            if !app.skip_tests.contains(&number) {
                app.skip_tests.push(number);
            }
        }
    }

    let cases = test_args
        .cases
        .iter()
        .map(|c| parse_case(c))
        .collect::<Result<Vec<_>>>()?;

    let format = OutputFormat::from_str(&app.format)
        .ok_or_else(|| anyhow!("Unknown output format: {}", app.format))?;
    let mut formatter = ResultFormatter::new(format);
    if test_args.no_color {
        formatter = formatter.no_color();
    }

    let config = app.to_test_config();
    info!(
        "Testing {} (mock {}) with {}s timeout, {} round(s)",
        config.endpoints.primary_url,
        config.endpoints.mock_url,
        config.timeout_secs,
        config.rounds
    );

    let started_at = Utc::now();
    let runner = TestRunner::new(config.clone())?;

    let summaries: Vec<TestRoundSummary> = if config.rounds > 1 {
        let summaries = if cases.is_empty() {
            runner.run_rounds(config.rounds).await?
        } else {
            runner.run_rounds_of(config.rounds, &cases).await?
        };
        let aggregate = AggregateResult::from_rounds(&summaries);
        println!(
            "{}",
            formatter.format_rounds(&summaries, &aggregate, &config.endpoints.label())
        );
        summaries
    } else if cases.len() == 1 {
        let result = runner.run_test(cases[0]).await;
        println!("{}", formatter.format_result(&result));
        vec![TestRoundSummary::new(1, config.endpoints.label(), vec![result])]
    } else {
        let summary = if cases.is_empty() {
            runner.run_all().await?
        } else {
            runner.run_tests(&cases).await?
        };
        println!("{}", formatter.format_summary(&summary));
        vec![summary]
    };

    if let Some(output) = &test_args.output {
        let mut run = StoredTestRun::new(runner.config(), started_at);
        for summary in &summaries {
            run.add_round(summary);
        }
        run.save(output)?;
        println!("Results saved to {output}");
    }

    let total: usize = summaries.iter().map(|s| s.total - s.skipped).sum();
    let not_passed: usize = summaries.iter().map(|s| s.failed + s.errors).sum();
    if not_passed > 0 {
        bail!("{not_passed} of {total} checks did not pass");
    }

    Ok(())
}

fn list_tests(args: &cli::ListArgs) {
    let cases = TestCase::all();
    println!("\nCalculator API Test Cases ({} total)\n", cases.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for test_case in cases {
        if args.detailed {
            let expectation = match test_case.expectation() {
                Expectation::Body { status, body } => format!("HTTP {status} body {body:?}"),
                Expectation::ErrorStatus { status } => format!("HTTP error {status}"),
            };
            println!(
                "  {}. {:16} [{}] GET {}",
                test_case.number(),
                test_case.name(),
                test_case.target(),
                test_case.call().path()
            );
            for (key, value) in test_case.headers() {
                println!("       {key}: {value}");
            }
            println!("       expects {expectation}");
        } else {
            println!(
                "  {}. {:16} ({})",
                test_case.number(),
                test_case.name(),
                test_case.slug()
            );
        }
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
}

async fn call_command(args: &Args, call_args: &cli::CallArgs, env: &EnvConfig) -> Result<()> {
    let app = AppConfig::resolve(&config_overrides(args, &call_args.service), env)?;

    let call = CalcCall::parse(&call_args.op, &call_args.operands)?;
    let target = Target::from_str(&call_args.target)
        .ok_or_else(|| anyhow!("Unknown target: {}. Use primary or mock", call_args.target))?;

    let headers: Vec<(String, String)> = call_args
        .accept
        .iter()
        .map(|accept| ("Accept".to_string(), accept.clone()))
        .collect();

    let runner = TestRunner::new(app.to_test_config())?;
    let response = runner.call(target, &call, &headers).await?;

    println!("{} {}", response.status_code, response.url);
    if let Some(content_type) = response.get_header("content-type") {
        println!("content-type: {content_type}");
    }
    println!("{}", response.body);
    debug!("Completed in {}ms", response.duration_ms);

    Ok(())
}

fn manage_config(args: &Args, config_args: &cli::ConfigArgs, env: &EnvConfig) -> Result<()> {
    match &config_args.action {
        cli::ConfigAction::Init { path, force } => {
            if Path::new(path).exists() && !force {
                bail!("Configuration file already exists: {path}. Use --force to overwrite.");
            }

            ConfigFile::example().save(path)?;
            println!("✓ Configuration file created: {path}");
            println!("\nEdit the file to customize your settings.");
        }

        cli::ConfigAction::Show => {
            let app = AppConfig::resolve(&config_overrides(args, &cli::ServiceArgs::default()), env)?;
            println!("{}", serde_yaml::to_string(&app)?);
            env.print_summary();
        }

        cli::ConfigAction::Env => {
            config::print_env_help();
        }
    }

    Ok(())
}
