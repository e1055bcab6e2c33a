//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};

/// Calculator API test runner
#[derive(Parser, Debug)]
#[command(name = "calc-api-check")]
#[command(version)]
#[command(about = "Run HTTP checks against a calculator API and its mock")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Named environment from the configuration file
    #[arg(short, long, global = true)]
    pub env: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run calculator API tests
    Test(TestArgs),

    /// List available test cases
    List(ListArgs),

    /// Send a single unchecked request
    Call(CallArgs),

    /// Show or create configuration
    Config(ConfigArgs),
}

/// Service connection overrides shared by commands that send requests
#[derive(Parser, Debug, Default)]
pub struct ServiceArgs {
    /// Base URL of the calculator API
    #[arg(long)]
    pub primary_url: Option<String>,

    /// Base URL of the mock server
    #[arg(long)]
    pub mock_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Arguments for test command
#[derive(Parser, Debug)]
pub struct TestArgs {
    #[command(flatten)]
    pub service: ServiceArgs,

    /// Test cases to run, by number or name (repeatable)
    #[arg(short = 't', long = "case")]
    pub cases: Vec<String>,

    /// Skip specific tests (comma-separated numbers or names)
    #[arg(long)]
    pub skip: Option<String>,

    /// Number of test rounds
    #[arg(short, long)]
    pub rounds: Option<u32>,

    /// Output format (table, json, json-pretty, csv, summary)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Disable ANSI colours in table output
    #[arg(long)]
    pub no_color: bool,

    /// Save results to file (.json or .csv)
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show target, request path and expectation
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for call command
#[derive(Parser, Debug)]
pub struct CallArgs {
    #[command(flatten)]
    pub service: ServiceArgs,

    /// Operation (add, subtract, multiply, divide, sqrt)
    pub op: String,

    /// Operands
    #[arg(allow_negative_numbers = true)]
    pub operands: Vec<String>,

    /// Which service to call (primary, mock)
    #[arg(long, default_value = "primary")]
    pub target: String,

    /// Accept header value
    #[arg(long)]
    pub accept: Option<String>,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Write an example configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "calc-api-check.yaml")]
        path: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List supported environment variables
    Env,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(["calc-api-check", "list", "--detailed"]);
        match args.command {
            Command::List(list_args) => {
                assert!(list_args.detailed);
            }
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_test_args() {
        let args = Args::parse_from([
            "calc-api-check",
            "--verbose",
            "test",
            "--primary-url",
            "http://calc:5000",
            "--case",
            "add",
            "-t",
            "5",
            "--rounds",
            "3",
        ]);
        assert!(args.verbose);
        match args.command {
            Command::Test(test_args) => {
                assert_eq!(
                    test_args.service.primary_url.as_deref(),
                    Some("http://calc:5000")
                );
                assert_eq!(test_args.cases, vec!["add", "5"]);
                assert_eq!(test_args.rounds, Some(3));
                assert!(test_args.service.mock_url.is_none());
            }
            _ => panic!("Expected Test command"),
        }
    }

    #[test]
    fn test_call_args() {
        let args = Args::parse_from([
            "calc-api-check",
            "call",
            "subtract",
            "5",
            "-3",
            "--target",
            "mock",
        ]);
        match args.command {
            Command::Call(call_args) => {
                assert_eq!(call_args.op, "subtract");
                assert_eq!(call_args.operands, vec!["5", "-3"]);
                assert_eq!(call_args.target, "mock");
            }
            _ => panic!("Expected Call command"),
        }
    }

    #[test]
    fn test_config_init_args() {
        let args = Args::parse_from(["calc-api-check", "config", "init", "--force"]);
        match args.command {
            Command::Config(ConfigArgs {
                action: ConfigAction::Init { path, force },
            }) => {
                assert_eq!(path, "calc-api-check.yaml");
                assert!(force);
            }
            _ => panic!("Expected Config Init command"),
        }
    }
}
