//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "CALC_API";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Primary URL from CALC_API_PRIMARY_URL
    pub primary_url: Option<String>,
    /// Mock URL from CALC_API_MOCK_URL
    pub mock_url: Option<String>,
    /// Timeout from CALC_API_TIMEOUT
    pub timeout: Option<u64>,
    /// Rounds from CALC_API_ROUNDS
    pub rounds: Option<u32>,
    /// Output format from CALC_API_FORMAT
    pub format: Option<String>,
    /// Config file from CALC_API_CONFIG
    pub config_file: Option<String>,
    /// Environment name from CALC_API_ENV
    pub environment: Option<String>,
    /// Verbose from CALC_API_VERBOSE
    pub verbose: Option<bool>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            primary_url: get_env("PRIMARY_URL"),
            mock_url: get_env("MOCK_URL"),
            timeout: get_env_parse("TIMEOUT"),
            rounds: get_env_parse("ROUNDS"),
            format: get_env("FORMAT"),
            config_file: get_env("CONFIG"),
            environment: get_env("ENV"),
            verbose: get_env_bool("VERBOSE"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.primary_url.is_some()
            || self.mock_url.is_some()
            || self.timeout.is_some()
            || self.rounds.is_some()
            || self.format.is_some()
            || self.config_file.is_some()
            || self.environment.is_some()
            || self.verbose.is_some()
    }

    /// Get timeout with fallback
    pub fn timeout_or(&self, default: u64) -> u64 {
        self.timeout.unwrap_or(default)
    }

    /// Get rounds with fallback
    pub fn rounds_or(&self, default: u32) -> u32 {
        self.rounds.unwrap_or(default)
    }

    /// Print current environment configuration
    pub fn print_summary(&self) {
        println!("Environment Configuration:");
        println!("  {}_PRIMARY_URL: {:?}", ENV_PREFIX, self.primary_url);
        println!("  {}_MOCK_URL:    {:?}", ENV_PREFIX, self.mock_url);
        println!("  {}_TIMEOUT:     {:?}", ENV_PREFIX, self.timeout);
        println!("  {}_ROUNDS:      {:?}", ENV_PREFIX, self.rounds);
        println!("  {}_FORMAT:      {:?}", ENV_PREFIX, self.format);
        println!("  {}_CONFIG:      {:?}", ENV_PREFIX, self.config_file);
        println!("  {}_ENV:         {:?}", ENV_PREFIX, self.environment);
        println!("  {}_VERBOSE:     {:?}", ENV_PREFIX, self.verbose);
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

/// Print all CALC_API environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_PRIMARY_URL   Base URL of the calculator API");
    println!("  {ENV_PREFIX}_MOCK_URL      Base URL of the mock server");
    println!("  {ENV_PREFIX}_TIMEOUT       Request timeout in seconds");
    println!("  {ENV_PREFIX}_ROUNDS        Number of test rounds");
    println!("  {ENV_PREFIX}_FORMAT        Output format (table, json, csv, summary)");
    println!("  {ENV_PREFIX}_CONFIG        Path to configuration file");
    println!("  {ENV_PREFIX}_ENV           Named environment from the config file");
    println!("  {ENV_PREFIX}_VERBOSE       Enable verbose output (true/false)");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_PRIMARY_URL=http://localhost:5000");
    println!("  export {ENV_PREFIX}_MOCK_URL=http://localhost:9090");
    println!("  calc-api-check test");
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sets variables for the lifetime of the guard
    struct EnvGuard {
        previous: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        fn set(vars: &[(&str, &str)]) -> Self {
            let previous = vars
                .iter()
                .map(|(k, v)| {
                    let key = format!("{ENV_PREFIX}_{k}");
                    let old = env::var(&key).ok();
                    env::set_var(&key, v);
                    (key, old)
                })
                .collect();
            Self { previous }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in &self.previous {
                match value {
                    Some(v) => env::set_var(key, v),
                    None => env::remove_var(key),
                }
            }
        }
    }

    #[test]
    fn test_env_config_default() {
        let config = EnvConfig::default();
        assert!(config.primary_url.is_none());
        assert!(!config.has_any());
        assert_eq!(config.timeout_or(2), 2);
        assert_eq!(config.rounds_or(1), 1);
    }

    #[test]
    fn test_env_load() {
        let _guard = EnvGuard::set(&[
            ("PRIMARY_URL", "http://calc.test:5000"),
            ("TIMEOUT", "7"),
            ("VERBOSE", "yes"),
            ("ROUNDS", "not-a-number"),
        ]);

        let config = EnvConfig::load();
        assert_eq!(config.primary_url.as_deref(), Some("http://calc.test:5000"));
        assert_eq!(config.timeout, Some(7));
        assert_eq!(config.verbose, Some(true));
        assert_eq!(config.rounds, None);
        assert!(config.has_any());
    }
}
