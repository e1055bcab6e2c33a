//! Configuration module
//!
//! Handles loading and layering configuration. Precedence, lowest first:
//! built-in defaults, config file, named environment, environment
//! variables, command-line flags.

mod env;
mod file;

pub use env::{print_env_help, EnvConfig};
pub use file::{ConfigFile, EnvironmentConfig};

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{
    ServiceEndpoints, TestCase, TestConfig, DEFAULT_MOCK_URL, DEFAULT_PRIMARY_URL,
    DEFAULT_TIMEOUT_SECS,
};

/// Values supplied on the command line
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<String>,
    pub environment: Option<String>,
    pub primary_url: Option<String>,
    pub mock_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub rounds: Option<u32>,
    pub format: Option<String>,
}

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the live calculator API
    pub primary_url: String,

    /// Base URL of the mock server
    pub mock_url: String,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,

    /// Default number of test rounds
    pub rounds: u32,

    /// Output format (table, json, json-pretty, csv, summary)
    pub format: String,

    /// Test numbers to skip
    pub skip_tests: Vec<u8>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            primary_url: DEFAULT_PRIMARY_URL.to_string(),
            mock_url: DEFAULT_MOCK_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            rounds: 1,
            format: "table".to_string(),
            skip_tests: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Build the effective configuration from every layer
    pub fn resolve(overrides: &ConfigOverrides, env: &EnvConfig) -> Result<Self> {
        let path = overrides
            .config_path
            .as_ref()
            .or(env.config_file.as_ref());
        let file = match path {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::load_default()?,
        };

        let mut app = file.app.clone();

        if let Some(name) = overrides.environment.as_ref().or(env.environment.as_ref()) {
            let Some(environment) = file.environment(name) else {
                bail!("Unknown environment: {name}");
            };
            debug!("Using environment '{}'", environment.name);
            app.apply_environment(environment);
        }

        app.apply_env(env);

        if let Some(url) = &overrides.primary_url {
            app.primary_url = url.clone();
        }
        if let Some(url) = &overrides.mock_url {
            app.mock_url = url.clone();
        }
        if let Some(timeout) = overrides.timeout_secs {
            app.timeout_secs = timeout;
        }
        if let Some(rounds) = overrides.rounds {
            app.rounds = rounds;
        }
        if let Some(format) = &overrides.format {
            app.format = format.clone();
        }

        app.validate()?;
        Ok(app)
    }

    /// Apply environment variable overrides
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(url) = &env.primary_url {
            self.primary_url = url.clone();
        }
        if let Some(url) = &env.mock_url {
            self.mock_url = url.clone();
        }
        self.timeout_secs = env.timeout_or(self.timeout_secs);
        self.rounds = env.rounds_or(self.rounds);
        if let Some(format) = &env.format {
            self.format = format.clone();
        }
    }

    /// Apply a named environment from the config file
    pub fn apply_environment(&mut self, environment: &EnvironmentConfig) {
        self.primary_url = environment.primary_url.clone();
        self.mock_url = environment.mock_url.clone();
        if let Some(timeout) = environment.timeout_secs {
            self.timeout_secs = timeout;
        }
    }

    /// Validate configuration before any request is made
    pub fn validate(&self) -> Result<()> {
        validate_url("primary_url", &self.primary_url)?;
        validate_url("mock_url", &self.mock_url)?;

        if self.timeout_secs == 0 {
            bail!("timeout_secs must be greater than zero");
        }
        if self.rounds == 0 {
            bail!("rounds must be at least 1");
        }
        if let Some(n) = self
            .skip_tests
            .iter()
            .find(|n| TestCase::from_number(**n).is_none())
        {
            bail!("Invalid test number {n} in skip_tests. Valid range: 1-5");
        }

        Ok(())
    }

    pub fn endpoints(&self) -> ServiceEndpoints {
        ServiceEndpoints::new(&self.primary_url, &self.mock_url)
    }

    pub fn to_test_config(&self) -> TestConfig {
        let mut config = TestConfig::new(self.endpoints())
            .with_rounds(self.rounds)
            .with_timeout(self.timeout_secs);
        for n in &self.skip_tests {
            config = config.skip_test(*n);
        }
        config
    }
}

fn validate_url(field: &str, url: &str) -> Result<()> {
    if url.len() <= 8 {
        bail!("{field} is not configured: {url:?}");
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        bail!("{field} must start with http:// or https://, got {url:?}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.primary_url, "http://localhost:5000");
        assert_eq!(config.mock_url, "http://localhost:9090");
        assert_eq!(config.timeout_secs, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_url() {
        let config = AppConfig {
            primary_url: "http://".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("primary_url is not configured"));
    }

    #[test]
    fn test_validate_rejects_scheme() {
        let config = AppConfig {
            mock_url: "ftp://localhost:9090".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout_and_bad_skip() {
        let config = AppConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            skip_tests: vec![9],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_env() {
        let mut config = AppConfig::default();
        let env = EnvConfig {
            primary_url: Some("http://calc.internal:8080".to_string()),
            timeout: Some(10),
            ..Default::default()
        };

        config.apply_env(&env);
        assert_eq!(config.primary_url, "http://calc.internal:8080");
        assert_eq!(config.mock_url, "http://localhost:9090");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_resolve_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calc.yaml");
        let mut file = ConfigFile::example();
        file.app.rounds = 4;
        file.save(&path).unwrap();

        let overrides = ConfigOverrides {
            config_path: Some(path.to_string_lossy().to_string()),
            environment: Some("docker".to_string()),
            mock_url: Some("http://127.0.0.1:9999".to_string()),
            ..Default::default()
        };
        let env = EnvConfig {
            timeout: Some(9),
            ..Default::default()
        };

        let app = AppConfig::resolve(&overrides, &env).unwrap();
        assert_eq!(app.primary_url, "http://calc-api:5000");
        assert_eq!(app.mock_url, "http://127.0.0.1:9999");
        assert_eq!(app.timeout_secs, 9);
        assert_eq!(app.rounds, 4);
    }

    #[test]
    fn test_resolve_unknown_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calc.json");
        ConfigFile::default().save(&path).unwrap();

        let overrides = ConfigOverrides {
            config_path: Some(path.to_string_lossy().to_string()),
            environment: Some("prod".to_string()),
            ..Default::default()
        };
        let err = AppConfig::resolve(&overrides, &EnvConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Unknown environment: prod"));
    }

    #[test]
    fn test_resolve_rejects_bad_cli_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calc.yaml");
        ConfigFile::default().save(&path).unwrap();

        let overrides = ConfigOverrides {
            config_path: Some(path.to_string_lossy().to_string()),
            primary_url: Some("localhost:5000".to_string()),
            ..Default::default()
        };
        assert!(AppConfig::resolve(&overrides, &EnvConfig::default()).is_err());
    }

    #[test]
    fn test_to_test_config() {
        let config = AppConfig {
            rounds: 3,
            skip_tests: vec![2],
            ..Default::default()
        };
        let test_config = config.to_test_config();
        assert_eq!(test_config.rounds, 3);
        assert_eq!(test_config.skip_tests, vec![2]);
        assert_eq!(test_config.endpoints.mock_url, "http://localhost:9090");
    }
}
