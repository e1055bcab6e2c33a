//! Configuration file management
//!
//! Handles finding, loading, and validating configuration files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::AppConfig;

/// Configuration file locations (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./calc-api-check.yaml",
    "./calc-api-check.yml",
    "./calc-api-check.json",
    "./.calc-api-check.yaml",
    "~/.calc-api-check.yaml",
];

/// Full configuration file structure
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Version of config file format
    #[serde(default = "default_version")]
    pub version: String,

    /// Application settings
    #[serde(default)]
    pub app: AppConfig,

    /// Named deployments, e.g. local and staging
    #[serde(default)]
    pub environments: Vec<EnvironmentConfig>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            version: default_version(),
            app: AppConfig::default(),
            environments: Vec::new(),
        }
    }
}

impl ConfigFile {
    /// Find configuration file in standard locations
    pub fn find() -> Option<PathBuf> {
        let mut candidates: Vec<PathBuf> = CONFIG_LOCATIONS.iter().map(|l| expand_path(l)).collect();
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("calc-api-check").join("config.yaml"));
        }

        candidates.into_iter().find(|path| path.exists())
    }

    /// Load configuration from default location
    pub fn load_default() -> Result<Self> {
        if let Some(path) = Self::find() {
            debug!("Using config file {}", path.display());
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_yaml_file(path) {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !["1.0"].contains(&self.version.as_str()) {
            anyhow::bail!("Unsupported config version: {}", self.version);
        }

        self.app.validate()?;

        for env in &self.environments {
            let mut app = self.app.clone();
            app.apply_environment(env);
            app.validate()
                .with_context(|| format!("Invalid environment '{}'", env.name))?;
        }

        Ok(())
    }

    /// Generate example configuration
    pub fn example() -> Self {
        Self {
            version: default_version(),
            app: AppConfig::default(),
            environments: vec![
                EnvironmentConfig::new("local", "http://localhost:5000", "http://localhost:9090"),
                EnvironmentConfig::new(
                    "docker",
                    "http://calc-api:5000",
                    "http://calc-mock:9090",
                )
                .with_timeout(5),
            ],
        }
    }

    /// Get environment by name
    pub fn environment(&self, name: &str) -> Option<&EnvironmentConfig> {
        self.environments.iter().find(|e| e.name == name)
    }
}

/// Environment-specific configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Environment name (e.g., "local", "staging")
    pub name: String,
    pub primary_url: String,
    pub mock_url: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl EnvironmentConfig {
    pub fn new(
        name: impl Into<String>,
        primary_url: impl Into<String>,
        mock_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            primary_url: primary_url.into(),
            mock_url: mock_url.into(),
            timeout_secs: None,
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }
}

/// Expand ~ to home directory
fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Check if file is YAML based on extension
fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}
