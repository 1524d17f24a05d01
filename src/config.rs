use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::auth::Credentials;
use crate::dci::{ConnectionSettings, DEFAULT_BASE_URL};

const FILE_CANDIDATES: [&str; 4] = ["dcilens.toml", "dcilens.json", "dcilens.yaml", "dcilens.yml"];

/// Configuration file structure for dcilens.
///
/// Holds the DCI connection and output preferences so they need not be
/// repeated on every invocation. Command line flags and environment
/// variables take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub dci: DciConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DciConfig {
    /// DCI control server URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User login for basic authentication
    pub login: Option<String>,

    /// User password for basic authentication
    pub password: Option<String>,

    /// Bearer token, used instead of login/password when set
    pub token: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries on network errors, rate limits and server errors
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Pause between retries in seconds
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

impl Default for DciConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            login: None,
            password: None,
            token: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_delay_secs: default_retry_delay_secs(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_secs() -> u64 {
    2
}

impl DciConfig {
    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            base_url: self.base_url.clone(),
            credentials: Credentials::resolve(
                self.login.as_deref(),
                self.password.as_deref(),
                self.token.as_deref(),
            ),
            timeout: Duration::from_secs(self.timeout_secs),
            max_retries: self.max_retries,
            retry_delay: Duration::from_secs(self.retry_delay_secs),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path (must exist)
    /// 2. ./dcilens.toml, ./dcilens.json, ./dcilens.yaml, ./dcilens.yml
    /// 3. the same names under the user config directory's `dcilens/`
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let mut search_dirs = vec![PathBuf::from(".")];
        if let Some(config_dir) = dirs::config_dir() {
            search_dirs.push(config_dir.join("dcilens"));
        }

        match discover(&search_dirs) {
            Some(path) => {
                log::debug!("Using config file: {}", path.display());
                Self::load_from_path(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => toml::from_str(&contents)
                .or_else(|_| serde_json::from_str(&contents))
                .or_else(|_| serde_yaml::from_str(&contents))
                .with_context(|| format!("Failed to parse config file: {}", path.display())),
        }
    }
}

/// First existing candidate file, searching `dirs` in order.
fn discover(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| FILE_CANDIDATES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}
