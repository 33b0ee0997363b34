use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use crate::error::{Error, Result};

/// Where the default configuration is fetched from on first run
pub const DEFAULT_CONFIG_URL: &str =
    "https://raw.githubusercontent.com/tsubasaogawa/manage-agent-skills/main/config.toml";

/// Logging section of config.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter level for stderr output
    pub level: String,
    /// Output format: "pretty", "json" or "compact"
    pub format: String,
    /// Also write JSON logs to the rolling log directory
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), format: "pretty".to_string(), file: false }
    }
}

impl LoggingConfig {
    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Root configuration structure for config.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Agent name to agent skill directory (may start with `~/`)
    #[serde(default)]
    pub agents: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "LoggingConfig::is_default")]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from a TOML string
    pub fn from_toml_str(toml_str: &str) -> std::result::Result<Self, String> {
        let config: Config = toml::from_str(toml_str).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::ConfigSerialize(e.to_string()))
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.agents.keys().any(|name| name.trim().is_empty()) {
            return Err("agent names must be non-empty".to_string());
        }
        Ok(())
    }

    /// Get the raw (unexpanded) skill directory of an agent
    pub fn agent_dir(&self, name: &str) -> Result<&str> {
        self.agents
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| Error::AgentNotFound(name.to_string()))
    }

    /// Raw skill directories of every configured agent
    pub fn agent_dirs(&self) -> Vec<&str> {
        self.agents.values().map(String::as_str).collect()
    }

    /// Get all agent names, sorted
    pub fn agent_names(&self) -> Vec<String> {
        self.agents.keys().cloned().collect()
    }

    /// Add or replace an agent, returning the previous directory if any
    pub fn set_agent(&mut self, name: impl Into<String>, dir: impl Into<String>) -> Option<String> {
        self.agents.insert(name.into(), dir.into())
    }

    /// Remove an agent from the mapping
    pub fn remove_agent(&mut self, name: &str) -> Result<String> {
        self.agents
            .remove(name)
            .ok_or_else(|| Error::AgentNotFound(name.to_string()))
    }

    /// Get example configuration (as a string)
    /// Note: This mirrors the document served from [`DEFAULT_CONFIG_URL`]
    pub fn example() -> &'static str {
        r#"# Configuration file for skillman
# Map each agent name to the directory it loads skills from.
# Paths starting with "~/" are relative to your home directory.

[agents]
claude = "~/.claude/skills"
codex = "~/.codex/skills"
gemini = "~/.gemini/skills"
copilot = "~/.copilot/skills"

# Optional logging settings
# [logging]
# level = "warn"
# format = "pretty"
# file = false
"#
    }
}

/// Source of the default configuration document
pub trait ConfigSource {
    /// Fetch the document at `url` and return its body verbatim
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Fetches the default configuration over plain HTTP(S)
///
/// The HTTP client is only built on the first fetch.
#[derive(Debug, Clone, Default)]
pub struct HttpSource {
    client: OnceLock<reqwest::blocking::Client>,
}

impl HttpSource {
    const TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new() -> Self {
        Self::default()
    }

    fn client(&self, url: &str) -> Result<&reqwest::blocking::Client> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(Self::TIMEOUT)
            .build()
            .map_err(|e| Error::config_fetch(url, e))?;
        Ok(self.client.get_or_init(|| client))
    }
}

impl ConfigSource for HttpSource {
    fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client(url)?.get(url).send().map_err(|e| Error::config_fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::config_fetch(url, format!("HTTP {}", status.as_u16())));
        }

        response.text().map_err(|e| Error::config_fetch(url, e))
    }
}

/// Loads and saves config.toml, bootstrapping it from a remote default when absent
#[derive(Debug, Clone)]
pub struct ConfigStore<S = HttpSource> {
    path: PathBuf,
    url: String,
    source: S,
}

impl ConfigStore<HttpSource> {
    /// Create a store that fetches from [`DEFAULT_CONFIG_URL`] over HTTP
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_source(path, DEFAULT_CONFIG_URL, HttpSource::new())
    }
}

impl<S: ConfigSource> ConfigStore<S> {
    /// Create a store with a custom remote URL and source
    pub fn with_source(path: impl Into<PathBuf>, url: impl Into<String>, source: S) -> Self {
        Self { path: path.into(), url: url.into(), source }
    }

    /// Location of the config file this store manages
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// URL the default configuration is fetched from
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Load the configuration, downloading the default document first if the file is missing
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), url = %self.url, "config not found, fetching default");
            self.bootstrap()?;
        }

        let content =
            fs::read_to_string(&self.path).map_err(|source| Error::ConfigRead { path: self.path.clone(), source })?;
        let config = Config::from_toml_str(&content).map_err(|reason| Error::config_parse(&self.path, reason))?;

        tracing::debug!(path = %self.path.display(), agents = config.agents.len(), "loaded config");
        Ok(config)
    }

    /// Write the configuration back to disk
    pub fn save(&self, config: &Config) -> Result<()> {
        let content = config.to_toml_string()?;
        self.write(&content)?;
        tracing::debug!(path = %self.path.display(), agents = config.agents.len(), "saved config");
        Ok(())
    }

    fn bootstrap(&self) -> Result<()> {
        let body = self.source.fetch(&self.url)?;
        self.write(&body)
    }

    fn write(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::config_write(parent, e))?;
        }
        fs::write(&self.path, content).map_err(|e| Error::config_write(&self.path, e))
    }
}
