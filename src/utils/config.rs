//! Service configuration, read from a TOML file.
use serde::Deserialize;
use std::fs::read_to_string;
use std::path::Path;

/// Default name of the configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "milestones.toml";

/// Top level configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Milestone behaviour.
    pub milestones: MilestonesConfig,
    /// Log output.
    pub logging: LoggingConfig,
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_owned(),
            port: 8080,
        }
    }
}

/// `[database]` section.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx connection url. `DATABASE_URL` takes precedence when set.
    pub url: String,
    /// Upper bound of the connection pool.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://milestones.sqlite3?mode=rwc".to_owned(),
            max_connections: 50,
        }
    }
}

/// `[milestones]` section.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MilestonesConfig {
    /// Path segment of the article plugin pages, `/article/{id}/_plugin/{slug}/`.
    pub slug: String,
    /// Let requests without a known user read article milestones and write to articles.
    pub allow_anonymous: bool,
    /// Look-ahead in days of a `[milestones]` directive without `days`, `start_date` or `end_date`.
    pub default_days: u32,
}

impl Default for MilestonesConfig {
    fn default() -> Self {
        Self {
            slug: "milestones".to_owned(),
            allow_anonymous: false,
            default_days: 30,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<String>,
}

impl Config {
    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    /// Errors if the string is not valid TOML or has fields of the wrong type.
    pub fn parse(config_str: &str) -> anyhow::Result<Self> {
        let conf: Self = toml::from_str(config_str)?;
        if conf.milestones.slug.trim_matches('/').is_empty() {
            anyhow::bail!("`milestones.slug` must not be empty");
        }
        Ok(conf)
    }

    /// Load configuration from `path`.
    /// A missing file yields the defaults.
    ///
    /// # Errors
    /// Errors if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at '{}', using defaults", path.display());
            return Ok(Self::default());
        }
        let config_str = read_to_string(path)?;
        Self::parse(&config_str)
    }
}
