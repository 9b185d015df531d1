//! Configuration management for the docvault server

use anyhow::{Context, Result};
use docvault_team::security::InheritanceMode;
use docvault_team::VaultConfig;
use serde::Deserialize;
use std::str::FromStr;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server host (default: 0.0.0.0)
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Database URL (default: sqlite://./data/docvault.db?mode=rwc)
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Maximum database connections (default: 10)
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// CORS allowed origins (comma-separated). If empty, any origin is allowed (dev mode).
    pub cors_allowed_origins: Option<String>,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Header carrying the user id set by the upstream identity service
    #[serde(default = "default_identity_header")]
    pub identity_header: String,

    /// Folder and permission settings
    #[serde(default)]
    pub vault: VaultConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_database_url() -> String {
    "sqlite://./data/docvault.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_identity_header() -> String {
    "x-user-id".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("DOCVAULT_HOST").unwrap_or_else(|_| default_host());
        let port = std::env::var("DOCVAULT_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(default_port);
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| default_database_url());
        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(default_max_connections);
        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS").ok();
        let log_format = match std::env::var("LOG_FORMAT") {
            Ok(raw) => raw.parse().map_err(anyhow::Error::msg)?,
            Err(_) => LogFormat::default(),
        };
        let identity_header =
            std::env::var("IDENTITY_HEADER").unwrap_or_else(|_| default_identity_header());

        // Validate inheritance mode to prevent silent fallthrough on typos
        let inheritance_mode = match std::env::var("INHERITANCE_MODE") {
            Ok(raw) => raw
                .parse::<InheritanceMode>()
                .map_err(anyhow::Error::msg)
                .context("Invalid INHERITANCE_MODE. Must be one of: one_level, transitive")?,
            Err(_) => InheritanceMode::default(),
        };

        Ok(Self {
            host,
            port,
            database_url,
            max_connections,
            cors_allowed_origins,
            log_format,
            identity_header,
            vault: VaultConfig::default().with_inheritance_mode(inheritance_mode),
        })
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file")?;
        Ok(config)
    }

    /// Allowed CORS origins, empty when any origin is accepted
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: default_database_url(),
            max_connections: default_max_connections(),
            cors_allowed_origins: None,
            log_format: LogFormat::default(),
            identity_header: default_identity_header(),
            vault: VaultConfig::default(),
        }
    }
}
