//! # Process Configuration
//!
//! [`AppConfig`] is read from environment variables through a lookup
//! function, so tests can supply a map instead of mutating the process
//! environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `APP_ENV` | `development` (unknown values fall back to it) |
//! | `HOST` | `127.0.0.1` |
//! | `PORT` | 8050 / 8051 / 8052 by profile |
//! | `DEBUG` | on for development and staging |
//! | `ALLOWED_IPS` | empty, allow-list disabled |
//! | `GEODASH_SEED` | 42 |
//! | `GEODASH_TAXONOMY` | built-in taxonomy |
//! | `GEODASH_MAX_SESSIONS` | 10000 |

use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;

use geodash_core::DEFAULT_SEED;
use thiserror::Error;

/// Live sessions allowed when `GEODASH_MAX_SESSIONS` is unset.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Deployment profile selected by `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Parse a profile name. Unknown names map to development.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "staging" => Self::Staging,
            "production" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Self::Development => 8050,
            Self::Staging => 8051,
            Self::Production => 8052,
        }
    }

    pub fn default_debug(&self) -> bool {
        !matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors parsing configuration values.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a port number, got {value:?}")]
    InvalidPort { value: String },

    #[error("GEODASH_SEED must be an unsigned integer, got {value:?}")]
    InvalidSeed { value: String },

    #[error("ALLOWED_IPS contains an invalid address: {value:?}")]
    InvalidAllowedIp { value: String },

    #[error("GEODASH_MAX_SESSIONS must be a positive integer, got {value:?}")]
    InvalidMaxSessions { value: String },
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    pub debug: bool,
    /// Addresses allowed to reach the API. Empty disables the check.
    pub allowed_ips: Vec<IpAddr>,
    pub seed: u64,
    pub taxonomy_path: Option<PathBuf>,
    /// Upper bound on live sessions. Creating one more fails with 503.
    pub max_sessions: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_environment(Environment::Development)
    }
}

impl AppConfig {
    /// Profile defaults with no overrides.
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            host: "127.0.0.1".to_string(),
            port: environment.default_port(),
            debug: environment.default_debug(),
            allowed_ips: Vec::new(),
            seed: DEFAULT_SEED,
            taxonomy_path: None,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value
    /// or `None` when unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("APP_ENV")
            .map(|v| Environment::parse(&v))
            .unwrap_or_default();
        let mut config = Self::for_environment(environment);

        if let Some(host) = lookup("HOST").filter(|h| !h.trim().is_empty()) {
            config.host = host.trim().to_string();
        }
        if let Some(port) = lookup("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort { value: port.clone() })?;
        }
        if let Some(debug) = lookup("DEBUG") {
            config.debug = parse_flag(&debug);
        }
        if let Some(ips) = lookup("ALLOWED_IPS") {
            config.allowed_ips = parse_allowed_ips(&ips)?;
        }
        if let Some(seed) = lookup("GEODASH_SEED") {
            config.seed = seed
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidSeed { value: seed.clone() })?;
        }
        if let Some(path) = lookup("GEODASH_TAXONOMY").filter(|p| !p.trim().is_empty()) {
            config.taxonomy_path = Some(PathBuf::from(path.trim()));
        }
        if let Some(max) = lookup("GEODASH_MAX_SESSIONS") {
            config.max_sessions = max
                .trim()
                .parse()
                .ok()
                .filter(|&n: &usize| n > 0)
                .ok_or_else(|| ConfigError::InvalidMaxSessions { value: max.clone() })?;
        }

        Ok(config)
    }

    /// `host:port` for binding the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether `ip` may reach the API.
    pub fn is_allowed(&self, ip: &IpAddr) -> bool {
        self.allowed_ips.is_empty() || self.allowed_ips.contains(ip)
    }

    pub fn allow_list_enabled(&self) -> bool {
        !self.allowed_ips.is_empty()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim(), "True" | "true" | "1")
}

fn parse_allowed_ips(value: &str) -> Result<Vec<IpAddr>, ConfigError> {
    value
        .split_whitespace()
        .map(|entry| {
            entry.parse().map_err(|_| ConfigError::InvalidAllowedIp {
                value: entry.to_string(),
            })
        })
        .collect()
}
