//! Startup configuration from the environment

use crate::conversation::{Locale, UnsupportedLocale};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GOAL_CHAT_PORT must be a port number, got {0:?}")]
    InvalidPort(String),
    #[error("GOAL_CHAT_TIMEOUT_SECS must be a positive number of seconds, got {0:?}")]
    InvalidTimeout(String),
    #[error("GOAL_CHAT_ENDPOINT must be an http(s) URL, got {0:?}")]
    InvalidEndpoint(String),
    #[error("GOAL_CHAT_LOCALE: {0}")]
    InvalidLocale(#[from] UnsupportedLocale),
}

/// Process configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Local port the page and API are served on
    pub port: u16,
    /// Base URL of the remote assistant
    pub endpoint: String,
    pub locale: Locale,
    /// Per-request timeout for the assistant call
    pub timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            locale: Locale::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match lookup("GOAL_CHAT_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => defaults.port,
        };

        let endpoint = match lookup("GOAL_CHAT_ENDPOINT") {
            Some(raw) => {
                let trimmed = raw.trim();
                if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                    return Err(ConfigError::InvalidEndpoint(raw));
                }
                trimmed.trim_end_matches('/').to_string()
            }
            None => defaults.endpoint,
        };

        let locale = match lookup("GOAL_CHAT_LOCALE") {
            Some(raw) => raw.parse::<Locale>()?,
            None => defaults.locale,
        };

        let timeout = match lookup("GOAL_CHAT_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => defaults.timeout,
        };

        Ok(Self {
            port,
            endpoint,
            locale,
            timeout,
        })
    }
}
