//! Startup configuration and credential guard
//!
//! Handles:
//! - Required secrets (API token, bot token, recipient chat id)
//! - Optional tuning (endpoint, Bot API base, poll interval, timeouts)
//! - Fatal exit when a secret is missing

use std::fmt;
use std::time::Duration;
use tracing::error;

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(600);
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Secrets that must be present and non-empty, in reporting order.
pub const REQUIRED_SECRETS: [&str; 3] = ["PRACTICUM_TOKEN", "TELEGRAM_TOKEN", "TELEGRAM_CHAT_ID"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingSecrets(Vec<&'static str>),
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Immutable process configuration, built once in `main` and handed to each component.
#[derive(Clone)]
pub struct Config {
    pub practicum_token: String,
    pub telegram_token: String,
    pub chat_id: String,
    pub endpoint: String,
    pub telegram_api_url: String,
    pub poll_interval: Duration,
    pub http_timeout: Duration,
    pub notify_when_empty: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("endpoint", &self.endpoint)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("poll_interval", &self.poll_interval)
            .field("http_timeout", &self.http_timeout)
            .field("notify_when_empty", &self.notify_when_empty)
            .finish()
    }
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Every missing secret is reported at once, before optional values are parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let missing: Vec<&'static str> = REQUIRED_SECRETS
            .iter()
            .copied()
            .filter(|key| read(*key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingSecrets(missing));
        }

        let poll_interval = match read("POLL_INTERVAL") {
            Some(v) => parse_poll_interval(&v)?,
            None => DEFAULT_POLL_INTERVAL,
        };
        let http_timeout = match read("HTTP_TIMEOUT") {
            Some(v) => parse_duration("HTTP_TIMEOUT", &v)?,
            None => DEFAULT_HTTP_TIMEOUT,
        };
        let notify_when_empty = match read("NOTIFY_WHEN_EMPTY") {
            Some(v) => parse_flag("NOTIFY_WHEN_EMPTY", &v)?,
            None => false,
        };

        Ok(Self {
            practicum_token: read("PRACTICUM_TOKEN").unwrap_or_default(),
            telegram_token: read("TELEGRAM_TOKEN").unwrap_or_default(),
            chat_id: read("TELEGRAM_CHAT_ID").unwrap_or_default(),
            endpoint: read("PRACTICUM_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            telegram_api_url: read("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            poll_interval,
            http_timeout,
            notify_when_empty,
        })
    }

    /// Poll interval in whole seconds, as used for the `from_date` offset
    pub fn poll_interval_secs(&self) -> i64 {
        i64::try_from(self.poll_interval.as_secs()).unwrap_or(i64::MAX)
    }
}

/// Credential guard: returns the configuration or terminates the process with exit code 1.
///
/// Must run before any transport is built.
pub fn check_configuration() -> Config {
    match Config::from_env() {
        Ok(config) => config,
        Err(ConfigError::MissingSecrets(missing)) => {
            error!(
                "Missing required environment variables: {}",
                missing.join(", ")
            );
            std::process::exit(1);
        }
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    }
}

fn parse_duration(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    // Bare numbers are seconds
    let parsed = match value.parse::<u64>() {
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(_) => humantime::parse_duration(value).map_err(|e| e.to_string()),
    };
    match parsed {
        Ok(d) if d.is_zero() => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "must be greater than zero".to_string(),
        }),
        Ok(d) => Ok(d),
        Err(reason) => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason,
        }),
    }
}

/// The interval is also the `from_date` offset, so it must be whole seconds and fit an i64.
fn parse_poll_interval(value: &str) -> Result<Duration, ConfigError> {
    let interval = parse_duration("POLL_INTERVAL", value)?;
    let invalid = |reason: &str| ConfigError::Invalid {
        key: "POLL_INTERVAL",
        value: value.to_string(),
        reason: reason.to_string(),
    };
    if interval.subsec_nanos() != 0 {
        return Err(invalid("must be a whole number of seconds"));
    }
    if i64::try_from(interval.as_secs()).is_err() {
        return Err(invalid("too large"));
    }
    Ok(interval)
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}
