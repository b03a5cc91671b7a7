use std::time::Duration;

use crate::error::ConfigError;

/// Default review-status endpoint.
pub const DEFAULT_STATUS_ENDPOINT: &str =
    "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Default Telegram Bot API base URL.
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Default append-only log file.
pub const DEFAULT_LOG_FILE: &str = "program.log";

/// Names of the variables that must be present before the watcher may start.
pub const REQUIRED_VARS: [&str; 3] = ["PRACTICUM_TOKEN", "TELEGRAM_TOKEN", "TELEGRAM_CHAT_ID"];

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// OAuth token for the review-status API
    pub practicum_token: String,

    /// Telegram bot token
    pub telegram_token: String,

    /// Destination chat identifier (numeric id or `@channel`)
    pub telegram_chat_id: String,

    /// Review-status endpoint URL
    pub status_endpoint: String,

    /// Telegram Bot API base URL
    pub telegram_api_base: String,

    /// Fixed pause between cycles (default: 600 seconds)
    pub retry_period: Duration,

    /// Per-request timeout for every outbound HTTP call (default: 30 seconds)
    pub http_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables (and `.env`, if any).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Empty values count as missing. Every missing required variable is
    /// reported at once so the operator can fix them in one go.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let missing: Vec<&'static str> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|key| get(*key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let practicum_token = get("PRACTICUM_TOKEN").unwrap_or_default();
        let telegram_token = get("TELEGRAM_TOKEN").unwrap_or_default();
        let telegram_chat_id = get("TELEGRAM_CHAT_ID").unwrap_or_default();

        Ok(Self {
            practicum_token,
            telegram_token,
            telegram_chat_id,
            status_endpoint: get("STATUS_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_STATUS_ENDPOINT.to_string()),
            telegram_api_base: get("TELEGRAM_API_BASE")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string()),
            retry_period: Duration::from_secs(parse_secs(
                "RETRY_PERIOD_SECS",
                get("RETRY_PERIOD_SECS"),
                600,
            )?),
            http_timeout: Duration::from_secs(parse_secs(
                "HTTP_TIMEOUT_SECS",
                get("HTTP_TIMEOUT_SECS"),
                30,
            )?),
        })
    }
}

/// Resolve the log file path from the raw `HERALD_LOG_FILE` value.
///
/// Read before the rest of the configuration so that a fatal configuration
/// error already reaches the log file. Unset means the default `program.log`;
/// an explicitly empty value turns the file sink off.
pub fn log_file_setting(raw: Option<String>) -> Option<String> {
    match raw {
        Some(path) if path.trim().is_empty() => None,
        Some(path) => Some(path),
        None => Some(DEFAULT_LOG_FILE.to_string()),
    }
}

fn parse_secs(var: &'static str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            var,
            reason: "must be greater than zero".to_string(),
        }),
        Ok(secs) => Ok(secs),
        Err(_) => Err(ConfigError::Invalid {
            var,
            reason: format!("{raw:?} is not a valid number of seconds"),
        }),
    }
}
