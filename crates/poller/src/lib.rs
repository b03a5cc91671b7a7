pub mod client;
pub mod poller;

use chrono::Utc;

use herald_common::config::AppConfig;
use herald_common::error::ConfigError;
use herald_notifier::TelegramNotifier;

use crate::client::ApiClient;
use crate::poller::PollLoop;

/// The production watcher: HTTP status source, Telegram delivery.
pub type Watcher = PollLoop<ApiClient, TelegramNotifier>;

/// Build a watcher from validated configuration, starting the poll window at
/// the current time.
pub fn build(config: &AppConfig) -> anyhow::Result<Watcher> {
    let source = ApiClient::from_config(config)?;
    let notifier = TelegramNotifier::from_config(config)?;

    Ok(PollLoop::new(
        source,
        notifier,
        config.retry_period,
        Utc::now().timestamp(),
    ))
}

/// Load configuration and build the watcher.
///
/// A configuration problem is fatal: it is logged and returned, and the
/// caller must exit without polling.
pub fn bootstrap<L>(load: L) -> anyhow::Result<Watcher>
where
    L: FnOnce() -> Result<AppConfig, ConfigError>,
{
    let config = match load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Required configuration missing, refusing to start");
            return Err(e.into());
        }
    };

    tracing::info!(
        endpoint = %config.status_endpoint,
        retry_period_secs = config.retry_period.as_secs(),
        http_timeout_secs = config.http_timeout.as_secs(),
        "Configuration loaded"
    );

    build(&config)
}
