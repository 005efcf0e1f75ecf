//! Stream configuration

use std::env;
use std::time::Duration;

/// First reconnect delay.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Ceiling for the reconnect delay.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

/// Growth applied to the delay after every failed attempt.
pub const DEFAULT_BACKOFF_FACTOR: f64 = 1.5;

/// Automatic reconnect attempts before giving up.
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 10;

/// Interval of the liveness check that revives dead streams.
pub const DEFAULT_HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(30);

/// Configuration for the live update stream.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// SSE endpoint serving stock notifications.
    pub endpoint: String,

    /// API key attached to the stream request, when the server requires one.
    pub api_key: Option<String>,

    /// Master switch; when false the subsystem does not run at all.
    pub enabled: bool,

    /// First reconnect delay.
    pub base_delay: Duration,

    /// Ceiling the reconnect delay grows toward.
    pub max_delay: Duration,

    /// Multiplier applied to the delay after every failed attempt.
    pub backoff_factor: f64,

    /// Automatic reconnect attempts before entering the failed state.
    pub max_reconnect_attempts: u32,

    /// Cadence of the liveness check.
    pub health_check_interval: Duration,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:3000/api/notifications/stream".to_string(),
            api_key: None,
            enabled: true,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            max_reconnect_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
            health_check_interval: DEFAULT_HEALTH_CHECK_INTERVAL,
        }
    }
}

impl StreamConfig {
    /// Build a config for the given endpoint with default tuning.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Load from environment variables, falling back to defaults:
    ///
    /// - `STOCK_NOTIFY_URL` - stream endpoint
    /// - `STOCK_NOTIFY_API_KEY` - credential attached to the request
    /// - `STOCK_NOTIFY_ENABLED` - `0`/`false` disables the subsystem
    /// - `STOCK_NOTIFY_MAX_ATTEMPTS` - automatic retry budget
    /// - `STOCK_NOTIFY_HEALTH_SECS` - liveness check interval, seconds
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = env::var("STOCK_NOTIFY_URL") {
            config.endpoint = v;
        }
        if let Ok(v) = env::var("STOCK_NOTIFY_API_KEY") {
            if !v.is_empty() {
                config.api_key = Some(v);
            }
        }
        if let Ok(v) = env::var("STOCK_NOTIFY_ENABLED") {
            config.enabled = !matches!(v.trim(), "0" | "false" | "no" | "off");
        }
        if let Ok(v) = env::var("STOCK_NOTIFY_MAX_ATTEMPTS") {
            config.max_reconnect_attempts = v.parse().unwrap_or(config.max_reconnect_attempts);
        }
        if let Ok(v) = env::var("STOCK_NOTIFY_HEALTH_SECS") {
            config.health_check_interval = v
                .parse()
                .map(Duration::from_secs)
                .unwrap_or(config.health_check_interval);
        }

        config
    }
}
