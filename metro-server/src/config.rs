//! Server configuration from the environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::feed::DEFAULT_FEED_URL;
use crate::store::DEFAULT_CACHE_PATH;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 5134;

/// Default interval between feed refreshes (1 hour).
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Errors from reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Per-client request limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests allowed per window
    pub max_requests: u32,
    /// Window length
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(15 * 60),
        }
    }
}

/// Everything `main` needs to start the server.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub cache_path: PathBuf,
    pub refresh_interval: Duration,
    pub feed_url: String,
    /// Serve this saved feed file instead of calling the API
    pub mock_feed: Option<PathBuf>,
    pub rate_limit: RateLimitConfig,
}

impl ServerConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self {
            port: DEFAULT_PORT,
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            feed_url: DEFAULT_FEED_URL.to_string(),
            mock_feed: None,
            rate_limit: RateLimitConfig::default(),
        }
    }

    /// Read the config from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the config through `lookup`, which returns a variable's value if set.
    ///
    /// Unset or blank variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::new();

        if let Some(v) = get("PORT") {
            config.port = parse_var("PORT", &v, "a port number")?;
        }
        if let Some(v) = get("METRO_CACHE_PATH") {
            config.cache_path = PathBuf::from(v);
        }
        if let Some(v) = get("METRO_REFRESH_SECS") {
            let secs: u64 = parse_var("METRO_REFRESH_SECS", &v, "a positive number of seconds")?;
            if secs == 0 {
                return Err(invalid("METRO_REFRESH_SECS", v, "a positive number of seconds"));
            }
            config.refresh_interval = Duration::from_secs(secs);
        }
        if let Some(v) = get("METRO_FEED_URL") {
            config.feed_url = v;
        }
        if let Some(v) = get("METRO_MOCK_FEED") {
            config.mock_feed = Some(PathBuf::from(v));
        }
        if let Some(v) = get("METRO_RATE_LIMIT_MAX") {
            config.rate_limit.max_requests =
                parse_var("METRO_RATE_LIMIT_MAX", &v, "a request count")?;
        }
        if let Some(v) = get("METRO_RATE_LIMIT_WINDOW_SECS") {
            let secs: u64 =
                parse_var("METRO_RATE_LIMIT_WINDOW_SECS", &v, "a positive number of seconds")?;
            if secs == 0 {
                return Err(invalid(
                    "METRO_RATE_LIMIT_WINDOW_SECS",
                    v,
                    "a positive number of seconds",
                ));
            }
            config.rate_limit.window = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Set the listening port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the cache file path.
    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = path.into();
        self
    }

    /// Serve a saved feed file instead of the API.
    pub fn with_mock_feed(mut self, path: impl Into<PathBuf>) -> Self {
        self.mock_feed = Some(path.into());
        self
    }

    /// Set the per-client request limit.
    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_var<T: std::str::FromStr>(
    var: &'static str,
    value: &str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(var, value.to_string(), expected))
}

fn invalid(var: &'static str, value: String, expected: &'static str) -> ConfigError {
    ConfigError::Invalid {
        var,
        value,
        expected,
    }
}
