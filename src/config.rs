//! Server configuration loaded from environment variables.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use axum::http::HeaderValue;
use serde::Deserialize;

/// Browser User-Agent sent with every outbound fetch.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/90.0.4430.93 Safari/537.36";

/// Server configuration, built once at startup and handed to the router.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// Bind address, read from `BIND_HOST`. Shells export `HOST` as the
    /// machine hostname, so the unprefixed name is not used.
    #[serde(rename = "bind_host", default = "default_host")]
    pub host: String,

    /// Bind port. Hosting platforms inject this as `PORT`.
    #[serde(default = "default_port")]
    pub port: u16,

    // === CORS ===
    /// Attach the CORS layer at all.
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Comma-separated origin allow-list. Empty means any origin.
    #[serde(default)]
    pub allowed_origins: Option<String>,

    // === Fetching ===
    /// Outbound fetch timeout in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// User-Agent header for outbound fetches.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub log_json: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: default_true(),
            allowed_origins: None,
            fetch_timeout_secs: default_fetch_timeout(),
            user_agent: default_user_agent(),
            rust_log: default_log_level(),
            log_json: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.parse::<IpAddr>().is_err() {
            return Err(format!("BIND_HOST {:?} is not an IP address", self.host));
        }

        if self.fetch_timeout_secs == 0 {
            return Err("FETCH_TIMEOUT_SECS must be greater than 0".to_string());
        }

        if self.user_agent.trim().is_empty() {
            return Err("USER_AGENT must not be empty".to_string());
        }

        for origin in self.origins() {
            if HeaderValue::from_str(&origin).is_err() {
                return Err(format!("ALLOWED_ORIGINS entry {origin:?} is not a valid header value"));
            }
        }

        Ok(())
    }

    /// Socket address to bind the HTTP server to.
    pub fn bind_addr(&self) -> Result<SocketAddr, String> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|e| format!("invalid BIND_HOST {:?}: {}", self.host, e))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Outbound fetch timeout.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Parsed origin allow-list; empty when any origin is allowed.
    pub fn origins(&self) -> Vec<String> {
        self.allowed_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}
