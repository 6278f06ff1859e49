//! Configuration module for the contact backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the JSON collection files
    pub data_dir: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Maximum API requests per client IP within one rate-limit window
    pub rate_limit_max: u32,
    /// Length of the rate-limit window
    pub rate_limit_window: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let data_dir = env::var("CONTACT_DATA_DIR")
            .unwrap_or_else(|_| "./data".to_string())
            .into();

        let bind_addr = env::var("CONTACT_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .expect("Invalid CONTACT_BIND_ADDR format");

        let log_level = env::var("CONTACT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let rate_limit_max = env::var("CONTACT_RATE_LIMIT_MAX")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let rate_limit_window = env::var("CONTACT_RATE_LIMIT_WINDOW_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(15 * 60));

        Self {
            data_dir,
            bind_addr,
            log_level,
            rate_limit_max,
            rate_limit_window,
        }
    }
}
