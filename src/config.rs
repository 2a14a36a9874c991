//! Application Configuration
//!
//! All settings come from environment variables (optionally seeded from a `.env` file),
//! each with a default suitable for local development.

use crate::cache::refresh::RefreshSettings;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_EXTERNAL_API_URL: &str = "https://november7-730026606190.europe-west1.run.app";

#[derive(Debug, Clone)]
pub struct Settings {
    pub app_name: String,
    pub environment: String,
    pub server_host: String,
    pub server_port: u16,
    pub external_api_url: String,
    pub external_api_endpoint: String,
    /// Per-request timeout for the message source, in seconds.
    pub external_api_timeout: u64,
    pub incremental_refresh_seconds: u64,
    pub full_refresh_hours: u64,
    /// Page size of a full refresh.
    pub fetch_limit: usize,
    /// Page size of an incremental refresh.
    pub incremental_fetch_limit: usize,
    pub log_level: tracing::Level,
    /// Rotated log file written next to console output. An empty `LOG_FILE` disables it.
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            app_name: text("APP_NAME", "Search API"),
            environment: text("ENVIRONMENT", "development"),
            server_host: text("SERVER_HOST", "0.0.0.0"),
            server_port: parse_or(&lookup, "SERVER_PORT", 8000)?,
            external_api_url: text("EXTERNAL_API_URL", DEFAULT_EXTERNAL_API_URL),
            external_api_endpoint: text("EXTERNAL_API_ENDPOINT", "/messages/"),
            external_api_timeout: parse_or(&lookup, "EXTERNAL_API_TIMEOUT", 30)?,
            incremental_refresh_seconds: parse_or(&lookup, "INCREMENTAL_REFRESH_SECONDS", 15)?,
            full_refresh_hours: parse_or(&lookup, "FULL_REFRESH_HOURS", 6)?,
            fetch_limit: parse_or(&lookup, "FETCH_LIMIT", 10_000)?,
            incremental_fetch_limit: parse_or(&lookup, "INCREMENTAL_FETCH_LIMIT", 200)?,
            log_level: parse_or(&lookup, "LOG_LEVEL", tracing::Level::INFO)?,
            log_file: Some(text("LOG_FILE", "logs/app.log"))
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    pub fn is_debug(&self) -> bool {
        self.environment == "development"
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    pub fn full_api_url(&self) -> String {
        format!(
            "{}{}",
            self.external_api_url.trim_end_matches('/'),
            self.external_api_endpoint
        )
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.external_api_timeout)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server_host, self.server_port)
            .parse()
            .with_context(|| {
                format!(
                    "invalid bind address {}:{}",
                    self.server_host, self.server_port
                )
            })
    }

    pub fn refresh_settings(&self) -> RefreshSettings {
        RefreshSettings {
            full_refresh_interval: Duration::from_secs(self.full_refresh_hours * 60 * 60),
            incremental_interval: Duration::from_secs(self.incremental_refresh_seconds),
            full_fetch_limit: self.fetch_limit,
            incremental_fetch_limit: self.incremental_fetch_limit,
        }
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: <T as FromStr>::Err| anyhow::anyhow!("invalid {}={:?}: {}", key, raw, e)),
        None => Ok(default),
    }
}
