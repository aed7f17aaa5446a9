use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_SEARCH_API_URL: &str = "https://api.github.com/search/repositories";
pub const DEFAULT_PORT: u16 = 3978;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Runtime settings. Built once at startup and passed to whatever needs it.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub search_api_url: String,
    pub search_timeout: Duration,
    pub user_agent: String,
    pub log_level: tracing::Level,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            search_api_url: DEFAULT_SEARCH_API_URL.to_string(),
            search_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: default_user_agent(),
            log_level: tracing::Level::INFO,
        }
    }
}

impl Config {
    /// Reads settings from the environment, loading `.env` first if present.
    pub fn from_env() -> Result<Config> {
        dotenv().ok();
        let defaults = Config::default();

        let timeout_secs: u64 =
            parse_env_or_default("SEARCH_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        Ok(Config {
            host: get_env_or_default("HOST", &defaults.host),
            port: parse_env_or_default("PORT", DEFAULT_PORT)?,
            search_api_url: get_env_or_default("SEARCH_API_URL", &defaults.search_api_url),
            search_timeout: Duration::from_secs(timeout_secs),
            user_agent: get_env_or_default("SEARCH_USER_AGENT", &defaults.user_agent),
            log_level: parse_env_or_default("LOG_LEVEL", defaults.log_level)?,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", self.host, self.port))
    }
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env_or_default<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("Invalid value for environment variable {key}: {raw:?}"))
}

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.port, 3978);
    assert_eq!(config.search_api_url, DEFAULT_SEARCH_API_URL);
    assert_eq!(config.search_timeout, Duration::from_secs(10));
    assert!(config.user_agent.starts_with("msgext-search/"));
    assert_eq!(config.bind_addr().unwrap().port(), 3978);
}

#[test]
fn test_parse_value() {
    assert_eq!(parse_value::<u16>("PORT", " 8080 ").unwrap(), 8080);
    assert_eq!(
        parse_value::<tracing::Level>("LOG_LEVEL", "debug").unwrap(),
        tracing::Level::DEBUG
    );

    let err = parse_value::<u16>("PORT", "not-a-port").unwrap_err();
    assert!(format!("{:#}", err).contains("PORT"));
}
