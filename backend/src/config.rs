//! Environment configuration, optionally loaded from a `.env` file.

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::HeaderValue;
use shared::emergency::DEFAULT_COUNTRY;
use shared::CountryCode;
use thiserror::Error;

use crate::domain::chat_service::DEFAULT_REPLY_DELAY;

pub const BIND_ADDR: &str = "CARENEST_BIND_ADDR";
pub const DATABASE_URL: &str = "CARENEST_DATABASE_URL";
pub const CORS_ORIGIN: &str = "CARENEST_CORS_ORIGIN";
pub const CHAT_DELAY_MS: &str = "CARENEST_CHAT_DELAY_MS";
pub const CHAT_SEED: &str = "CARENEST_CHAT_SEED";
pub const DEFAULT_COUNTRY_KEY: &str = "CARENEST_DEFAULT_COUNTRY";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

fn invalid(key: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// `None` runs without a backend store
    pub database_url: Option<String>,
    pub cors_origin: HeaderValue,
    pub chat_delay: Duration,
    pub chat_seed: Option<u64>,
    pub default_country: CountryCode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            database_url: None,
            cors_origin: HeaderValue::from_static("http://localhost:8080"),
            chat_delay: DEFAULT_REPLY_DELAY,
            chat_seed: None,
            default_country: DEFAULT_COUNTRY,
        }
    }
}

impl AppConfig {
    /// Read the process environment after loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(raw) = get(BIND_ADDR) {
            config.bind_addr = raw.parse().map_err(|e| invalid(BIND_ADDR, &raw, e))?;
        }
        config.database_url = get(DATABASE_URL);
        if let Some(raw) = get(CORS_ORIGIN) {
            config.cors_origin = HeaderValue::from_str(&raw).map_err(|e| invalid(CORS_ORIGIN, &raw, e))?;
        }
        if let Some(raw) = get(CHAT_DELAY_MS) {
            let millis: u64 = raw.parse().map_err(|e| invalid(CHAT_DELAY_MS, &raw, e))?;
            config.chat_delay = Duration::from_millis(millis);
        }
        if let Some(raw) = get(CHAT_SEED) {
            config.chat_seed = Some(raw.parse().map_err(|e| invalid(CHAT_SEED, &raw, e))?);
        }
        if let Some(raw) = get(DEFAULT_COUNTRY_KEY) {
            config.default_country = CountryCode::parse(&raw)
                .ok_or_else(|| invalid(DEFAULT_COUNTRY_KEY, &raw, "expected one of BR, US, ES, FR, NL"))?;
        }

        Ok(config)
    }
}
