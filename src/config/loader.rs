//! Load [`ServerConfig`] from the process environment or any key lookup.

use crate::config::types::*;
use crate::error::ConfigError;
use std::net::SocketAddr;
use std::str::FromStr;

/// Read configuration from environment variables. Call `dotenvy::dotenv()` first to pick up `.env`.
///
/// | variable | default |
/// |---|---|
/// | `DATABASE_URL` (or `DB_URI`) | `sqlite://app.db` |
/// | `BIND_ADDR` | `127.0.0.1:5555` |
/// | `DB_MAX_CONNECTIONS` | `5` |
/// | `BODY_LIMIT_BYTES` | `65536` |
/// | `SEED_SAMPLE_DATA` | `false` |
pub fn from_env() -> Result<ServerConfig, ConfigError> {
    from_lookup(|key| std::env::var(key).ok())
}

pub fn from_lookup<F>(lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = ServerConfig::default();
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let database_url = get("DATABASE_URL")
        .or_else(|| get("DB_URI"))
        .unwrap_or(defaults.database_url);

    let bind_addr = match get("BIND_ADDR") {
        Some(v) => SocketAddr::from_str(&v).map_err(|e| invalid("BIND_ADDR", &v, e))?,
        None => defaults.bind_addr,
    };

    let max_connections = match get("DB_MAX_CONNECTIONS") {
        Some(v) => positive::<u32>("DB_MAX_CONNECTIONS", &v)?,
        None => defaults.max_connections,
    };

    let body_limit_bytes = match get("BODY_LIMIT_BYTES") {
        Some(v) => positive::<usize>("BODY_LIMIT_BYTES", &v)?,
        None => defaults.body_limit_bytes,
    };

    let seed_sample_data = match get("SEED_SAMPLE_DATA") {
        Some(v) => parse_flag("SEED_SAMPLE_DATA", &v)?,
        None => defaults.seed_sample_data,
    };

    Ok(ServerConfig {
        database_url,
        bind_addr,
        max_connections,
        body_limit_bytes,
        seed_sample_data,
    })
}

fn invalid(key: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + From<u8>,
    T::Err: std::fmt::Display,
{
    let n = value.parse::<T>().map_err(|e| invalid(key, value, e))?;
    if n < T::from(1) {
        return Err(invalid(key, value, "must be at least 1"));
    }
    Ok(n)
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value, "expected true or false")),
    }
}
