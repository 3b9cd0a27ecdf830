//! Process configuration read from the environment.
//!
//! `main` loads `.env` first (dotenvy), so every key below may live there.

use std::time::Duration;

use tablehost_domain::{DomainError, Money, PaymentHandle, PaymentMethod, UserId};

use crate::infrastructure::http_table_adapter::DEFAULT_TABLE_ADAPTER_URL;
use crate::infrastructure::ports::SessionConfig;
use crate::infrastructure::timed_table_adapter::AdapterTimeouts;

/// Default number of interested members needed to open a session.
pub const DEFAULT_POLL_THRESHOLD: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} is not valid: {message}")]
    Invalid { key: &'static str, message: String },
}

impl ConfigError {
    fn invalid(key: &'static str, message: impl ToString) -> Self {
        Self::Invalid {
            key,
            message: message.to_string(),
        }
    }
}

/// Everything the engine needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub database_path: String,
    pub table_adapter_url: String,
    /// Members allowed to open polls and end sessions
    pub operator_ids: Vec<UserId>,
    /// The one authoritative interest threshold; poll copy is rendered from it
    pub poll_threshold: u32,
    pub session: SessionConfig,
    /// Where players send buy-ins, in preference order
    pub host_handles: Vec<PaymentHandle>,
    pub adapter_timeouts: AdapterTimeouts,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_port: u16 = match get("SERVER_PORT").or_else(|| get("PORT")) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::invalid("SERVER_PORT", e))?,
            None => 3000,
        };

        let operator_ids = get("OPERATOR_IDS")
            .map(|raw| {
                raw.split(',')
                    .filter(|part| !part.trim().is_empty())
                    .map(UserId::new)
                    .collect::<Result<Vec<_>, DomainError>>()
            })
            .transpose()
            .map_err(|e| ConfigError::invalid("OPERATOR_IDS", e))?
            .unwrap_or_default();

        let poll_threshold = parse_or(&get, "POLL_THRESHOLD", DEFAULT_POLL_THRESHOLD)?;
        if poll_threshold == 0 {
            return Err(ConfigError::invalid("POLL_THRESHOLD", "must be at least 1"));
        }

        let session = SessionConfig {
            game_name: get("GAME_NAME").unwrap_or_else(|| "Community Game".into()),
            small_blind: money_or(&get, "SMALL_BLIND", 0.10)?,
            big_blind: money_or(&get, "BIG_BLIND", 0.20)?,
        };

        let mut host_handles = Vec::new();
        for (key, method) in [
            ("HOST_VENMO", PaymentMethod::Venmo),
            ("HOST_CASHAPP", PaymentMethod::CashApp),
            ("HOST_ZELLE", PaymentMethod::Zelle),
        ] {
            if let Some(raw) = get(key) {
                let handle =
                    PaymentHandle::new(method, &raw).map_err(|e| ConfigError::invalid(key, e))?;
                host_handles.push(handle);
            }
        }

        let defaults = AdapterTimeouts::default();
        let adapter_timeouts = AdapterTimeouts {
            create: secs_or(&get, "ADAPTER_CREATE_TIMEOUT_SECS", defaults.create)?,
            admit: secs_or(&get, "ADAPTER_ADMIT_TIMEOUT_SECS", defaults.admit)?,
            remove: secs_or(&get, "ADAPTER_REMOVE_TIMEOUT_SECS", defaults.remove)?,
        };

        Ok(Self {
            server_host: get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            server_port,
            database_path: get("DATABASE_PATH").unwrap_or_else(|| "tablehost.db".into()),
            table_adapter_url: get("TABLE_ADAPTER_URL")
                .unwrap_or_else(|| DEFAULT_TABLE_ADAPTER_URL.into()),
            operator_ids,
            poll_threshold,
            session,
            host_handles,
            adapter_timeouts,
        })
    }
}

fn parse_or<G, T>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    G: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(key, e)),
        None => Ok(default),
    }
}

fn money_or<G>(get: &G, key: &'static str, default: f64) -> Result<Money, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let dollars: f64 = parse_or(get, key, default)?;
    Money::from_dollars(dollars).map_err(|e| ConfigError::invalid(key, e))
}

fn secs_or<G>(get: &G, key: &'static str, default: Duration) -> Result<Duration, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let secs: u64 = parse_or(get, key, default.as_secs())?;
    if secs == 0 {
        return Err(ConfigError::invalid(key, "must be at least 1 second"));
    }
    Ok(Duration::from_secs(secs))
}
