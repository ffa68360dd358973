use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{anyhow, Context};

use crate::auth::decode_secret_key;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow!("Unknown log format '{other}' (expected text or json)")),
        }
    }
}

#[derive(Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub jwt_secret: Vec<u8>,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub quote_cache_capacity: u64,
    pub telegram: Option<TelegramConfig>,
    pub log_format: LogFormat,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env_or(key, default);
    raw.trim()
        .parse()
        .map_err(|e| anyhow!("Invalid {key} '{raw}': {e}"))
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let listen_addr = parse_env("XP_LISTEN_ADDR", "0.0.0.0:8080")?;
        let db_path = env_or("XP_DB_PATH", "./db/xportfoy.db");
        let raw_secret = std::env::var("XP_JWT_SECRET").context("XP_JWT_SECRET must be set")?;
        let jwt_secret = decode_secret_key(&raw_secret)?;
        let cors_allow = env_or("XP_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = parse_env("XP_REQUEST_TIMEOUT_MS", "30000")?;
        let quote_cache_capacity = parse_env("XP_QUOTE_CACHE_CAPACITY", "1000")?;

        let telegram = match (
            non_empty_env("XP_TELEGRAM_BOT_TOKEN"),
            non_empty_env("XP_TELEGRAM_CHAT_ID"),
        ) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramConfig { bot_token, chat_id }),
            (None, None) => None,
            _ => {
                return Err(anyhow!(
                    "XP_TELEGRAM_BOT_TOKEN and XP_TELEGRAM_CHAT_ID must be set together"
                ))
            }
        };
        let log_format = parse_env("XP_LOG_FORMAT", "text")?;

        Ok(Self {
            listen_addr,
            db_path,
            jwt_secret,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            quote_cache_capacity,
            telegram,
            log_format,
        })
    }
}
