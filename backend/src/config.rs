//! Process settings, read from the environment once at startup.
//!
//! | variable             | default              |
//! |----------------------|----------------------|
//! | `APP_HOST`           | `0.0.0.0`            |
//! | `APP_PORT`           | `3779`               |
//! | `APP_TITLE`          | `Deposit API`        |
//! | `APP_VERSION`        | crate version        |
//! | `APP_IS_DEBUG`       | `false`              |
//! | `DB_URL`             | `sqlite:deposits.db` |
//! | `DB_MAX_CONNECTIONS` | `5`                  |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub host: IpAddr,
    pub port: u16,
    pub title: String,
    pub version: String,
    pub is_debug: bool,
}

impl AppSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub app: AppSettings,
    pub database: DatabaseSettings,
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, falling back to defaults for missing keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            app: AppSettings {
                host: parse_or(&lookup, "APP_HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
                port: parse_or(&lookup, "APP_PORT", 3779)?,
                title: lookup("APP_TITLE").unwrap_or_else(|| "Deposit API".to_string()),
                version: lookup("APP_VERSION").unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
                is_debug: parse_flag(&lookup, "APP_IS_DEBUG")?,
            },
            database: DatabaseSettings {
                url: lookup("DB_URL").unwrap_or_else(|| "sqlite:deposits.db".to_string()),
                max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(parsed),
            Err(_) => Err(ConfigError::Invalid { key, value }),
        },
        None => Ok(default),
    }
}

fn parse_flag<F>(lookup: &F, key: &'static str) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value }),
        },
        None => Ok(false),
    }
}
