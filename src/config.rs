use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "PCOS Smart Assistant";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "PCOS Smart Assistant API";

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_RATE_PER_MINUTE: u32 = 100;
const DEFAULT_RATE_PER_HOUR: u32 = 1000;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "info,pcos_assistant=debug,tower_http=info"
}

/// Get the application data directory.
/// Falls back to the working directory when no home directory exists
/// (containers running as a system user).
pub fn app_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pcos-assistant")
}

/// Default location of the SQLite store.
pub fn default_db_path() -> PathBuf {
    app_data_dir().join("pcos.db")
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Runtime configuration, read from the environment once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// `None` disables persistence entirely (`SKIP_STORE=1`).
    pub db_path: Option<PathBuf>,
    /// Empty means any origin is allowed.
    pub cors_allowed_origins: Vec<String>,
    pub rate_limit_per_minute: u32,
    pub rate_limit_per_hour: u32,
    /// JSON array of historical dataset rows, imported when the table is empty.
    pub dataset_path: Option<PathBuf>,
    /// JSON practitioner directory replacing the built-in one.
    pub directory_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            db_path: Some(default_db_path()),
            cors_allowed_origins: Vec::new(),
            rate_limit_per_minute: DEFAULT_RATE_PER_MINUTE,
            rate_limit_per_hour: DEFAULT_RATE_PER_HOUR,
            dataset_path: None,
            directory_path: None,
        }
    }
}

impl Config {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = match get("HOST") {
            Some(v) => v.parse().map_err(|_| ConfigError::InvalidValue { key: "HOST", value: v })?,
            None => defaults.host,
        };
        let port = parse_or(get("PORT"), "PORT", defaults.port)?;
        let rate_limit_per_minute =
            parse_or(get("RATE_LIMIT_PER_MINUTE"), "RATE_LIMIT_PER_MINUTE", defaults.rate_limit_per_minute)?;
        let rate_limit_per_hour =
            parse_or(get("RATE_LIMIT_PER_HOUR"), "RATE_LIMIT_PER_HOUR", defaults.rate_limit_per_hour)?;

        let skip_store = get("SKIP_STORE").is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
        let db_path = if skip_store {
            None
        } else {
            Some(get("PCOS_DB_PATH").map(PathBuf::from).unwrap_or_else(default_db_path))
        };

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            db_path,
            cors_allowed_origins,
            rate_limit_per_minute,
            rate_limit_per_hour,
            dataset_path: get("PCOS_DATASET_PATH").map(PathBuf::from),
            directory_path: get("PCOS_DIRECTORY_PATH").map(PathBuf::from),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(
    raw: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(v) => v.parse().map_err(|_| ConfigError::InvalidValue { key, value: v }),
        None => Ok(default),
    }
}
