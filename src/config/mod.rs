//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `FOLIO_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_MAX_PAGE_SIZE, DEFAULT_POPULAR_MIN_RATINGS, DEFAULT_POPULAR_SIZE, PopularityConfig,
};
use crate::snapshot::default_data_dir;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `FOLIO_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `5000`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Snapshot directory (books, pivot, similarity, popular). Default: `./data`.
    pub data_dir: PathBuf,

    /// Minimum ratings for a derived popularity list. Default: `250`.
    pub popular_min_ratings: u32,

    /// Length of a derived popularity list. Default: `50`.
    pub popular_size: usize,

    /// Largest `limit` accepted by paginated endpoints. Default: `500`.
    pub max_page_size: usize,

    /// Allowed CORS origins. Empty disables the CORS layer.
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            data_dir: default_data_dir(),
            popular_min_ratings: DEFAULT_POPULAR_MIN_RATINGS,
            popular_size: DEFAULT_POPULAR_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "FOLIO_PORT";
    const ENV_BIND_ADDR: &'static str = "FOLIO_BIND_ADDR";
    const ENV_DATA_DIR: &'static str = "FOLIO_DATA_DIR";
    const ENV_POPULAR_MIN_RATINGS: &'static str = "FOLIO_POPULAR_MIN_RATINGS";
    const ENV_POPULAR_SIZE: &'static str = "FOLIO_POPULAR_SIZE";
    const ENV_MAX_PAGE_SIZE: &'static str = "FOLIO_MAX_PAGE_SIZE";
    const ENV_CORS_ORIGINS: &'static str = "FOLIO_CORS_ORIGINS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let data_dir = Self::parse_path_from_env(Self::ENV_DATA_DIR, defaults.data_dir);
        let popular_min_ratings =
            Self::parse_number_from_env(Self::ENV_POPULAR_MIN_RATINGS, defaults.popular_min_ratings)?;
        let popular_size =
            Self::parse_number_from_env(Self::ENV_POPULAR_SIZE, defaults.popular_size)?;
        let max_page_size =
            Self::parse_number_from_env(Self::ENV_MAX_PAGE_SIZE, defaults.max_page_size)?;
        let cors_origins = Self::parse_list_from_env(Self::ENV_CORS_ORIGINS, defaults.cors_origins);

        Ok(Self {
            port,
            bind_addr,
            data_dir,
            popular_min_ratings,
            popular_size,
            max_page_size,
            cors_origins,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.data_dir.exists() {
            return Err(ConfigError::PathNotFound {
                path: self.data_dir.clone(),
            });
        }
        if !self.data_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.data_dir.clone(),
            });
        }

        if self.max_page_size == 0 {
            return Err(ConfigError::MustBePositive {
                name: Self::ENV_MAX_PAGE_SIZE,
            });
        }
        if self.popular_size == 0 {
            return Err(ConfigError::MustBePositive {
                name: Self::ENV_POPULAR_SIZE,
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    pub fn popularity(&self) -> PopularityConfig {
        PopularityConfig::new(self.popular_min_ratings, self.popular_size)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(default)
    }

    fn parse_number_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr<Err = std::num::ParseIntError>,
    {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::InvalidNumber {
                    name: var_name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_list_from_env(var_name: &str, default: Vec<String>) -> Vec<String> {
        match env::var(var_name) {
            Ok(value) => value
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
                .collect(),
            Err(_) => default,
        }
    }
}
