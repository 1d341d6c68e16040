use std::net::SocketAddr;

use axum::http::HeaderName;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://rooms.db?mode=rwc";
pub const DEFAULT_USER_HEADER: &str = "x-user-id";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} is not a valid socket address: {value}")]
    BindAddr { key: &'static str, value: String },
    #[error("unknown ROOM_BACKEND {0:?}, expected \"sqlite\" or \"rest\"")]
    Backend(String),
    #[error("{0} must be set when ROOM_BACKEND=rest")]
    Missing(&'static str),
    #[error("USER_HEADER {0:?} is not a valid header name")]
    UserHeader(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    Sqlite { database_url: String },
    Rest { rest_url: String, api_key: String },
}

impl BackendConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            BackendConfig::Sqlite { .. } => "sqlite",
            BackendConfig::Rest { .. } => "rest",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub backend: BackendConfig,
    pub user_header: HeaderName,
}

impl Config {
    /// Reads the process environment, honouring a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let bind_addr = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr: SocketAddr = bind_addr.parse().map_err(|_| ConfigError::BindAddr {
            key: "BIND_ADDR",
            value: bind_addr.clone(),
        })?;

        let backend = match var("ROOM_BACKEND").as_deref().unwrap_or("sqlite") {
            "sqlite" => BackendConfig::Sqlite {
                database_url: var("DATABASE_URL")
                    .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned()),
            },
            "rest" => BackendConfig::Rest {
                rest_url: var("REST_URL").ok_or(ConfigError::Missing("REST_URL"))?,
                api_key: var("REST_API_KEY").ok_or(ConfigError::Missing("REST_API_KEY"))?,
            },
            other => return Err(ConfigError::Backend(other.to_owned())),
        };

        let user_header = var("USER_HEADER").unwrap_or_else(|| DEFAULT_USER_HEADER.to_owned());
        let user_header = HeaderName::try_from(user_header.as_str())
            .map_err(|_| ConfigError::UserHeader(user_header.clone()))?;

        Ok(Config {
            bind_addr,
            backend,
            user_header,
        })
    }
}
