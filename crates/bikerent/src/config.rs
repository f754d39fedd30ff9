//! Database configuration.
//!
//! The application bootstrap builds one [`DatabaseConfig`], creates the pool
//! from it and passes the pool (or clients taken from it) down to the
//! repositories. Nothing here is global.

use crate::error::{DbError, DbResult};
use std::fmt;

pub const ENV_URL: &str = "DATABASE_URL";
pub const ENV_HOST: &str = "DATABASE_HOST";
pub const ENV_PORT: &str = "DATABASE_PORT";
pub const ENV_USER: &str = "DATABASE_USER";
pub const ENV_PASSWORD: &str = "DATABASE_PASSWORD";
pub const ENV_NAME: &str = "DATABASE_NAME";
pub const ENV_POOL_SIZE: &str = "DATABASE_POOL_SIZE";

const DEFAULT_POOL_SIZE: usize = 16;

/// Connection settings for the platform database.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Full connection string; takes precedence over the individual fields.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub dbname: String,
    pub max_pool_size: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: None,
            dbname: "postgres".to_string(),
            max_pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("dbname", &self.dbname)
            .field("max_pool_size", &self.max_pool_size)
            .finish()
    }
}

impl DatabaseConfig {
    /// Configuration from a connection URL.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Load `.env` (if present) and read the `DATABASE_*` variables.
    pub fn from_env() -> DbResult<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(DbError::Config(format!("failed to load .env: {e}")));
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`.
    ///
    /// With `DATABASE_URL` set, only the pool size is read besides it.
    /// Otherwise `DATABASE_USER` and `DATABASE_NAME` are required and
    /// host/port default to `localhost:5432`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DbResult<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| DbError::Config(format!("{key} is not set")))
        };

        let max_pool_size = match get(ENV_POOL_SIZE) {
            Some(raw) => parse_number(ENV_POOL_SIZE, &raw)?,
            None => DEFAULT_POOL_SIZE,
        };
        if max_pool_size == 0 {
            return Err(DbError::Config(format!("{ENV_POOL_SIZE} must be at least 1")));
        }

        if let Some(url) = get(ENV_URL) {
            return Ok(Self {
                max_pool_size,
                ..Self::from_url(url)
            });
        }

        let port = match get(ENV_PORT) {
            Some(raw) => parse_number(ENV_PORT, &raw)?,
            None => 5432,
        };

        Ok(Self {
            url: None,
            host: get(ENV_HOST).unwrap_or_else(|| "localhost".to_string()),
            port,
            user: require(ENV_USER)?,
            password: get(ENV_PASSWORD),
            dbname: require(ENV_NAME)?,
            max_pool_size,
        })
    }

    /// Convert into a `tokio_postgres::Config`.
    pub fn to_pg_config(&self) -> DbResult<tokio_postgres::Config> {
        if let Some(url) = &self.url {
            return url
                .parse()
                .map_err(|e: tokio_postgres::Error| DbError::Config(e.to_string()));
        }

        let mut cfg = tokio_postgres::Config::new();
        cfg.host(&self.host)
            .port(self.port)
            .user(&self.user)
            .dbname(&self.dbname);
        if let Some(password) = &self.password {
            cfg.password(password);
        }
        Ok(cfg)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> DbResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| DbError::Config(format!("{key} is not a valid number: {raw:?}")))
}
