//! Server configuration.
//!
//! Values come from `TASKPRO_*` environment variables (a `.env` file in the
//! working directory is loaded first when present) and may then be
//! overridden by command-line flags.

use std::path::PathBuf;

use crate::error::{Result, TaskProError};

pub const ENV_HOST: &str = "TASKPRO_HOST";
pub const ENV_PORT: &str = "TASKPRO_PORT";
pub const ENV_DATABASE_PATH: &str = "TASKPRO_DATABASE_PATH";
pub const ENV_JWT_SECRET: &str = "TASKPRO_JWT_SECRET";
pub const ENV_TOKEN_TTL_HOURS: &str = "TASKPRO_TOKEN_TTL_HOURS";
pub const ENV_BCRYPT_COST: &str = "TASKPRO_BCRYPT_COST";
pub const ENV_LOG_RETENTION_DAYS: &str = "TASKPRO_LOG_RETENTION_DAYS";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATABASE_PATH: &str = "taskpro.db";
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
pub const DEFAULT_LOG_RETENTION_DAYS: u32 = 7;

/// Used only when no secret is configured; a warning is logged at startup
pub const DEV_JWT_SECRET: &str = "taskpro-dev-secret-change-in-production";

/// bcrypt's accepted cost range
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

/// Tokens may live at most one year
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub log_retention_days: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            log_retention_days: DEFAULT_LOG_RETENTION_DAYS,
        }
    }
}

impl ServerConfig {
    /// Load a `.env` file if there is one, then read the environment
    pub fn load() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => tracing::debug!("No .env file found, using process environment"),
            Err(e) => return Err(TaskProError::ConfigError(format!("Invalid .env file: {}", e))),
        }

        Self::from_env()
    }

    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            host: env_string(ENV_HOST).unwrap_or(defaults.host),
            port: env_parse(ENV_PORT)?.unwrap_or(defaults.port),
            database_path: env_string(ENV_DATABASE_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            jwt_secret: env_string(ENV_JWT_SECRET).unwrap_or(defaults.jwt_secret),
            token_ttl_hours: env_parse(ENV_TOKEN_TTL_HOURS)?.unwrap_or(defaults.token_ttl_hours),
            bcrypt_cost: env_parse(ENV_BCRYPT_COST)?.unwrap_or(defaults.bcrypt_cost),
            log_retention_days: env_parse(ENV_LOG_RETENTION_DAYS)?
                .unwrap_or(defaults.log_retention_days),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            return Err(TaskProError::ConfigError(format!(
                "{} must be between {} and {}, got {}",
                ENV_BCRYPT_COST,
                MIN_BCRYPT_COST,
                MAX_BCRYPT_COST,
                self.bcrypt_cost
            )));
        }

        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&self.token_ttl_hours) {
            return Err(TaskProError::ConfigError(format!(
                "{} must be between 1 and {}, got {}",
                ENV_TOKEN_TTL_HOURS, MAX_TOKEN_TTL_HOURS, self.token_ttl_hours
            )));
        }

        if self.jwt_secret.is_empty() {
            return Err(TaskProError::ConfigError(format!(
                "{} must not be empty",
                ENV_JWT_SECRET
            )));
        }

        Ok(())
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env_string(key) {
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
            TaskProError::ConfigError(format!("Invalid value for {}: '{}' ({})", key, raw, e))
        }),
        None => Ok(None),
    }
}
