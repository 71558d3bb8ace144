//! Application configuration loaded from environment variables.

use crate::errors::{Result, StoreError};

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database URL or file path (e.g. `sqlite:./flock.db`)
    pub database_url: String,
    /// Upper bound on pooled connections
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            database_url: env_var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./flock.db".to_string()),
            max_connections: parse_max_connections(
                &env_var("DB_MAX_CONNECTIONS").unwrap_or_else(|_| "5".to_string()),
            )?,
        })
    }
}

/// A pool with zero connections never hands one out, so zero is rejected.
fn parse_max_connections(raw: &str) -> Result<u32> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(StoreError::Config("Invalid DB_MAX_CONNECTIONS".to_string())),
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| StoreError::Config(format!("Missing env var: {key}")))
}
