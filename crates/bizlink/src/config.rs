//! Server configuration
//!
//! Environment-driven; every knob has a logged default except the JWT secret,
//! which must be provided in production-like setups.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

/// Minimum accepted JWT secret length in bytes
const MIN_SECRET_LENGTH: usize = 32;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address, e.g. "0.0.0.0:3000"
    pub bind_addr: String,
    /// SQLite database path
    pub database_path: String,
    /// JWT signing secret
    pub jwt_secret: Vec<u8>,
    /// Access token lifetime
    pub jwt_expires_in: Duration,
}

impl Config {
    /// Load configuration from the environment
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `BIZLINK_BIND` | `0.0.0.0:3000` |
    /// | `BIZLINK_DB` | `data/bizlink.db` |
    /// | `BIZLINK_JWT_SECRET` | required, min 32 bytes |
    /// | `BIZLINK_JWT_TTL_HOURS` | `24` |
    pub fn from_env() -> Result<Self> {
        let bind_addr = var_or("BIZLINK_BIND", "0.0.0.0:3000");
        let database_path = var_or("BIZLINK_DB", "data/bizlink.db");

        let jwt_secret = env::var("BIZLINK_JWT_SECRET")
            .context("BIZLINK_JWT_SECRET must be set")?
            .into_bytes();
        if jwt_secret.len() < MIN_SECRET_LENGTH {
            bail!(
                "BIZLINK_JWT_SECRET must be at least {} bytes",
                MIN_SECRET_LENGTH
            );
        }

        let ttl_hours: u64 = var_or("BIZLINK_JWT_TTL_HOURS", "24")
            .parse()
            .context("BIZLINK_JWT_TTL_HOURS must be a number")?;

        Ok(Self {
            bind_addr,
            database_path,
            jwt_secret,
            jwt_expires_in: Duration::from_secs(ttl_hours * 60 * 60),
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.is_empty() => value,
        Ok(_) => {
            warn!("{} is set but empty, using default: {}", key, default);
            default.to_string()
        }
        Err(_) => {
            info!("{} not set, using default: {}", key, default);
            default.to_string()
        }
    }
}
