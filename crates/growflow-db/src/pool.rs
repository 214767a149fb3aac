//! Database connection pool setup.
//!
//! GrowFlow runs a single pool shared by every repository. Sizing is
//! conservative: the workload is short point queries plus the occasional
//! multi-row insert from materialization, so a small pool with a long
//! idle timeout is enough.

use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use growflow_core::{Error, Result};

/// Default maximum number of connections in the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default acquire timeout in seconds.
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Default idle timeout in seconds.
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;

/// Pool sizing and timeout settings.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// How long to wait for a free connection before failing.
    pub acquire_timeout: Duration,
    /// How long an idle connection is kept before being closed.
    pub idle_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
            idle_timeout: Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS),
        }
    }
}

impl PoolConfig {
    /// Build a configuration from the environment.
    ///
    /// Honors `DB_MAX_CONNECTIONS` and `DB_ACQUIRE_TIMEOUT_SECS`;
    /// unparseable values fall back to the defaults with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("DB_MAX_CONNECTIONS") {
            match val.parse::<u32>() {
                Ok(n) if n > 0 => config.max_connections = n,
                _ => {
                    tracing::warn!(value = %val, "Invalid DB_MAX_CONNECTIONS, using default");
                }
            }
        }

        if let Ok(val) = std::env::var("DB_ACQUIRE_TIMEOUT_SECS") {
            match val.parse::<u64>() {
                Ok(secs) if secs > 0 => config.acquire_timeout = Duration::from_secs(secs),
                _ => {
                    tracing::warn!(value = %val, "Invalid DB_ACQUIRE_TIMEOUT_SECS, using default");
                }
            }
        }

        config
    }
}

/// Open a PostgreSQL pool with the given settings.
pub async fn connect(database_url: &str, config: &PoolConfig) -> Result<PgPool> {
    let start = Instant::now();

    info!(
        subsystem = "database",
        component = "pool",
        op = "create",
        max_connections = config.max_connections,
        acquire_timeout_secs = config.acquire_timeout.as_secs(),
        "Creating database connection pool"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .connect(database_url)
        .await
        .map_err(Error::Database)?;

    info!(
        subsystem = "database",
        component = "pool",
        op = "established",
        pool_size = pool.size(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Database connection pool established"
    );
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = PoolConfig::default();
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(
            config.acquire_timeout,
            Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS)
        );
    }

    #[test]
    fn from_env_ignores_garbage() {
        // Env mutation is process-wide, so keep this test self-contained.
        std::env::set_var("DB_MAX_CONNECTIONS", "not-a-number");
        let config = PoolConfig::from_env();
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        std::env::remove_var("DB_MAX_CONNECTIONS");
    }

    #[test]
    fn from_env_rejects_zero_connections() {
        std::env::set_var("DB_ACQUIRE_TIMEOUT_SECS", "0");
        let config = PoolConfig::from_env();
        assert_eq!(
            config.acquire_timeout,
            Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS)
        );
        std::env::remove_var("DB_ACQUIRE_TIMEOUT_SECS");
    }
}
