//! PostgreSQL persistence layer for growflow.
//!
//! Provides repository implementations backed by sqlx for notes, tasks,
//! profiles, and notifications, plus the task materializer that turns
//! extraction output into rows and notification side effects.
//!
//! All repositories implement the traits defined in `growflow-core`,
//! keeping callers decoupled from the concrete storage.

pub mod materializer;
pub mod notes;
pub mod notifications;
pub mod pool;
pub mod profiles;
pub mod tasks;

pub use materializer::{notify_task_completed, TaskMaterializer};
pub use notes::PgNoteRepository;
pub use notifications::PgNotificationRepository;
pub use pool::PoolConfig;
pub use profiles::PgProfileRepository;
pub use tasks::PgTaskRepository;

// Re-export core types for convenience
pub use growflow_core::*;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

/// Aggregated database handle with all repositories.
pub struct Database {
    pub pool: Pool<Postgres>,
    pub notes: PgNoteRepository,
    pub tasks: PgTaskRepository,
    pub profiles: PgProfileRepository,
    pub notifications: PgNotificationRepository,
}

impl Clone for Database {
    fn clone(&self) -> Self {
        // Repositories are stateless over the shared pool
        Self::new(self.pool.clone())
    }
}

impl Database {
    /// Create a new Database from an existing pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            notes: PgNoteRepository::new(pool.clone()),
            tasks: PgTaskRepository::new(pool.clone()),
            profiles: PgProfileRepository::new(pool.clone()),
            notifications: PgNotificationRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect to the database and create all repositories.
    ///
    /// Pool settings come from the environment, see [`PoolConfig::from_env`].
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = pool::connect(database_url, &PoolConfig::from_env()).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Build a task materializer over this database's pool.
    pub fn materializer(&self) -> TaskMaterializer {
        TaskMaterializer::new(
            Arc::new(PgTaskRepository::new(self.pool.clone())),
            Arc::new(PgProfileRepository::new(self.pool.clone())),
            Arc::new(PgNotificationRepository::new(self.pool.clone())),
        )
    }

    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

/// Escape LIKE/ILIKE wildcards in user-supplied search terms.
///
/// Escapes backslash first, then `%` and `_`, so a literal pattern
/// character in the input cannot widen the match.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
