//! Profile repository implementation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};

use growflow_core::{Error, Profile, ProfileRepository, Result};

use crate::escape_like;

/// PostgreSQL implementation of ProfileRepository.
pub struct PgProfileRepository {
    pool: Pool<Postgres>,
}

impl PgProfileRepository {
    /// Create a new PgProfileRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

const PROFILE_COLUMNS: &str =
    "id, email, full_name, avatar_url, created_at_utc, updated_at_utc";

fn map_profile_row(row: PgRow) -> Profile {
    Profile {
        id: row.get("id"),
        email: row.get("email"),
        full_name: row.get("full_name"),
        avatar_url: row.get("avatar_url"),
        created_at_utc: row.get("created_at_utc"),
        updated_at_utc: row.get("updated_at_utc"),
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Profile>> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let pattern = format!("%{}%", escape_like(trimmed));
        let row = sqlx::query(&format!(
            "SELECT {} FROM profile WHERE full_name ILIKE $1 ORDER BY full_name LIMIT 1",
            PROFILE_COLUMNS
        ))
        .bind(&pattern)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(map_profile_row))
    }

    async fn list(&self, search: Option<&str>) -> Result<Vec<Profile>> {
        let rows = match search.map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => {
                let pattern = format!("%{}%", escape_like(term));
                sqlx::query(&format!(
                    "SELECT {} FROM profile
                     WHERE full_name ILIKE $1 OR email ILIKE $1
                     ORDER BY full_name NULLS LAST",
                    PROFILE_COLUMNS
                ))
                .bind(&pattern)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {} FROM profile ORDER BY full_name NULLS LAST",
                    PROFILE_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(map_profile_row).collect())
    }
}
