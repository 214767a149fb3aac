//! Note repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use growflow_core::defaults::PAGE_LIMIT;
use growflow_core::{new_v7, CreateNoteRequest, Error, Note, NoteRepository, Result};

/// PostgreSQL implementation of NoteRepository.
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

const NOTE_COLUMNS: &str = "id, user_id, content, processed, meeting_title, meeting_date, \
     meeting_location, meeting_participants, created_at_utc, updated_at_utc";

fn map_note_row(row: PgRow) -> Note {
    Note {
        id: row.get("id"),
        user_id: row.get("user_id"),
        content: row.get("content"),
        processed: row.get("processed"),
        meeting_title: row.get("meeting_title"),
        meeting_date: row.get("meeting_date"),
        meeting_location: row.get("meeting_location"),
        meeting_participants: row.get("meeting_participants"),
        created_at_utc: row.get("created_at_utc"),
        updated_at_utc: row.get("updated_at_utc"),
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn insert(&self, req: CreateNoteRequest) -> Result<Note> {
        let now = Utc::now();

        let row = sqlx::query(&format!(
            "INSERT INTO note (id, user_id, content, processed, meeting_title, meeting_date,
                               meeting_location, meeting_participants, created_at_utc, updated_at_utc)
             VALUES ($1, $2, $3, false, $4, $5, $6, $7, $8, $8)
             RETURNING {}",
            NOTE_COLUMNS
        ))
        .bind(new_v7())
        .bind(req.user_id)
        .bind(&req.content)
        .bind(&req.meeting_title)
        .bind(req.meeting_date)
        .bind(&req.meeting_location)
        .bind(&req.meeting_participants)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(map_note_row(row))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Note>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM note WHERE id = $1",
            NOTE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(map_note_row))
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Note>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM note WHERE user_id = $1 ORDER BY created_at_utc DESC LIMIT {}",
            NOTE_COLUMNS, PAGE_LIMIT
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(map_note_row).collect())
    }

    async fn mark_processed(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("UPDATE note SET processed = true, updated_at_utc = $2 WHERE id = $1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NoteNotFound(id));
        }
        Ok(())
    }
}
