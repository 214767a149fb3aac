//! Notification repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use growflow_core::defaults::PAGE_LIMIT;
use growflow_core::{
    new_v7, CreateNotificationRequest, Error, Notification, NotificationKind,
    NotificationRepository, Result,
};

/// PostgreSQL implementation of NotificationRepository.
pub struct PgNotificationRepository {
    pool: Pool<Postgres>,
}

impl PgNotificationRepository {
    /// Create a new PgNotificationRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

const NOTIFICATION_COLUMNS: &str =
    "id, recipient_id, actor_id, kind, task_id, message, read, created_at_utc";

fn map_notification_row(row: PgRow) -> Notification {
    let kind: String = row.get("kind");
    Notification {
        id: row.get("id"),
        recipient_id: row.get("recipient_id"),
        actor_id: row.get("actor_id"),
        kind: NotificationKind::from_str_loose(&kind).unwrap_or(NotificationKind::Updated),
        task_id: row.get("task_id"),
        message: row.get("message"),
        read: row.get("read"),
        created_at_utc: row.get("created_at_utc"),
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn insert(&self, req: CreateNotificationRequest) -> Result<Uuid> {
        let id = new_v7();

        sqlx::query(
            "INSERT INTO notification (id, recipient_id, actor_id, kind, task_id, message, read, created_at_utc)
             VALUES ($1, $2, $3, $4, $5, $6, false, $7)",
        )
        .bind(id)
        .bind(req.recipient_id)
        .bind(req.actor_id)
        .bind(req.kind.to_string())
        .bind(req.task_id)
        .bind(&req.message)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(id)
    }

    async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        unread_only: bool,
    ) -> Result<Vec<Notification>> {
        let sql = if unread_only {
            format!(
                "SELECT {} FROM notification
                 WHERE recipient_id = $1 AND read = false
                 ORDER BY created_at_utc DESC LIMIT {}",
                NOTIFICATION_COLUMNS, PAGE_LIMIT
            )
        } else {
            format!(
                "SELECT {} FROM notification
                 WHERE recipient_id = $1
                 ORDER BY created_at_utc DESC LIMIT {}",
                NOTIFICATION_COLUMNS, PAGE_LIMIT
            )
        };

        let rows = sqlx::query(&sql)
            .bind(recipient_id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(rows.into_iter().map(map_notification_row).collect())
    }

    async fn mark_read(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("UPDATE notification SET read = true WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Notification {} not found", id)));
        }
        Ok(())
    }

    async fn mark_all_read(&self, recipient_id: Uuid) -> Result<u64> {
        let result =
            sqlx::query("UPDATE notification SET read = true WHERE recipient_id = $1 AND read = false")
                .bind(recipient_id)
                .execute(&self.pool)
                .await
                .map_err(Error::Database)?;

        Ok(result.rows_affected())
    }
}
