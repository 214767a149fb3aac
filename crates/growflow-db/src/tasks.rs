//! Task repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use growflow_core::defaults::PAGE_LIMIT;
use growflow_core::{
    new_v7, CreateTaskRequest, Error, ListTasksRequest, Priority, Result, Task, TaskRepository,
    TaskStatus,
};

/// PostgreSQL implementation of TaskRepository.
pub struct PgTaskRepository {
    pool: Pool<Postgres>,
}

impl PgTaskRepository {
    /// Create a new PgTaskRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

const TASK_COLUMNS: &str = "id, note_id, user_id, assignee_id, description, status, priority, \
     deadline, created_at_utc, updated_at_utc";

fn map_task_row(row: PgRow) -> Task {
    let status: String = row.get("status");
    let priority: String = row.get("priority");
    Task {
        id: row.get("id"),
        note_id: row.get("note_id"),
        user_id: row.get("user_id"),
        assignee_id: row.get("assignee_id"),
        description: row.get("description"),
        // CHECK constraints keep stored values canonical
        status: TaskStatus::from_str_loose(&status).unwrap_or_default(),
        priority: Priority::from_str_loose(&priority).unwrap_or_default(),
        deadline: row.get("deadline"),
        created_at_utc: row.get("created_at_utc"),
        updated_at_utc: row.get("updated_at_utc"),
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn insert(&self, req: CreateTaskRequest) -> Result<Task> {
        let now = Utc::now();

        let row = sqlx::query(&format!(
            "INSERT INTO task (id, note_id, user_id, assignee_id, description, status, priority,
                               deadline, created_at_utc, updated_at_utc)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(new_v7())
        .bind(req.note_id)
        .bind(req.user_id)
        .bind(req.assignee_id)
        .bind(&req.description)
        .bind(req.status.to_string())
        .bind(req.priority.to_string())
        .bind(req.deadline)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(map_task_row(row))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Task>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM task WHERE id = $1",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(map_task_row))
    }

    async fn list(&self, req: ListTasksRequest) -> Result<Vec<Task>> {
        // $1 = user_id, then dynamic params start at $2
        let mut conditions = vec!["(user_id = $1 OR assignee_id = $1)".to_string()];
        let mut param_idx = 2;

        if req.status.is_some() {
            conditions.push(format!("status = ${}", param_idx));
            param_idx += 1;
        }
        if req.assignee_id.is_some() {
            conditions.push(format!("assignee_id = ${}", param_idx));
        }

        let sql = format!(
            "SELECT {} FROM task WHERE {} ORDER BY created_at_utc DESC LIMIT {}",
            TASK_COLUMNS,
            conditions.join(" AND "),
            PAGE_LIMIT
        );

        let mut q = sqlx::query(&sql).bind(req.user_id);
        if let Some(status) = req.status {
            q = q.bind(status.to_string());
        }
        if let Some(assignee_id) = req.assignee_id {
            q = q.bind(assignee_id);
        }

        let rows = q.fetch_all(&self.pool).await.map_err(Error::Database)?;
        Ok(rows.into_iter().map(map_task_row).collect())
    }

    async fn update_status(&self, id: Uuid, status: TaskStatus) -> Result<Task> {
        let row = sqlx::query(&format!(
            "UPDATE task SET status = $2, updated_at_utc = $3 WHERE id = $1 RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(status.to_string())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.map(map_task_row).ok_or(Error::TaskNotFound(id))
    }
}
