//! Task HTTP handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use growflow_core::{ListTasksRequest, Task, TaskRepository, TaskStatus};
use growflow_db::notify_task_completed;

use crate::{ApiError, AppState};

/// Query parameters for listing tasks.
///
/// `status` accepts the loose forms ("done", "in-progress") as well as
/// the canonical display strings.
#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    pub user_id: Uuid,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub assignee_id: Option<Uuid>,
}

/// Request body for a status update.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    pub user_id: Uuid,
    pub new_status: TaskStatus,
}

/// Response body for a status update.
#[derive(Debug, Serialize)]
pub struct UpdateStatusResponse {
    pub success: bool,
    pub task: Task,
    pub message: String,
}

/// List tasks visible to a user (as creator or assignee), newest first.
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let status = match query.status.as_deref() {
        Some(s) => Some(TaskStatus::from_str_loose(s).ok_or_else(|| {
            ApiError::BadRequest(format!("Invalid status filter: {}", s))
        })?),
        None => None,
    };

    let tasks = state
        .db
        .tasks
        .list(ListTasksRequest {
            user_id: query.user_id,
            status,
            assignee_id: query.assignee_id,
        })
        .await?;
    Ok(Json(tasks))
}

/// Update a task's status.
///
/// A transition to Done by someone other than the creator notifies the
/// creator; the notification is best-effort and never fails the update.
pub async fn update_task_status(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    Json(body): Json<UpdateStatusBody>,
) -> Result<Json<UpdateStatusResponse>, ApiError> {
    let task = state
        .db
        .tasks
        .update_status(task_id, body.new_status)
        .await?;

    notify_task_completed(&state.db.notifications, &task, body.user_id).await;

    Ok(Json(UpdateStatusResponse {
        success: true,
        task,
        message: "Task status updated successfully".to_string(),
    }))
}
