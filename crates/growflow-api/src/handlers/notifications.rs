//! Notification HTTP handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use growflow_core::{Notification, NotificationRepository};

use crate::{ApiError, AppState};

/// Query parameters for listing notifications.
#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    /// Recipient whose notifications to list.
    pub user_id: Uuid,
    /// When true, only unread notifications are returned.
    #[serde(default)]
    pub unread: bool,
}

/// Request body for marking all notifications read.
#[derive(Debug, Deserialize)]
pub struct ReadAllBody {
    pub user_id: Uuid,
}

/// List a recipient's notifications, newest first.
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let notifications = state
        .db
        .notifications
        .list_for_recipient(query.user_id, query.unread)
        .await?;
    Ok(Json(notifications))
}

/// Mark a single notification as read.
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.notifications.mark_read(id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Mark all of a recipient's notifications as read.
pub async fn mark_all_notifications_read(
    State(state): State<AppState>,
    Json(body): Json<ReadAllBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let updated = state.db.notifications.mark_all_read(body.user_id).await?;
    Ok(Json(serde_json::json!({ "success": true, "updated": updated })))
}
