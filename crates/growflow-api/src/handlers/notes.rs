//! Meeting note HTTP handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use growflow_core::{CreateNoteRequest, Note, NoteRepository};

use crate::{ApiError, AppState};

/// Request body for creating a note.
#[derive(Debug, Deserialize)]
pub struct CreateNoteBody {
    pub user_id: Uuid,
    pub content: String,
    #[serde(default)]
    pub meeting_title: Option<String>,
    #[serde(default)]
    pub meeting_date: Option<NaiveDate>,
    #[serde(default)]
    pub meeting_location: Option<String>,
    #[serde(default)]
    pub meeting_participants: Vec<String>,
}

/// Query parameters for listing notes.
#[derive(Debug, Deserialize)]
pub struct ListNotesQuery {
    pub user_id: Uuid,
}

/// Create a new note.
///
/// Stores the raw text with `processed = false`; extraction is a
/// separate step. Empty content is rejected.
pub async fn create_note(
    State(state): State<AppState>,
    Json(body): Json<CreateNoteBody>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    if body.content.trim().is_empty() {
        return Err(ApiError::BadRequest("Content is required".to_string()));
    }

    let note = state
        .db
        .notes
        .insert(CreateNoteRequest {
            user_id: body.user_id,
            content: body.content,
            meeting_title: body.meeting_title,
            meeting_date: body.meeting_date,
            meeting_location: body.meeting_location,
            meeting_participants: body.meeting_participants,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(note)))
}

/// List a user's notes, newest first.
pub async fn list_notes(
    State(state): State<AppState>,
    Query(query): Query<ListNotesQuery>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let notes = state.db.notes.list_for_user(query.user_id).await?;
    Ok(Json(notes))
}
