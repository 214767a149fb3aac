//! Extraction ingress: notes (or pre-built task lists) in, persisted
//! tasks out.
//!
//! The request body is a tagged union discriminated by shape. A body
//! carrying a `tasks` array bypasses extraction entirely; a body
//! carrying `note_text` runs the full pipeline (model when configured,
//! deterministic rules otherwise or on failure) before materialization.

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use growflow_core::{NoteRepository, Priority, Task, TaskData, TaskError};

use crate::{ApiError, AppState};

/// Extraction request body.
///
/// Serde tries variants in order, so the direct form (with `tasks`)
/// wins over the note form when a body happens to carry both shapes.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExtractionRequest {
    /// Pre-extracted tasks, materialized as-is.
    Direct { user_id: Uuid, tasks: Vec<TaskData> },
    /// Raw note text, run through the extraction pipeline.
    Note {
        user_id: Uuid,
        note_text: String,
        #[serde(default)]
        note_id: Option<Uuid>,
        #[serde(default)]
        default_priority: Option<Priority>,
    },
}

/// Extraction response body.
#[derive(Debug, Serialize)]
pub struct ExtractionResponse {
    pub success: bool,
    pub created: usize,
    pub tasks: Vec<Task>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<TaskError>>,
}

impl ExtractionResponse {
    fn empty(message: &str) -> Self {
        Self {
            success: true,
            created: 0,
            tasks: Vec::new(),
            message: Some(message.to_string()),
            errors: None,
        }
    }
}

/// Run extraction (or accept pre-extracted tasks) and persist the result.
///
/// Always 200 for an accepted batch, even when individual tasks failed;
/// per-task failures are reported in `errors` alongside the created
/// tasks. 400 only for bodies that do not match either request shape.
pub async fn create_extraction(
    State(state): State<AppState>,
    body: Result<Json<ExtractionRequest>, JsonRejection>,
) -> Result<Json<ExtractionResponse>, ApiError> {
    let Json(request) = body
        .map_err(|e| ApiError::BadRequest(format!("Invalid request format: {}", e.body_text())))?;

    let (user_id, note_id, extracted) = match request {
        ExtractionRequest::Direct { user_id, tasks } => {
            let default_priority = Priority::default();
            let extracted: Vec<_> = tasks
                .into_iter()
                .map(|t| t.into_extracted(default_priority))
                .collect();
            (user_id, None, extracted)
        }
        ExtractionRequest::Note {
            user_id,
            note_text,
            note_id,
            default_priority,
        } => {
            if note_text.trim().is_empty() {
                return Err(ApiError::BadRequest("note_text is required".to_string()));
            }
            let default_priority = default_priority.unwrap_or_default();
            let extracted = state.pipeline.extract(&note_text, default_priority).await;
            (user_id, note_id, extracted)
        }
    };

    if extracted.is_empty() {
        return Ok(Json(ExtractionResponse::empty(
            "No actionable tasks found in the notes",
        )));
    }

    let outcome = state
        .db
        .materializer()
        .materialize(user_id, note_id, extracted)
        .await;

    // Best-effort: the tasks are already persisted either way
    if let Some(note_id) = note_id {
        if let Err(e) = state.db.notes.mark_processed(note_id).await {
            warn!(note_id = %note_id, error_msg = %e, "Failed to mark note processed");
        }
    }

    Ok(Json(ExtractionResponse {
        success: true,
        created: outcome.created.len(),
        tasks: outcome.created,
        message: None,
        errors: (!outcome.errors.is_empty()).then_some(outcome.errors),
    }))
}
