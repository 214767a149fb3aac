//! Core traits for growflow abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// NOTE REPOSITORY
// =============================================================================

/// Request for creating a new note.
#[derive(Debug, Clone)]
pub struct CreateNoteRequest {
    pub user_id: Uuid,
    pub content: String,
    pub meeting_title: Option<String>,
    pub meeting_date: Option<NaiveDate>,
    pub meeting_location: Option<String>,
    pub meeting_participants: Vec<String>,
}

/// Repository for raw meeting notes.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a new note with processed = false.
    async fn insert(&self, req: CreateNoteRequest) -> Result<Note>;

    /// Fetch a note by id.
    async fn get(&self, id: Uuid) -> Result<Option<Note>>;

    /// List a user's notes, newest first, capped at the default page limit.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Note>>;

    /// Mark a note as consumed by extraction.
    async fn mark_processed(&self, id: Uuid) -> Result<()>;
}

// =============================================================================
// TASK REPOSITORY
// =============================================================================

/// Request for inserting a task row.
#[derive(Debug, Clone)]
pub struct CreateTaskRequest {
    pub note_id: Option<Uuid>,
    pub user_id: Uuid,
    pub assignee_id: Option<Uuid>,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub deadline: Option<NaiveDate>,
}

/// Filters for listing tasks.
#[derive(Debug, Clone)]
pub struct ListTasksRequest {
    /// Tasks visible to this user (creator or assignee).
    pub user_id: Uuid,
    /// Filter by status.
    pub status: Option<TaskStatus>,
    /// Filter by assignee.
    pub assignee_id: Option<Uuid>,
}

/// Repository for persisted tasks.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a task and return the stored row.
    async fn insert(&self, req: CreateTaskRequest) -> Result<Task>;

    /// Fetch a task by id.
    async fn get(&self, id: Uuid) -> Result<Option<Task>>;

    /// List tasks matching the filters, newest first, capped at the
    /// default page limit.
    async fn list(&self, req: ListTasksRequest) -> Result<Vec<Task>>;

    /// Update a task's status and return the updated row.
    async fn update_status(&self, id: Uuid, status: TaskStatus) -> Result<Task>;
}

// =============================================================================
// PROFILE REPOSITORY
// =============================================================================

/// Repository for the user profile directory.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Resolve a free-text name to a profile via case-insensitive
    /// partial match. First match wins; no match returns None.
    async fn find_by_name(&self, name: &str) -> Result<Option<Profile>>;

    /// List profiles, optionally filtered by a partial name match.
    async fn list(&self, search: Option<&str>) -> Result<Vec<Profile>>;
}

// =============================================================================
// NOTIFICATION REPOSITORY
// =============================================================================

/// Request for inserting a notification row.
#[derive(Debug, Clone)]
pub struct CreateNotificationRequest {
    pub recipient_id: Uuid,
    pub actor_id: Uuid,
    pub kind: NotificationKind,
    pub task_id: Option<Uuid>,
    pub message: String,
}

/// Repository for per-user notifications.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Insert a notification.
    async fn insert(&self, req: CreateNotificationRequest) -> Result<Uuid>;

    /// List a recipient's notifications, newest first, capped at the
    /// default page limit.
    async fn list_for_recipient(&self, recipient_id: Uuid, unread_only: bool)
        -> Result<Vec<Notification>>;

    /// Mark one notification as read.
    async fn mark_read(&self, id: Uuid) -> Result<()>;

    /// Mark all of a recipient's notifications as read. Returns the
    /// number of rows updated.
    async fn mark_all_read(&self, recipient_id: Uuid) -> Result<u64>;
}

// =============================================================================
// GENERATION BACKEND
// =============================================================================

/// Backend for LLM text generation.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text given a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate text with system context.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}
