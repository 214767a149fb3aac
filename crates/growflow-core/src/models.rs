//! Core data models for growflow.
//!
//! These types are shared across all growflow crates and represent
//! the core domain entities: profiles, notes, tasks, and notifications,
//! plus the intermediate shapes produced by task extraction.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// PRIORITY & STATUS TYPES
// =============================================================================

/// Task priority level.
///
/// Wire and storage representation is the capitalized variant name
/// ("Low", "Medium", "High").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Parse a priority from a string (case-insensitive).
    ///
    /// Model output is not guaranteed to match the canonical casing, so
    /// "high", "HIGH", and "High" all parse.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// Task lifecycle status.
///
/// Any status may transition to any other; there is no enforced ordering.
/// Wire and storage representation uses the human-readable form with
/// spaces ("Not Started", "In Progress", "Done").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
}

impl TaskStatus {
    /// Parse a status from a string (case-insensitive, accepts
    /// hyphens/underscores in place of spaces).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s
            .trim()
            .to_lowercase()
            .replace(['-', '_'], " ")
            .as_str()
        {
            "not started" => Some(Self::NotStarted),
            "in progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotStarted => write!(f, "Not Started"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Done => write!(f, "Done"),
        }
    }
}

/// Kind of notification emitted as a task side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// A task was assigned to the recipient.
    Assigned,
    /// A task the recipient created was updated.
    Updated,
    /// A task the recipient created was completed.
    Completed,
}

impl NotificationKind {
    /// Parse a notification kind from its lowercase storage form.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "assigned" => Some(Self::Assigned),
            "updated" => Some(Self::Updated),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Assigned => write!(f, "assigned"),
            Self::Updated => write!(f, "updated"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

// =============================================================================
// PROFILE TYPES
// =============================================================================

/// A user profile. The profile directory is what assignee names
/// resolve against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

// =============================================================================
// NOTE TYPES
// =============================================================================

/// A raw meeting note as submitted by a user.
///
/// Immutable once created except for the `processed` flag, which is set
/// after extraction consumes the note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub processed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_location: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meeting_participants: Vec<String>,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

// =============================================================================
// TASK TYPES
// =============================================================================

/// A persisted task derived from a note (or inserted directly).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    /// Source note, when the task came from extraction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_id: Option<Uuid>,
    /// Creator (the submitting user).
    pub user_id: Uuid,
    /// Resolved assignee. Always a valid profile reference or None.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<Uuid>,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

/// A task produced by extraction, before assignee resolution and
/// persistence. Ephemeral: exists only between parsing and
/// materialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedTask {
    /// Non-empty after trimming.
    pub description: String,
    /// Free-text assignee name, resolved against profiles later.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_name: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
}

impl ExtractedTask {
    /// Convenience constructor for a task with only a description,
    /// used by the whole-note fallback.
    pub fn with_description(description: impl Into<String>, priority: Priority) -> Self {
        Self {
            description: description.into(),
            assignee_name: None,
            priority,
            status: TaskStatus::NotStarted,
            deadline: None,
        }
    }
}

/// Task fields as accepted from callers that bypass extraction
/// (the direct request form).
///
/// The deadline arrives as a string and is validated leniently: a
/// malformed date drops to None instead of rejecting the task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskData {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

impl TaskData {
    /// Convert caller-supplied task data into the extraction shape,
    /// applying the given default priority and dropping malformed
    /// deadlines.
    pub fn into_extracted(self, default_priority: Priority) -> ExtractedTask {
        let deadline = self.deadline.as_deref().and_then(|d| {
            let parsed = NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok();
            if parsed.is_none() {
                tracing::warn!(value = %d, "Invalid deadline, dropping");
            }
            parsed
        });
        ExtractedTask {
            description: self.description,
            assignee_name: self.assignee_name,
            priority: self.priority.unwrap_or(default_priority),
            status: self.status.unwrap_or_default(),
            deadline,
        }
    }
}

/// A per-task materialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskError {
    /// Description of the task that failed.
    pub task: String,
    /// What went wrong.
    pub error: String,
}

/// Outcome of materializing a batch of extracted tasks.
///
/// `created` is authoritative for the caller-visible result; `errors`
/// is informational and does not change the batch's success status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterializeOutcome {
    pub created: Vec<Task>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<TaskError>,
}

// =============================================================================
// NOTIFICATION TYPES
// =============================================================================

/// A per-user notification created as a task side effect.
///
/// Self-notifications (actor == recipient) are never created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub actor_id: Uuid,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<Uuid>,
    pub message: String,
    pub read: bool,
    pub created_at_utc: DateTime<Utc>,
}
