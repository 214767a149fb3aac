//! Task extraction prompting and response parsing.
//!
//! Builds the system prompt handed to the generation backend and turns
//! the model's reply back into typed tasks. The model is asked for a
//! bare JSON array; replies wrapped in Markdown code fences are
//! tolerated.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use growflow_core::{Error, ExtractedTask, Priority, Result, TaskStatus};

/// Generates the system prompt for task extraction.
///
/// Embeds today's date so the model can resolve relative dates, and the
/// default priority so unprioritized tasks come back consistent with the
/// caller's preference.
pub fn task_extraction_prompt(today: NaiveDate, default_priority: Priority) -> String {
    format!(
        r#"You are a task extraction assistant. Extract actionable tasks from meeting notes and return them as a JSON array.

Today's date is: {}

Each task should have:
- description (string, required): The task description
- assignee_name (string, optional): Person's name if mentioned
- priority ("Low" | "Medium" | "High", optional): Task priority, default {}. Only override this if the note explicitly mentions a different priority.
- status ("Not Started" | "In Progress" | "Done", optional): Default "Not Started"
- deadline (string, optional): Date in YYYY-MM-DD format if mentioned. Convert relative dates like "next Friday", "tomorrow", "in 2 weeks" to absolute dates based on today's date.

Return ONLY a valid JSON array of tasks, nothing else. If no tasks found, return empty array []."#,
        today.format("%Y-%m-%d"),
        default_priority,
    )
}

/// A task object as the model emits it. Everything beyond the
/// description is optional and loosely typed; normalization happens in
/// the conversion to [`ExtractedTask`].
#[derive(Debug, Deserialize)]
struct ModelTask {
    description: String,
    #[serde(default)]
    assignee_name: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    deadline: Option<String>,
}

impl ModelTask {
    fn into_extracted(self, default_priority: Priority) -> ExtractedTask {
        ExtractedTask {
            description: self.description,
            assignee_name: self.assignee_name,
            priority: self
                .priority
                .as_deref()
                .and_then(Priority::from_str_loose)
                .unwrap_or(default_priority),
            status: self
                .status
                .as_deref()
                .and_then(TaskStatus::from_str_loose)
                .unwrap_or_default(),
            deadline: self
                .deadline
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok()),
        }
    }
}

/// Parses a model reply into extracted tasks.
///
/// Empty content and a well-formed non-array reply both yield an empty
/// list. Unparseable JSON and structurally bad array items are errors,
/// left to the caller to recover from.
pub fn parse_task_response(content: &str, default_priority: Priority) -> Result<Vec<ExtractedTask>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let cleaned = strip_code_fences(content);
    let value: Value = serde_json::from_str(&cleaned)
        .map_err(|e| Error::Extraction(format!("Unparseable model reply: {}", e)))?;

    if !value.is_array() {
        return Ok(Vec::new());
    }

    let tasks: Vec<ModelTask> = serde_json::from_value(value)
        .map_err(|e| Error::Extraction(format!("Malformed task array from model: {}", e)))?;

    Ok(tasks
        .into_iter()
        .map(|t| t.into_extracted(default_priority))
        .collect())
}

/// Removes Markdown code fences (```json ... ``` or bare ``` ... ```)
/// around a reply.
fn strip_code_fences(content: &str) -> String {
    content
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}
