//! # growflow-extract
//!
//! Note-to-task extraction pipeline for growflow.
//!
//! This crate provides:
//! - Rules-based task parsing (assignees, priorities, deadlines)
//! - OpenAI-compatible generation backend
//! - Extraction prompting and model response parsing
//! - An orchestrator that prefers the model and degrades to rules
//!
//! # Example
//!
//! ```rust
//! use growflow_core::Priority;
//! use growflow_extract::ExtractionPipeline;
//!
//! #[tokio::main]
//! async fn main() {
//!     let pipeline = ExtractionPipeline::rules_only();
//!     let tasks = pipeline
//!         .extract("John: Finish report by 2026-03-01", Priority::Medium)
//!         .await;
//!     assert_eq!(tasks[0].assignee_name.as_deref(), Some("John"));
//! }
//! ```

pub mod openai;
pub mod orchestrator;
pub mod prompt;
pub mod rules;

// Mock generation backend for testing
#[cfg(test)]
pub mod mock;

// Re-export core types
pub use growflow_core::*;

pub use openai::{OpenAIBackend, OpenAIConfig};
pub use orchestrator::ExtractionPipeline;
pub use prompt::{parse_task_response, task_extraction_prompt};
pub use rules::{candidate_lines, RuleParser};
