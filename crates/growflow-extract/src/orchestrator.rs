//! Extraction orchestration.
//!
//! Chooses between model-backed and rules-based extraction. The model
//! path is preferred when a backend is configured; any failure on that
//! path (transport, API error, unparseable reply) degrades to the
//! rules parser rather than surfacing an error, so extraction as a
//! whole never fails.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use growflow_core::{ExtractedTask, GenerationBackend, Priority, Result};

use crate::prompt::{parse_task_response, task_extraction_prompt};
use crate::rules::RuleParser;

/// Orchestrates note-to-task extraction.
pub struct ExtractionPipeline {
    backend: Option<Arc<dyn GenerationBackend>>,
    rules: RuleParser,
}

impl ExtractionPipeline {
    /// Create a pipeline. With no backend, extraction is rules-only.
    pub fn new(backend: Option<Arc<dyn GenerationBackend>>) -> Self {
        Self {
            backend,
            rules: RuleParser::new(),
        }
    }

    /// Create a pipeline that never calls a model.
    pub fn rules_only() -> Self {
        Self::new(None)
    }

    /// Whether a generation backend is configured.
    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Extract tasks from a note.
    ///
    /// Total: model failures fall back to the rules parser. An empty
    /// result is possible only when the model succeeds and finds no
    /// tasks, or the note itself is blank.
    #[instrument(skip(self, note_text), fields(
        subsystem = "extraction",
        component = "orchestrator",
        op = "extract",
        note_len = note_text.len(),
    ))]
    pub async fn extract(&self, note_text: &str, default_priority: Priority) -> Vec<ExtractedTask> {
        let (strategy, tasks) = match &self.backend {
            Some(backend) => {
                match self
                    .extract_with_model(backend.as_ref(), note_text, default_priority)
                    .await
                {
                    Ok(tasks) => ("model", tasks),
                    Err(e) => {
                        warn!(
                            error_msg = %e,
                            "Model extraction failed, falling back to rules parser"
                        );
                        ("rules", self.rules.parse(note_text, default_priority))
                    }
                }
            }
            None => {
                debug!("No generation backend configured, using rules parser");
                ("rules", self.rules.parse(note_text, default_priority))
            }
        };

        info!(strategy, task_count = tasks.len(), "Extraction complete");
        tasks
    }

    async fn extract_with_model(
        &self,
        backend: &dyn GenerationBackend,
        note_text: &str,
        default_priority: Priority,
    ) -> Result<Vec<ExtractedTask>> {
        let system = task_extraction_prompt(Utc::now().date_naive(), default_priority);
        debug!(
            model = backend.model_name(),
            prompt_len = system.len(),
            "Requesting model extraction"
        );

        let content = backend.generate_with_system(&system, note_text).await?;
        parse_task_response(&content, default_priority)
    }
}
