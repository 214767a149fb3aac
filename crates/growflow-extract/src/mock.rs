//! Mock generation backend for deterministic testing.
//!
//! Provides a scriptable [`GenerationBackend`] so orchestration logic
//! can be tested without a live completions endpoint.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let backend = MockGenerationBackend::new()
//!     .with_response(r#"[{"description": "Finish report"}]"#);
//!
//! let reply = backend.generate("some note").await.unwrap();
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use growflow_core::{Error, GenerationBackend, Result};

/// Mock generation backend for testing.
#[derive(Clone)]
pub struct MockGenerationBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    default_response: String,
    fixed_responses: HashMap<String, String>,
    failure: Option<String>,
}

/// A recorded backend invocation.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub system: String,
    pub prompt: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            default_response: "[]".to_string(),
            fixed_responses: HashMap::new(),
            failure: None,
        }
    }
}

impl MockGenerationBackend {
    /// Create a new mock backend that answers `[]` to everything.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the response returned for unmapped prompts.
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_response = response.into();
        self
    }

    /// Add a response mapping for a specific prompt.
    pub fn with_response_mapping(
        mut self,
        prompt: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .fixed_responses
            .insert(prompt.into(), response.into());
        self
    }

    /// Make every call fail with the given message.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).failure = Some(message.into());
        self
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Get the number of generation calls.
    pub fn call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }

    fn log_call(&self, system: &str, prompt: &str) {
        self.call_log.lock().unwrap().push(MockCall {
            system: system.to_string(),
            prompt: prompt.to_string(),
        });
    }
}

impl Default for MockGenerationBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.log_call(system, prompt);

        if let Some(ref message) = self.config.failure {
            return Err(Error::Inference(message.clone()));
        }

        if let Some(response) = self.config.fixed_responses.get(prompt) {
            return Ok(response.clone());
        }

        Ok(self.config.default_response.clone())
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_default_response() {
        let backend = MockGenerationBackend::new().with_response("custom");
        assert_eq!(backend.generate("anything").await.unwrap(), "custom");
    }

    #[tokio::test]
    async fn test_mock_response_mapping() {
        let backend = MockGenerationBackend::new()
            .with_response_mapping("hello", "world")
            .with_response_mapping("foo", "bar");

        assert_eq!(backend.generate("hello").await.unwrap(), "world");
        assert_eq!(backend.generate("foo").await.unwrap(), "bar");
        assert_eq!(backend.generate("other").await.unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let backend = MockGenerationBackend::new().with_failure("boom");
        let result = backend.generate("anything").await;
        assert!(matches!(result, Err(Error::Inference(_))));
    }

    #[tokio::test]
    async fn test_mock_call_logging() {
        let backend = MockGenerationBackend::new();

        backend
            .generate_with_system("system prompt", "user prompt")
            .await
            .unwrap();
        backend.generate("bare prompt").await.unwrap();

        assert_eq!(backend.call_count(), 2);
        let calls = backend.get_calls();
        assert_eq!(calls[0].system, "system prompt");
        assert_eq!(calls[0].prompt, "user prompt");
        assert_eq!(calls[1].system, "");
    }
}
