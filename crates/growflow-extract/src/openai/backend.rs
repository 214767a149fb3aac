//! OpenAI-compatible generation backend implementation.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use growflow_core::defaults::{EXTRACTION_TEMPERATURE, GEN_MODEL, GEN_TIMEOUT_SECS, OPENAI_URL};
use growflow_core::{Error, GenerationBackend, Result};

use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ErrorBody};

/// Configuration for an OpenAI-compatible backend.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key (optional; local endpoints often run without auth).
    pub api_key: Option<String>,
    /// Model to use for generation.
    pub gen_model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Sampling temperature. Extraction wants low-variance output.
    pub temperature: f32,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: OPENAI_URL.to_string(),
            api_key: None,
            gen_model: GEN_MODEL.to_string(),
            timeout_seconds: GEN_TIMEOUT_SECS,
            temperature: EXTRACTION_TEMPERATURE,
        }
    }
}

/// Chat-completion client implementing [`GenerationBackend`].
pub struct OpenAIBackend {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIBackend {
    /// Create a new backend with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            url = %config.base_url,
            model = %config.gen_model,
            "Initializing OpenAI backend"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    ///
    /// Reads `OPENAI_BASE_URL`, `OPENAI_API_KEY`, `OPENAI_MODEL`, and
    /// `OPENAI_TIMEOUT_SECONDS`; anything unset keeps its default.
    pub fn from_env() -> Result<Self> {
        let config = OpenAIConfig {
            base_url: std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| OPENAI_URL.to_string()),
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            gen_model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| GEN_MODEL.to_string()),
            timeout_seconds: std::env::var("OPENAI_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(GEN_TIMEOUT_SECS),
            temperature: EXTRACTION_TEMPERATURE,
        };

        Self::new(config)
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Turn a non-2xx response into an inference error, keeping the
    /// provider's message when the body parses as an error envelope.
    async fn api_error(response: reqwest::Response) -> Error {
        let status = response.status();
        let detail = response
            .text()
            .await
            .ok()
            .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
            .map(|body| body.error.message)
            .unwrap_or_else(|| "Unknown error".to_string());
        Error::Inference(format!("OpenAI returned {}: {}", status, detail))
    }
}

#[async_trait]
impl GenerationBackend for OpenAIBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        debug!(
            model = %self.config.gen_model,
            prompt_chars = prompt.len(),
            "Requesting completion"
        );

        let mut messages = Vec::new();
        if !system.is_empty() {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.to_string(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        });

        let request = ChatCompletionRequest {
            model: self.config.gen_model.clone(),
            messages,
            temperature: Some(self.config.temperature),
        };

        let mut req = self.client.post(self.completions_url());
        if let Some(ref api_key) = self.config.api_key {
            req = req.bearer_auth(api_key);
        }

        let response = req
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();

        debug!(response_chars = content.len(), "Completion received");
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.config.gen_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_targets_openai() {
        let config = OpenAIConfig::default();
        assert_eq!(config.base_url, OPENAI_URL);
        assert_eq!(config.gen_model, GEN_MODEL);
        assert_eq!(config.timeout_seconds, GEN_TIMEOUT_SECS);
        assert_eq!(config.temperature, EXTRACTION_TEMPERATURE);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn model_name_reflects_config() {
        let backend = OpenAIBackend::new(OpenAIConfig {
            gen_model: "test-gen".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(backend.model_name(), "test-gen");
    }

    #[test]
    fn completions_url_tolerates_trailing_slash() {
        let backend = OpenAIBackend::new(OpenAIConfig {
            base_url: "http://localhost:11434/v1/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            backend.completions_url(),
            "http://localhost:11434/v1/chat/completions"
        );
    }
}
