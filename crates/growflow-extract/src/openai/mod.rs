//! OpenAI-compatible generation backend.
//!
//! This module provides a generation backend that works with any
//! OpenAI-compatible chat completions endpoint, including:
//!
//! - OpenAI cloud API
//! - Azure OpenAI
//! - Ollama (in OpenAI compatibility mode)
//! - vLLM
//! - LM Studio
//!
//! # Example
//!
//! ```rust,no_run
//! use growflow_extract::openai::{OpenAIBackend, OpenAIConfig};
//!
//! // From environment variables
//! let backend = OpenAIBackend::from_env().unwrap();
//!
//! // Or with custom config
//! let config = OpenAIConfig {
//!     base_url: "http://localhost:11434/v1".to_string(), // Ollama
//!     api_key: None, // Not needed for local
//!     gen_model: "llama3".to_string(),
//!     timeout_seconds: 120,
//!     temperature: 0.3,
//! };
//! let backend = OpenAIBackend::new(config).unwrap();
//! ```

mod backend;
mod types;

pub use backend::{OpenAIBackend, OpenAIConfig};
pub use types::*;
