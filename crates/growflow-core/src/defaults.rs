//! Centralized default constants for the growflow system.
//!
//! **This module is the single source of truth** for all shared default values.
//! All crates should reference these constants instead of defining their own
//! magic numbers.
//!
//! Organized by domain area. When adding new constants, place them in the
//! appropriate section and document the rationale for the chosen value.

// =============================================================================
// EXTRACTION
// =============================================================================

/// Minimum trimmed line length for a line to be considered a task candidate.
/// Shorter lines are noise (stray bullets, "ok", timestamps).
pub const MIN_TASK_LINE_CHARS: usize = 5;

/// Minimum description length (exclusive) after stripping assignee,
/// priority, and deadline tokens. A line whose remaining description is
/// this short carried nothing but metadata and is discarded.
pub const MIN_DESCRIPTION_CHARS: usize = 3;

// =============================================================================
// INFERENCE
// =============================================================================

/// Default OpenAI-compatible API base URL.
pub const OPENAI_URL: &str = "https://api.openai.com/v1";

/// Default generation model for task extraction.
pub const GEN_MODEL: &str = "gpt-4o-mini";

/// Sampling temperature for extraction requests. Low to bias the model
/// toward deterministic, schema-faithful output.
pub const EXTRACTION_TEMPERATURE: f32 = 0.3;

/// Timeout for generation requests in seconds.
pub const GEN_TIMEOUT_SECS: u64 = 120;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

/// Default CORS max-age in seconds (1 hour).
pub const CORS_MAX_AGE_SECS: u64 = 3600;

/// Maximum accepted HTTP request body size in bytes (1 MiB). Meeting
/// notes are plain text; anything larger is not a note.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for list endpoints (notes, tasks, notifications).
pub const PAGE_LIMIT: i64 = 50;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_thresholds_are_consistent() {
        // Use const block to satisfy clippy::assertions_on_constants
        const {
            assert!(MIN_DESCRIPTION_CHARS < MIN_TASK_LINE_CHARS);
            assert!(MIN_TASK_LINE_CHARS > 0);
        }
    }

    #[test]
    fn extraction_temperature_is_low() {
        assert!(EXTRACTION_TEMPERATURE < 1.0);
        assert!(EXTRACTION_TEMPERATURE > 0.0);
    }
}
