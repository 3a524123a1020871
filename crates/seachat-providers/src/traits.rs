//! Provider traits — the seams between the resolver and the network.
//!
//! - [`LlmProvider`] sends chat completions; [`crate::HttpProvider`] covers any
//!   OpenAI-compatible API.
//! - [`HealthCheck`] answers "does this candidate work right now?" and is what
//!   the resolver actually depends on, so tests can substitute a fake.

use async_trait::async_trait;
use seachat_core::types::{CandidateModel, LlmResponse, Message};
use seachat_core::ProviderError;

/// Configuration passed to each LLM call.
#[derive(Clone, Debug)]
pub struct LlmRequestConfig {
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
}

impl Default for LlmRequestConfig {
    fn default() -> Self {
        Self {
            max_tokens: 2048,
            temperature: 0.7,
        }
    }
}

/// Trait that all LLM providers must implement.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a chat completion request.
    ///
    /// # Arguments
    /// * `messages` — Conversation in OpenAI format.
    /// * `model`    — Model identifier (e.g. `"gemini-2.5-flash"`).
    /// * `config`   — Temperature, max_tokens.
    ///
    /// Transport failures, non-2xx statuses and unparsable bodies are returned
    /// as `Err`. An empty completion is still `Ok`; callers decide what it means.
    async fn chat(
        &self,
        messages: &[Message],
        model: &str,
        config: &LlmRequestConfig,
    ) -> Result<LlmResponse, ProviderError>;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}

/// Availability check for a single candidate model.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// `true` if the candidate answered with non-empty text.
    async fn check(&self, candidate: &CandidateModel) -> bool;
}
