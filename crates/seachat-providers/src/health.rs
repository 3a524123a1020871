//! Availability probing through a real (minimal) generation request.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use seachat_core::types::{CandidateModel, Message};

use crate::traits::{HealthCheck, LlmProvider, LlmRequestConfig};

/// Prompt sent to a candidate to see whether it answers.
pub const PROBE_PROMPT: &str = "Reply with the single word: ok";

/// Token budget for a probe.
const PROBE_MAX_TOKENS: u32 = 64;

/// [`HealthCheck`] that issues a tiny chat completion against the candidate.
///
/// A candidate is healthy when the call succeeds within the timeout and
/// returns non-empty text.
pub struct ProbeHealthCheck {
    provider: Arc<dyn LlmProvider>,
    timeout: Duration,
}

impl ProbeHealthCheck {
    pub fn new(provider: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }
}

#[async_trait]
impl HealthCheck for ProbeHealthCheck {
    async fn check(&self, candidate: &CandidateModel) -> bool {
        let messages = [Message::user(PROBE_PROMPT)];
        let config = LlmRequestConfig {
            max_tokens: PROBE_MAX_TOKENS,
            temperature: 0.0,
        };

        let chat = self.provider.chat(&messages, &candidate.name, &config);
        let outcome = tokio::time::timeout(self.timeout, chat).await;

        match outcome {
            Ok(Ok(resp)) if resp.text().is_some() => {
                debug!(model = %candidate.name, "probe succeeded");
                true
            }
            Ok(Ok(_)) => {
                warn!(model = %candidate.name, "probe returned empty text");
                false
            }
            Ok(Err(e)) => {
                warn!(model = %candidate.name, error = %e, "probe failed");
                false
            }
            Err(_) => {
                warn!(
                    model = %candidate.name,
                    timeout_secs = self.timeout.as_secs(),
                    "probe timed out"
                );
                false
            }
        }
    }
}
